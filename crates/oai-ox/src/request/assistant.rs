use std::collections::HashMap;

use bon::Builder;
use serde::{Deserialize, Serialize, Serializer, ser::Error as _};
use serde_json::Value;

use crate::{
    tool::ToolDefinition,
    validation::{Validate, ValidationErrors, Validator, Violation, check_metadata, exclusive},
};

/// Resources made available to an assistant's hosted tools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Builder)]
pub struct ToolResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_interpreter: Option<CodeInterpreterResources>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_search: Option<FileSearchResources>,
}

impl Validate for ToolResources {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        if let Some(code_interpreter) = &self.code_interpreter {
            validator.max_len(
                "code_interpreter.file_ids",
                code_interpreter.file_ids.as_deref(),
                20,
            );
        }
        if let Some(file_search) = &self.file_search {
            validator.nested("file_search", file_search.validate());
        }
        validator.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeInterpreterResources {
    /// At most 20 file ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_ids: Option<Vec<String>>,
}

impl CodeInterpreterResources {
    pub fn new(file_ids: Vec<String>) -> Self {
        Self {
            file_ids: Some(file_ids),
        }
    }
}

/// Either attach existing vector stores or have new ones created, not both
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileSearchResources {
    #[serde(default)]
    pub vector_store_ids: Option<Vec<String>>,

    #[serde(default)]
    pub vector_stores: Option<Vec<VectorStoreSpec>>,
}

impl FileSearchResources {
    pub fn with_vector_store_ids(ids: Vec<String>) -> Self {
        Self {
            vector_store_ids: Some(ids),
            vector_stores: None,
        }
    }

    pub fn with_vector_stores(stores: Vec<VectorStoreSpec>) -> Self {
        Self {
            vector_store_ids: None,
            vector_stores: Some(stores),
        }
    }
}

impl Validate for FileSearchResources {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.exclusive(
            ("vector_store_ids", &self.vector_store_ids),
            ("vector_stores", &self.vector_stores),
        );
        validator.max_len("vector_store_ids", self.vector_store_ids.as_deref(), 1);
        validator.max_len("vector_stores", self.vector_stores.as_deref(), 1);
        for (index, store) in self.vector_stores.iter().flatten().enumerate() {
            validator.nested(&format!("vector_stores[{index}]"), store.validate());
        }
        validator.finish()
    }
}

impl Serialize for FileSearchResources {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Wire<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            vector_store_ids: Option<&'a Vec<String>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            vector_stores: Option<&'a Vec<VectorStoreSpec>>,
        }

        exclusive(
            ("vector_store_ids", &self.vector_store_ids),
            ("vector_stores", &self.vector_stores),
        )
        .map_err(S::Error::custom)?;

        Wire {
            vector_store_ids: self.vector_store_ids.as_ref(),
            vector_stores: self.vector_stores.as_ref(),
        }
        .serialize(serializer)
    }
}

/// A vector store created together with the assistant or thread
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreSpec {
    /// At most 10000 file ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_ids: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl Validate for VectorStoreSpec {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.max_len("file_ids", self.file_ids.as_deref(), 10_000);
        check_metadata(&mut validator, self.metadata.as_ref());
        validator.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct AssistantCreateRequest {
    #[builder(into)]
    pub model: String,

    /// At most 256 characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub name: Option<String>,

    /// At most 512 characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub instructions: Option<String>,

    /// At most 128 tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// `"auto"` or a format object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

impl Validate for AssistantCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.require_str("model", &self.model);
        check_assistant_fields(
            &mut validator,
            AssistantFields {
                name: self.name.as_deref(),
                description: self.description.as_deref(),
                tools: self.tools.as_deref(),
                tool_resources: self.tool_resources.as_ref(),
                metadata: self.metadata.as_ref(),
                temperature: self.temperature,
                top_p: self.top_p,
            },
        );
        validator.finish()
    }
}

/// Every field is optional; unset fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Builder)]
pub struct AssistantModifyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub instructions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

impl Validate for AssistantModifyRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        if let Some(model) = &self.model {
            validator.require_str("model", model);
        }
        check_assistant_fields(
            &mut validator,
            AssistantFields {
                name: self.name.as_deref(),
                description: self.description.as_deref(),
                tools: self.tools.as_deref(),
                tool_resources: self.tool_resources.as_ref(),
                metadata: self.metadata.as_ref(),
                temperature: self.temperature,
                top_p: self.top_p,
            },
        );
        validator.finish()
    }
}

struct AssistantFields<'a> {
    name: Option<&'a str>,
    description: Option<&'a str>,
    tools: Option<&'a [ToolDefinition]>,
    tool_resources: Option<&'a ToolResources>,
    metadata: Option<&'a HashMap<String, String>>,
    temperature: Option<f32>,
    top_p: Option<f32>,
}

fn check_assistant_fields(validator: &mut Validator, fields: AssistantFields<'_>) {
    check_chars(validator, "name", fields.name, 256);
    check_chars(validator, "description", fields.description, 512);
    validator.max_len("tools", fields.tools, 128);
    for (index, tool) in fields.tools.unwrap_or_default().iter().enumerate() {
        if let ToolDefinition::Function { function } = tool {
            validator.nested(&format!("tools[{index}].function"), function.validate());
        }
    }
    if let Some(resources) = fields.tool_resources {
        validator.nested("tool_resources", resources.validate());
    }
    check_metadata(validator, fields.metadata);
    validator.range("temperature", fields.temperature, 0.0, 2.0);
    validator.range("top_p", fields.top_p, 0.0, 1.0);
}

fn check_chars(validator: &mut Validator, field: &str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        let len = value.chars().count();
        if len > max {
            validator.push(Violation::invalid_value(
                field,
                format!("at most {max} characters allowed, got {len}"),
            ));
        }
    }
}
