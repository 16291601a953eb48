use bon::Builder;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::validation::{Validate, ValidationErrors, Validator, Violation};

/// A tool the model may use.
///
/// Chat completions only accept `function` tools; assistants also accept the
/// hosted `code_interpreter` and `file_search` tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolDefinition {
    Function { function: FunctionDefinition },
    CodeInterpreter,
    FileSearch,
}

impl ToolDefinition {
    pub fn function(function: FunctionDefinition) -> Self {
        Self::Function { function }
    }

    pub fn function_with_params(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self::function(
            FunctionDefinition::builder()
                .name(name)
                .description(description)
                .parameters(parameters)
                .build(),
        )
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function { .. })
    }
}

/// Describes a function the model may generate JSON arguments for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Builder)]
pub struct FunctionDefinition {
    /// a-z, A-Z, 0-9, underscores and dashes, at most 64 characters
    #[builder(into)]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub description: Option<String>,

    /// JSON Schema object describing the arguments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

impl FunctionDefinition {
    #[cfg(feature = "schema")]
    pub fn from_schema<T: schemars::JsonSchema>() -> Self {
        let schema = schemars::schema_for!(T);
        let description = schema
            .as_value()
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            name: T::schema_name().to_string(),
            description,
            parameters: Some(schema.to_value()),
            strict: None,
        }
    }
}

impl Validate for FunctionDefinition {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        check_identifier(&mut validator, "name", Some(&self.name));
        validator.finish()
    }
}

/// Names sent to the API (function names, message author names) share one
/// format: 1 to 64 characters of `[A-Za-z0-9_-]`.
pub(crate) fn check_identifier(validator: &mut Validator, field: &str, value: Option<&str>) {
    let Some(value) = value else {
        return;
    };
    if value.is_empty() {
        validator.push(Violation::missing_required(field));
    } else if value.chars().count() > 64 {
        validator.push(Violation::invalid_value(
            field,
            "must be at most 64 characters",
        ));
    } else if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        validator.push(Violation::invalid_value(
            field,
            "may only contain a-z, A-Z, 0-9, underscores and dashes",
        ));
    }
}

/// A tool invocation requested by the model.
///
/// In streamed deltas only the first fragment of a call carries `id` and the
/// function name; later fragments carry `index` and more `arguments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default = "function_type")]
    pub r#type: String,

    pub function: FunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            index: None,
            id: id.into(),
            r#type: function_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

/// Name and JSON-encoded arguments of a function call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default)]
    pub arguments: String,
}

impl FunctionCall {
    /// Decode the arguments the model produced
    pub fn parse_arguments<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.arguments)
    }
}

/// Controls which (if any) tool the model calls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    None,
    Auto,
    Required,
    #[serde(untagged)]
    Function {
        r#type: String,
        function: NamedFunction,
    },
}

impl ToolChoice {
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function {
            r#type: function_type(),
            function: NamedFunction { name: name.into() },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedFunction {
    pub name: String,
}

/// Legacy `function_call` control: `"none"`, `"auto"` or `{"name": ...}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionCallOption {
    None,
    Auto,
    Named(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FunctionCallOptionWire {
    Mode(String),
    Named { name: String },
}

impl Serialize for FunctionCallOption {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let wire = match self {
            FunctionCallOption::None => FunctionCallOptionWire::Mode("none".to_string()),
            FunctionCallOption::Auto => FunctionCallOptionWire::Mode("auto".to_string()),
            FunctionCallOption::Named(name) => FunctionCallOptionWire::Named { name: name.clone() },
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FunctionCallOption {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match FunctionCallOptionWire::deserialize(deserializer)? {
            FunctionCallOptionWire::Mode(mode) => match mode.as_str() {
                "none" => Ok(FunctionCallOption::None),
                "auto" => Ok(FunctionCallOption::Auto),
                other => Err(serde::de::Error::unknown_variant(other, &["none", "auto"])),
            },
            FunctionCallOptionWire::Named { name } => Ok(FunctionCallOption::Named(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn function_call_option_wire_forms() {
        assert_eq!(serde_json::to_value(FunctionCallOption::None).unwrap(), json!("none"));
        assert_eq!(serde_json::to_value(FunctionCallOption::Auto).unwrap(), json!("auto"));
        assert_eq!(
            serde_json::to_value(FunctionCallOption::Named("get_weather".into())).unwrap(),
            json!({"name": "get_weather"})
        );
        let parsed: FunctionCallOption = serde_json::from_value(json!({"name": "f"})).unwrap();
        assert_eq!(parsed, FunctionCallOption::Named("f".into()));
        assert!(serde_json::from_value::<FunctionCallOption>(json!("sometimes")).is_err());
    }

    #[test]
    fn tool_choice_wire_forms() {
        assert_eq!(serde_json::to_value(ToolChoice::Required).unwrap(), json!("required"));
        assert_eq!(
            serde_json::to_value(ToolChoice::function("lookup")).unwrap(),
            json!({"type": "function", "function": {"name": "lookup"}})
        );
    }

    #[test]
    fn tool_definition_is_tagged_by_type() {
        let tool = ToolDefinition::function_with_params("f", "does f", json!({"type": "object"}));
        assert_eq!(
            serde_json::to_value(&tool).unwrap(),
            json!({
                "type": "function",
                "function": {"name": "f", "description": "does f", "parameters": {"type": "object"}}
            })
        );
        assert_eq!(
            serde_json::to_value(ToolDefinition::CodeInterpreter).unwrap(),
            json!({"type": "code_interpreter"})
        );
    }

    #[test]
    fn streamed_tool_call_fragment_parses_without_id() {
        let fragment: ToolCall =
            serde_json::from_value(json!({"index": 0, "function": {"arguments": "{\"ci"}})).unwrap();
        assert_eq!(fragment.index, Some(0));
        assert!(fragment.id.is_empty());
        assert_eq!(fragment.function.arguments, "{\"ci");
    }

    #[test]
    fn parses_function_arguments() {
        #[derive(Deserialize)]
        struct Args {
            city: String,
        }
        let call = ToolCall::new("call_1", "weather", r#"{"city":"Oslo"}"#);
        let args: Args = call.function.parse_arguments().unwrap();
        assert_eq!(args.city, "Oslo");
    }

    #[test]
    fn function_names_are_checked() {
        let good = FunctionDefinition::builder().name("get_weather-v2").build();
        assert!(good.validate().is_ok());

        let bad = FunctionDefinition::builder().name("get weather").build();
        assert!(bad.validate().is_err());
    }
}
