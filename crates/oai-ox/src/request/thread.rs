use std::collections::HashMap;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    message::Role,
    validation::{Validate, ValidationErrors, Validator, Violation, check_metadata},
};

use super::ToolResources;

/// A message seeded into a new thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    /// `user` or `assistant`
    pub role: Role,

    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl ThreadMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            metadata: None,
        }
    }
}

impl Validate for ThreadMessage {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        if !matches!(self.role, Role::User | Role::Assistant) {
            validator.push(Violation::invalid_value(
                "role",
                format!("thread messages must be user or assistant, got {}", self.role),
            ));
        }
        validator.require_str("content", &self.content);
        check_metadata(&mut validator, self.metadata.as_ref());
        validator.finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Builder)]
pub struct ThreadCreateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<ThreadMessage>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl Validate for ThreadCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        for (index, message) in self.messages.iter().flatten().enumerate() {
            validator.nested(&format!("messages[{index}]"), message.validate());
        }
        if let Some(resources) = &self.tool_resources {
            validator.nested("tool_resources", resources.validate());
        }
        check_metadata(&mut validator, self.metadata.as_ref());
        validator.finish()
    }
}

/// Replace a thread's tool resources and metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Builder)]
pub struct ModifyThreadRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,

    /// Up to 16 pairs; keys at most 64 characters, values at most 512
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl Validate for ModifyThreadRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        if let Some(resources) = &self.tool_resources {
            validator.nested("tool_resources", resources.validate());
        }
        check_metadata(&mut validator, self.metadata.as_ref());
        validator.finish()
    }
}
