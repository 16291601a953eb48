use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use oai_ox_common::Timestamp;

use crate::{request::ToolResources, tool::ToolDefinition};

use super::{ResponseEnvelope, impl_api_response};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantResponse {
    pub id: String,

    #[serde(default)]
    pub object: String,

    pub created_at: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    #[serde(default)]
    pub tools: Vec<ToolDefinition>,

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

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(AssistantResponse);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreadResponse {
    pub id: String,

    #[serde(default)]
    pub object: String,

    pub created_at: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_resources: Option<ToolResources>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(ThreadResponse);
