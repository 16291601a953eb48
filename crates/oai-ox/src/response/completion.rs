use serde::{Deserialize, Serialize};
use serde_json::Value;

use oai_ox_common::Timestamp;

use crate::usage::Usage;

use super::{ResponseEnvelope, impl_api_response};

/// Legacy text completion; streamed chunks share this shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionCreateResponse {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub object: String,

    pub created: Timestamp,

    #[serde(default)]
    pub model: String,

    pub choices: Vec<CompletionChoice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(CompletionCreateResponse);

impl CompletionCreateResponse {
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.text.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub index: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditCreateResponse {
    #[serde(default)]
    pub object: String,

    pub created: Timestamp,

    pub choices: Vec<EditChoice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(EditCreateResponse);

impl EditCreateResponse {
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.text.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditChoice {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub index: u32,
}
