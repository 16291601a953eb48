use serde::{Deserialize, Serialize};

use oai_ox_common::Timestamp;

use crate::{
    message::{ChatMessage, Role},
    tool::{FunctionCall, ToolCall},
    usage::Usage,
};

use super::{ResponseEnvelope, impl_api_response};

/// Response to a chat completion request.
///
/// Streamed chunks share this shape: their choices carry `delta` instead of
/// `message`, and usually no usage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionCreateResponse {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub object: String,

    pub created: Timestamp,

    #[serde(default)]
    pub model: String,

    pub choices: Vec<ChatChoice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(ChatCompletionCreateResponse);

/// One `data:` event of a streamed chat completion
pub type ChatCompletionChunk = ChatCompletionCreateResponse;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ChatMessage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<ChatDelta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<ChatLogprobs>,
}

/// Incremental message fragment of a streamed choice
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatLogprobs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<TokenLogprob>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenLogprob {
    pub token: String,

    pub logprob: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<Vec<u8>>,

    /// Most likely alternatives at this position
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_logprobs: Vec<TokenLogprob>,
}

impl ChatCompletionCreateResponse {
    pub fn first_choice(&self) -> Option<&ChatChoice> {
        self.choices.first()
    }

    /// Text of the first choice: the full message, or this chunk's fragment
    pub fn content(&self) -> Option<&str> {
        let choice = self.first_choice()?;
        match (&choice.message, &choice.delta) {
            (Some(message), _) => message.content.as_deref(),
            (None, Some(delta)) => delta.content.as_deref(),
            (None, None) => None,
        }
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.first_choice()?.finish_reason.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.finish_reason().is_some()
    }

    /// Tool calls requested by the first choice
    pub fn tool_calls(&self) -> &[ToolCall] {
        let Some(choice) = self.first_choice() else {
            return &[];
        };
        choice
            .message
            .as_ref()
            .and_then(|message| message.tool_calls.as_deref())
            .or_else(|| {
                choice
                    .delta
                    .as_ref()
                    .and_then(|delta| delta.tool_calls.as_deref())
            })
            .unwrap_or_default()
    }
}
