//! Typed responses.
//!
//! Every response flattens a [`ResponseEnvelope`]: the wire-level `error`
//! object plus request metadata the client copies from response headers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

mod assistant;
mod audio;
mod chat;
mod completion;
mod embedding;
mod file;
mod fine_tune;
mod image;
mod model;
mod moderation;

pub use assistant::{AssistantResponse, ThreadResponse};
pub use audio::{AudioResponse, AudioSegment, AudioWord};
pub use chat::{
    ChatChoice, ChatCompletionChunk, ChatCompletionCreateResponse, ChatDelta, ChatLogprobs,
    TokenLogprob,
};
pub use completion::{CompletionChoice, CompletionCreateResponse, EditChoice, EditCreateResponse};
pub use embedding::{Embedding, EmbeddingCreateResponse, EmbeddingVector};
pub use file::{FileContentResponse, FileResponse};
pub use fine_tune::{
    AutoOr, FineTuneEvent, FineTuneResponse, FineTuningJobError, FineTuningJobEvent,
    FineTuningJobListResponse, FineTuningJobResponse, Hyperparameters,
};
pub use image::{ImageCreateResponse, ImageData};
pub use model::ModelResponse;
pub use moderation::{CreateModerationResponse, ModerationResult};

/// Error object the API returns under `"error"`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,

    /// Sent as a string by the cloud API and as a number by some gateways
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_deref().unwrap_or("no error message"))?;
        if let Some(code) = &self.code {
            write!(f, " (code: {code})")?;
        }
        if let Some(param) = &self.param {
            write!(f, " (param: {param})")?;
        }
        Ok(())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Code>::deserialize(deserializer)?.map(|code| match code {
        Code::Text(text) => text,
        Code::Number(number) => number.to_string(),
    }))
}

/// Success/error wrapper shared by every response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    /// `x-request-id`
    #[serde(skip)]
    pub request_id: Option<String>,

    /// `openai-organization`
    #[serde(skip)]
    pub organization: Option<String>,

    /// `openai-processing-ms`
    #[serde(skip)]
    pub processing_ms: Option<u64>,

    /// `openai-version`
    #[serde(skip)]
    pub api_version: Option<String>,
}

impl ResponseEnvelope {
    pub fn from_error(error: ApiError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Copy request metadata out of response headers
    pub fn fill_from_headers<'a, F>(&mut self, header: F)
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        self.request_id = header("x-request-id").map(str::to_string);
        self.organization = header("openai-organization").map(str::to_string);
        self.processing_ms = header("openai-processing-ms").and_then(|ms| ms.trim().parse().ok());
        self.api_version = header("openai-version").map(str::to_string);
    }
}

/// Common surface of every typed response
pub trait ApiResponse {
    fn envelope(&self) -> &ResponseEnvelope;

    fn envelope_mut(&mut self) -> &mut ResponseEnvelope;

    fn is_success(&self) -> bool {
        self.envelope().is_success()
    }

    fn error(&self) -> Option<&ApiError> {
        self.envelope().error.as_ref()
    }
}

macro_rules! impl_api_response {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::response::ApiResponse for $ty {
                fn envelope(&self) -> &$crate::response::ResponseEnvelope {
                    &self.envelope
                }

                fn envelope_mut(&mut self) -> &mut $crate::response::ResponseEnvelope {
                    &mut self.envelope
                }
            }
        )+
    };
}
pub(crate) use impl_api_response;

/// Paginated or plain list (`{"object": "list", "data": [...]}`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub object: String,

    pub data: Vec<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl<T> ListResponse<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> ApiResponse for ListResponse<T> {
    fn envelope(&self) -> &ResponseEnvelope {
        &self.envelope
    }

    fn envelope_mut(&mut self) -> &mut ResponseEnvelope {
        &mut self.envelope
    }
}

impl<T> IntoIterator for ListResponse<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// Result of any delete operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeletionStatusResponse {
    pub id: String,

    #[serde(default)]
    pub object: String,

    pub deleted: bool,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(DeletionStatusResponse);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_code_accepts_numbers() {
        let error: ApiError = serde_json::from_value(json!({
            "message": "Rate limit reached",
            "type": "requests",
            "param": null,
            "code": 429
        }))
        .unwrap();
        assert_eq!(error.code.as_deref(), Some("429"));
        assert_eq!(error.to_string(), "Rate limit reached (code: 429)");
    }

    #[test]
    fn envelope_metadata_comes_from_headers() {
        let mut envelope = ResponseEnvelope::default();
        envelope.fill_from_headers(|name| match name {
            "x-request-id" => Some("req_1"),
            "openai-processing-ms" => Some("42"),
            _ => None,
        });
        assert_eq!(envelope.request_id.as_deref(), Some("req_1"));
        assert_eq!(envelope.processing_ms, Some(42));
        assert!(envelope.organization.is_none());
        assert!(envelope.is_success());
    }

    #[test]
    fn deletion_status_with_embedded_error_is_not_success() {
        let response: DeletionStatusResponse = serde_json::from_value(json!({
            "id": "file-1",
            "object": "file",
            "deleted": false,
            "error": {"message": "busy"}
        }))
        .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.error().and_then(|e| e.message.as_deref()), Some("busy"));
    }

    #[test]
    fn list_response_exposes_cursors() {
        let list: ListResponse<serde_json::Value> = serde_json::from_value(json!({
            "object": "list",
            "data": [{"id": "a"}, {"id": "b"}],
            "first_id": "a",
            "last_id": "b",
            "has_more": false
        }))
        .unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.last_id.as_deref(), Some("b"));
        assert!(list.is_success());
    }
}
