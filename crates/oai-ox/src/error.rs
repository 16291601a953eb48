use oai_ox_common::{CommonRequestError, TransportError};
use thiserror::Error;

use crate::{
    config::ConfigError,
    endpoint::EndpointError,
    response::{ApiError, ResponseEnvelope},
    validation::ValidationErrors,
};

/// Errors that can occur when calling the OpenAI API.
///
/// Nothing is retried: every variant reaches the caller as is.
#[derive(Debug, Error)]
pub enum OpenAiError {
    /// The request broke one of its own invariants; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// The transport failed before a status line was available
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-2xx response carrying an `{"error": {...}}` body
    #[error("API error (HTTP {status}): {}", api_summary(.envelope))]
    Api {
        status: u16,
        envelope: ResponseEnvelope,
    },

    /// Non-2xx response whose body is not an API error object
    #[error("Unexpected response (HTTP {status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// 2xx response that does not match the expected shape
    #[error("Failed to decode response (HTTP {status}): {source}")]
    Deserialize {
        status: u16,
        source: serde_json::Error,
        body: String,
    },

    #[error("Failed to encode request: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Malformed server-sent event
    #[error("Invalid event data: {0}")]
    InvalidEventData(String),
}

fn api_summary(envelope: &ResponseEnvelope) -> String {
    let mut summary = match &envelope.error {
        Some(error) => error.to_string(),
        None => "no error details".to_string(),
    };
    if let Some(request_id) = &envelope.request_id {
        summary.push_str(&format!(" [request id: {request_id}]"));
    }
    summary
}

impl OpenAiError {
    /// The API error object, for [`OpenAiError::Api`]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            OpenAiError::Api { envelope, .. } => envelope.error.as_ref(),
            _ => None,
        }
    }

    /// HTTP status, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenAiError::Api { status, .. }
            | OpenAiError::UnexpectedStatus { status, .. }
            | OpenAiError::Deserialize { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `x-request-id` of the failed call, for [`OpenAiError::Api`]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            OpenAiError::Api { envelope, .. } => envelope.request_id.as_deref(),
            _ => None,
        }
    }

    /// Whether the failure happened locally, before anything was sent
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            OpenAiError::Validation(_)
                | OpenAiError::Config(_)
                | OpenAiError::Endpoint(_)
                | OpenAiError::Serialize(_)
        )
    }
}

impl From<CommonRequestError> for OpenAiError {
    fn from(error: CommonRequestError) -> Self {
        match error {
            CommonRequestError::Transport(error) => OpenAiError::Transport(error),
            CommonRequestError::InvalidEventData(message) => OpenAiError::InvalidEventData(message),
            CommonRequestError::Utf8Error(error) => {
                OpenAiError::InvalidEventData(format!("UTF-8 decode error: {error}"))
            }
        }
    }
}
