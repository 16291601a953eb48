#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(clippy::unwrap_used)]

//! Typed OpenAI and Azure OpenAI client for Rust
//!
//! This crate provides:
//! - Chat and text completions, with streaming
//! - Embeddings and moderation
//! - Files, legacy fine-tunes and fine-tuning jobs
//! - Image generation, edits and variations
//! - Audio transcription and translation
//! - Assistants and threads
//!
//! Requests are validated before anything is sent. Fields with two typed
//! encodings (`stop` / `stop_as_list`, `content` / `contents`, ...) are
//! mutually exclusive; setting both is a [`ValidationErrors`] rather than a
//! silent choice.
//!
//! The same client talks to the public API or to an Azure deployment: the
//! [`ApiFlavor`] in [`ClientConfig`] picks the endpoint layout and auth header.
//!
//! # Example
//!
//! ```rust,no_run
//! use oai_ox::{ChatCompletionCreateRequest, ChatMessage, ClientConfig, Model, OpenAi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAi::new(ClientConfig::new("your-api-key"))?;
//!
//!     let request = ChatCompletionCreateRequest::builder()
//!         .model(Model::Gpt4oMini)
//!         .message(ChatMessage::system("Answer in one sentence."))
//!         .user_message("What is Rust?")
//!         .build();
//!
//!     let response = client.create_chat_completion(&request).await?;
//!     println!("{}", response.content().unwrap_or("No content"));
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
mod internal;
pub mod message;
pub mod model;
pub mod request;
pub mod response;
pub mod tool;
pub mod usage;
pub mod validation;

pub use client::OpenAi;
pub use config::{ApiFlavor, ClientConfig, ConfigError};
pub use endpoint::{
    AzureEndpoints, EndpointError, EndpointProvider, OpenAiEndpoints, Operation, ResolvedEndpoint,
};
pub use error::OpenAiError;
pub use message::{ChatMessage, ImageDetail, ImageUrl, MessageContent, Role};
pub use model::Model;
pub use tool::{
    FunctionCall, FunctionCallOption, FunctionDefinition, NamedFunction, ToolCall, ToolChoice,
    ToolDefinition,
};
pub use usage::Usage;
pub use validation::{OneOf, Validate, ValidationErrors, Violation, ViolationKind};

pub use request::{
    AssistantCreateRequest, AssistantModifyRequest, AudioCreateTranscriptionRequest,
    AudioResponseFormat, ChatCompletionCreateRequest, CodeInterpreterResources,
    CompletionCreateRequest, CreateModerationRequest, EditCreateRequest, EmbeddingCreateRequest,
    EncodingFormat, FileSearchResources, FileUploadRequest, FineTuneCreateRequest,
    FineTuningJobCreateRequest, FineTuningJobListRequest, ImageCreateRequest,
    ImageEditCreateRequest, ImageQuality, ImageResponseFormat, ImageSize, ImageStyle,
    ImageVariationCreateRequest, LogitBias, ModifyThreadRequest, ResponseFormat, StreamOptions,
    ThreadCreateRequest, ThreadMessage, TimestampGranularity, ToolResources, VectorStoreSpec,
};

pub use response::{
    ApiError, ApiResponse, AssistantResponse, AudioResponse, ChatChoice, ChatCompletionChunk,
    ChatCompletionCreateResponse, CompletionCreateResponse, CreateModerationResponse,
    DeletionStatusResponse, EditCreateResponse, EmbeddingCreateResponse, FileContentResponse,
    FileResponse, FineTuneResponse, FineTuningJobListResponse, FineTuningJobResponse,
    ImageCreateResponse, ListResponse, ModelResponse, ResponseEnvelope, ThreadResponse,
};

// Re-export the transport layer so custom transports need no extra dependency
pub use oai_ox_common::{
    BoxStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartForm,
    ReqwestTransport, RequestBody, StreamingResponse, Timestamp, TransportError, async_trait,
};
