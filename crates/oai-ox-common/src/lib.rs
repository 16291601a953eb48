#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(clippy::pedantic, clippy::unwrap_used)]

//! Transport plumbing shared by the oai-ox client
//!
//! The client never talks to an HTTP library directly. It builds
//! [`HttpRequest`] values and hands them to an [`HttpTransport`]; the default
//! [`ReqwestTransport`] sends them with reqwest. Streaming bodies are framed
//! into server-sent-event payloads by [`SseParser`].

pub mod error;
pub mod multipart;
pub mod streaming;
pub mod timestamp;
pub mod transport;
pub mod usage;

pub use error::{CommonRequestError, TransportError};
pub use multipart::{FormPart, MultipartForm};
pub use streaming::{DONE_SENTINEL, SseParser, parse_sse_events};
pub use timestamp::Timestamp;
pub use transport::{
    ByteStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
    RequestBody, StreamingResponse,
};
pub use usage::TokenUsage;

/// Re-export common types for convenience
pub use async_trait::async_trait;
pub use futures_util::stream::BoxStream;
