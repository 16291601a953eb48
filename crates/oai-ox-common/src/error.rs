use thiserror::Error;

/// Failures raised by an [`HttpTransport`](crate::transport::HttpTransport)
/// before a status line is available, or while reading the body.
#[derive(Error, Debug)]
pub enum TransportError {
    /// reqwest failed to connect, send or read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request could not be converted into something the transport can send
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Custom transports report their own failures through this variant
    #[error("Transport error: {0}")]
    Other(String),
}

/// Common errors that can occur while decoding transport output
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// The underlying transport failed
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid event data in streaming response
    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    /// UTF-8 conversion error
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}
