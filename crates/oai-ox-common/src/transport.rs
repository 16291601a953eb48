use std::collections::HashMap;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::{StreamExt, TryStreamExt, stream::BoxStream};
use reqwest::Method;
use serde_json::Value;

use crate::{error::TransportError, multipart::MultipartForm};

/// HTTP method for API endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Patch => Method::PATCH,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        })
    }
}

/// Body of an outgoing request
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

/// A fully resolved request handed to a transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn with_multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A buffered response. Header names are lowercase.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Raw body chunks of a streaming response
pub type ByteStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// A response whose body is still being received
pub struct StreamingResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: ByteStream,
}

impl std::fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl StreamingResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Drain the remaining body, used when the status says there is no stream to follow.
    pub async fn into_buffered(self) -> Result<HttpResponse, TransportError> {
        let body = self
            .body
            .try_fold(BytesMut::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok::<_, TransportError>(acc)
            })
            .await?;
        Ok(HttpResponse {
            status: self.status,
            headers: self.headers,
            body: body.freeze(),
        })
    }
}

/// The HTTP capability the client is built on.
///
/// Implementations perform exactly one round trip per call: no retries, no
/// timeouts beyond what the implementation itself is configured with.
#[async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    async fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> Result<StreamingResponse, TransportError>;
}

/// Default transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn build_request(
        &self,
        request: HttpRequest,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        let method: Method = request.method.into();
        let mut req = self.client.request(method, &request.url);

        for (name, value) in &request.headers {
            req = req.header(name, value);
        }

        req = match request.body {
            RequestBody::Empty => req,
            RequestBody::Json(value) => req.json(&value),
            RequestBody::Multipart(form) => req.multipart(form.into_reqwest()?),
        };

        Ok(req)
    }
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let res = self.build_request(request)?.send().await?;
        let status = res.status().as_u16();
        let headers = collect_headers(res.headers());
        let body = res.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> Result<StreamingResponse, TransportError> {
        let res = self.build_request(request)?.send().await?;
        let status = res.status().as_u16();
        let headers = collect_headers(res.headers());
        let body = res.bytes_stream().map_err(TransportError::from).boxed();

        Ok(StreamingResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_header_lookup_ignores_case() {
        let request = HttpRequest::new(HttpMethod::Get, "https://example.com")
            .with_header("OpenAI-Organization", "org-1");
        assert_eq!(request.header("openai-organization"), Some("org-1"));
        assert_eq!(request.header("authorization"), None);
    }

    #[test]
    fn response_headers_are_stored_lowercase() {
        let response = HttpResponse::new(200, "{}").with_header("X-Request-Id", "req_1");
        assert_eq!(response.header("x-request-id"), Some("req_1"));
        assert_eq!(response.header("X-REQUEST-ID"), Some("req_1"));
        assert!(response.is_success());
    }

    #[test]
    fn http_method_conversion() {
        assert_eq!(Method::from(HttpMethod::Get), Method::GET);
        assert_eq!(Method::from(HttpMethod::Post), Method::POST);
        assert_eq!(Method::from(HttpMethod::Put), Method::PUT);
        assert_eq!(Method::from(HttpMethod::Delete), Method::DELETE);
        assert_eq!(Method::from(HttpMethod::Patch), Method::PATCH);
    }

    #[tokio::test]
    async fn streaming_response_buffers_remaining_body() {
        let chunks: Vec<Result<Bytes, TransportError>> =
            vec![Ok(Bytes::from_static(b"{\"err")), Ok(Bytes::from_static(b"or\":1}"))];
        let response = StreamingResponse {
            status: 400,
            headers: HashMap::new(),
            body: futures_util::stream::iter(chunks).boxed(),
        };

        let buffered = response.into_buffered().await.expect("body should buffer");
        assert_eq!(buffered.status, 400);
        assert_eq!(&buffered.body[..], b"{\"error\":1}");
    }
}
