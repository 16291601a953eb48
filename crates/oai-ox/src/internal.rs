use std::sync::Arc;

use async_stream::try_stream;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use oai_ox_common::{
    BoxStream, HttpRequest, HttpResponse, HttpTransport, MultipartForm, SseParser,
    StreamingResponse,
};

use crate::{
    config::{ClientConfig, ConfigError},
    endpoint::{EndpointProvider, Operation, ResolvedEndpoint},
    error::OpenAiError,
    response::{ApiError, ApiResponse, ResponseEnvelope},
};

/// Builds, sends and decodes every call the client makes
#[derive(Debug, Clone)]
pub(crate) struct RequestHelper {
    transport: Arc<dyn HttpTransport>,
    endpoints: Arc<dyn EndpointProvider>,
    base_url: String,
    headers: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ApiError>,
}

impl RequestHelper {
    pub(crate) fn new(
        config: &ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            transport,
            endpoints: config.endpoint_provider(),
            base_url: config.resolved_base_url()?,
            headers: config.auth_headers(),
        })
    }

    pub(crate) fn endpoint(
        &self,
        operation: Operation,
        params: &[&str],
    ) -> Result<ResolvedEndpoint, OpenAiError> {
        Ok(self.endpoints.resolve(operation, params)?)
    }

    fn build(&self, endpoint: &ResolvedEndpoint) -> HttpRequest {
        let mut request = HttpRequest::new(endpoint.method, endpoint.url(&self.base_url));
        for (name, value) in &self.headers {
            request = request.with_header(name.clone(), value.clone());
        }
        if endpoint.operation.is_assistants_api() {
            request = request.with_header("OpenAI-Beta", "assistants=v2");
        }
        request
    }

    /// POST a JSON body
    pub(crate) async fn send_json<B, T>(
        &self,
        endpoint: ResolvedEndpoint,
        body: &B,
    ) -> Result<T, OpenAiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + ApiResponse,
    {
        let body = serde_json::to_value(body).map_err(OpenAiError::Serialize)?;
        let request = self.build(&endpoint).with_json(body);
        let response = self.execute(&endpoint, request).await?;
        parse_response(&response)
    }

    pub(crate) async fn send_multipart<T>(
        &self,
        endpoint: ResolvedEndpoint,
        form: MultipartForm,
    ) -> Result<T, OpenAiError>
    where
        T: DeserializeOwned + ApiResponse,
    {
        let request = self.build(&endpoint).with_multipart(form);
        let response = self.execute(&endpoint, request).await?;
        parse_response(&response)
    }

    /// Calls without a body (GET, DELETE, cancel)
    pub(crate) async fn send_empty<T>(&self, endpoint: ResolvedEndpoint) -> Result<T, OpenAiError>
    where
        T: DeserializeOwned + ApiResponse,
    {
        let request = self.build(&endpoint);
        let response = self.execute(&endpoint, request).await?;
        parse_response(&response)
    }

    /// Successful response with the body left undecoded
    pub(crate) async fn send_raw(
        &self,
        endpoint: ResolvedEndpoint,
        form: Option<MultipartForm>,
    ) -> Result<HttpResponse, OpenAiError> {
        let mut request = self.build(&endpoint);
        if let Some(form) = form {
            request = request.with_multipart(form);
        }
        self.execute(&endpoint, request).await
    }

    async fn execute(
        &self,
        endpoint: &ResolvedEndpoint,
        request: HttpRequest,
    ) -> Result<HttpResponse, OpenAiError> {
        log::debug!(
            "{} {} ({})",
            request.method,
            request.url,
            endpoint.operation
        );
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(error_from_status(&response))
        }
    }

    /// Lazily POST `body` and decode each event payload as `T`.
    ///
    /// Nothing is sent until the stream is first polled.
    pub(crate) fn stream<T>(
        &self,
        endpoint: ResolvedEndpoint,
        body: Value,
    ) -> BoxStream<'static, Result<T, OpenAiError>>
    where
        T: DeserializeOwned + ApiResponse + Send + 'static,
    {
        let transport = Arc::clone(&self.transport);
        let request = self
            .build(&endpoint)
            .with_header("Accept", "text/event-stream")
            .with_json(body);
        let operation = endpoint.operation;

        Box::pin(try_stream! {
            log::debug!("{} {} ({operation}, streaming)", request.method, request.url);
            let response = transport.send_streaming(request).await?;

            if !response.is_success() {
                let buffered = response.into_buffered().await?;
                Err::<(), _>(error_from_status(&buffered))?;
            } else {
                let StreamingResponse { status, headers, body } = response;
                let header = |name: &str| headers.get(name).map(String::as_str);
                let mut parser = SseParser::new(body);

                while let Some(data) = parser.next_event().await? {
                    if let Ok(ErrorBody { error: Some(error) }) = serde_json::from_str(&data) {
                        let mut envelope = ResponseEnvelope::from_error(error);
                        envelope.fill_from_headers(header);
                        log::warn!("{operation} stream ended with an API error: {}", envelope.error.as_ref().map(ToString::to_string).unwrap_or_default());
                        Err::<(), _>(OpenAiError::Api { status, envelope })?;
                    }

                    let mut chunk: T = serde_json::from_str(&data).map_err(|e| {
                        OpenAiError::InvalidEventData(format!("{e}: {data}"))
                    })?;
                    chunk.envelope_mut().fill_from_headers(header);
                    yield chunk;
                }

                log::debug!("{operation} stream finished");
            }
        })
    }
}

/// Map a non-2xx response to [`OpenAiError::Api`] or [`OpenAiError::UnexpectedStatus`]
fn error_from_status(response: &HttpResponse) -> OpenAiError {
    let status = response.status;
    match serde_json::from_slice::<ErrorBody>(&response.body) {
        Ok(ErrorBody { error: Some(error) }) => {
            let mut envelope = ResponseEnvelope::from_error(error);
            envelope.fill_from_headers(|name| response.header(name));
            log::warn!(
                "API returned HTTP {status}: {}",
                envelope.error.as_ref().map(ToString::to_string).unwrap_or_default()
            );
            OpenAiError::Api { status, envelope }
        }
        _ => {
            let body = String::from_utf8_lossy(&response.body).into_owned();
            log::warn!("API returned HTTP {status} with an unrecognised body");
            OpenAiError::UnexpectedStatus { status, body }
        }
    }
}

/// Decode a 2xx body and copy request metadata from the headers
fn parse_response<T>(response: &HttpResponse) -> Result<T, OpenAiError>
where
    T: DeserializeOwned + ApiResponse,
{
    let mut parsed: T = serde_json::from_slice(&response.body).map_err(|source| {
        // A 2xx carrying only an error object is still an API error
        if let Ok(ErrorBody { error: Some(error) }) = serde_json::from_slice(&response.body) {
            let mut envelope = ResponseEnvelope::from_error(error);
            envelope.fill_from_headers(|name| response.header(name));
            return OpenAiError::Api {
                status: response.status,
                envelope,
            };
        }
        OpenAiError::Deserialize {
            status: response.status,
            source,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        }
    })?;
    parsed
        .envelope_mut()
        .fill_from_headers(|name| response.header(name));
    Ok(parsed)
}

/// Envelope for responses whose body is not JSON
pub(crate) fn envelope_from_headers(response: &HttpResponse) -> ResponseEnvelope {
    let mut envelope = ResponseEnvelope::default();
    envelope.fill_from_headers(|name| response.header(name));
    envelope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::DeletionStatusResponse;

    #[test]
    fn non_json_error_body_is_unexpected_status() {
        let response = HttpResponse::new(502, "Bad Gateway");
        match error_from_status(&response) {
            OpenAiError::UnexpectedStatus { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrong_shape_is_a_deserialize_error() {
        let response = HttpResponse::new(200, r#"{"unexpected": true}"#);
        let result = parse_response::<DeletionStatusResponse>(&response);
        assert!(matches!(result, Err(OpenAiError::Deserialize { status: 200, .. })));
    }

    #[test]
    fn success_body_gets_header_metadata() {
        let response = HttpResponse::new(200, r#"{"id": "file-1", "object": "file", "deleted": true}"#)
            .with_header("x-request-id", "req_9")
            .with_header("openai-version", "2020-10-01");
        let parsed = parse_response::<DeletionStatusResponse>(&response).unwrap();
        assert!(parsed.deleted);
        assert_eq!(parsed.envelope.request_id.as_deref(), Some("req_9"));
        assert_eq!(parsed.envelope.api_version.as_deref(), Some("2020-10-01"));
    }
}
