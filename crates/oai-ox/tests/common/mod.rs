#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use bytes::Bytes;
use oai_ox::{
    ApiFlavor, ClientConfig, HttpRequest, HttpResponse, HttpTransport, OpenAi, RequestBody,
    StreamingResponse, TransportError, async_trait,
};
use serde_json::Value;

/// In-memory transport that records every request and replays queued responses
#[derive(Debug, Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<HttpResponse>>,
    /// Streaming bodies are cut into pieces of this many bytes
    chunk_size: usize,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            chunk_size: 7,
            ..Self::default()
        })
    }

    pub fn respond_with(&self, response: HttpResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn respond_json(&self, status: u16, body: Value) {
        self.respond_with(HttpResponse::new(status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    /// JSON body of the last request
    pub fn last_json(&self) -> Value {
        match self.last_request().body {
            RequestBody::Json(value) => value,
            other => panic!("expected a JSON body, got {other:?}"),
        }
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Other("no response queued".to_string()))
    }

    async fn send_streaming(
        &self,
        request: HttpRequest,
    ) -> Result<StreamingResponse, TransportError> {
        let response = self.send(request).await?;
        let chunks: Vec<Result<Bytes, TransportError>> = response
            .body
            .chunks(self.chunk_size)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();
        Ok(StreamingResponse {
            status: response.status,
            headers: response.headers,
            body: Box::pin(futures_util::stream::iter(chunks)),
        })
    }
}

pub fn cloud_client(transport: &Arc<RecordingTransport>) -> OpenAi {
    let config = ClientConfig::builder()
        .api_key("sk-test")
        .organization("org-test")
        .build();
    OpenAi::with_transport(config, transport.clone()).unwrap()
}

pub fn azure_client(transport: &Arc<RecordingTransport>) -> OpenAi {
    let config = ClientConfig::builder()
        .api_key("azure-key")
        .flavor(ApiFlavor::azure("my-resource", "gpt-4o-deploy"))
        .build();
    OpenAi::with_transport(config, transport.clone()).unwrap()
}

/// Build an SSE body from JSON payloads, terminated by `[DONE]`
pub fn sse_body(events: &[Value]) -> String {
    let mut body = String::new();
    for event in events {
        body.push_str(&format!("data: {event}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

pub fn chat_response(content: &str) -> Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
    })
}

pub fn chat_chunk(content: &str, finish_reason: Option<&str>) -> Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "delta": {"content": content},
            "finish_reason": finish_reason
        }]
    })
}
