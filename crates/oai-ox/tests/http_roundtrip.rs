use futures_util::StreamExt;
use oai_ox::{
    ApiFlavor, ChatCompletionCreateRequest, ClientConfig, EmbeddingCreateRequest, OpenAi,
    OpenAiError,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, query_param},
};

fn client_for(server: &MockServer) -> OpenAi {
    let config = ClientConfig::builder()
        .api_key("sk-test")
        .base_url(server.uri())
        .default_model("gpt-4o-mini")
        .build();
    OpenAi::new(config).unwrap()
}

#[tokio::test]
async fn chat_completion_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{"role": "user", "content": "ping"}]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "req_wire")
                .set_body_json(json!({
                    "id": "chatcmpl-9",
                    "object": "chat.completion",
                    "created": 1_700_000_000,
                    "model": "gpt-4o-mini",
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": "pong"},
                        "finish_reason": "stop"
                    }]
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ChatCompletionCreateRequest::builder()
        .user_message("ping")
        .build();
    let response = client.create_chat_completion(&request).await.unwrap();

    assert_eq!(response.content(), Some("pong"));
    assert_eq!(response.envelope.request_id.as_deref(), Some("req_wire"));
}

#[tokio::test]
async fn api_errors_keep_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-request-id", "req_limited")
                .set_body_json(json!({
                    "error": {
                        "message": "Rate limit reached",
                        "type": "requests",
                        "code": "rate_limit_exceeded"
                    }
                })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = EmbeddingCreateRequest::builder()
        .input("hello")
        .build();
    let error = client.create_embedding(&request).await.unwrap_err();

    assert_eq!(error.status(), Some(429));
    assert_eq!(error.request_id(), Some("req_limited"));
    assert!(error.to_string().contains("Rate limit reached"), "{error}");
    assert!(!error.is_local());
}

#[tokio::test]
async fn streaming_over_http() {
    let body = [
        json!({"id": "c", "object": "chat.completion.chunk", "created": 1, "model": "gpt-4o-mini",
               "choices": [{"index": 0, "delta": {"role": "assistant", "content": "Hel"}, "finish_reason": null}]}),
        json!({"id": "c", "object": "chat.completion.chunk", "created": 1, "model": "gpt-4o-mini",
               "choices": [{"index": 0, "delta": {"content": "lo"}, "finish_reason": "stop"}]}),
    ]
    .iter()
    .map(|event| format!("data: {event}\n\n"))
    .chain(std::iter::once("data: [DONE]\n\n".to_string()))
    .collect::<String>();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("accept", "text/event-stream"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ChatCompletionCreateRequest::builder()
        .user_message("hi")
        .build();
    let mut stream = client.stream_chat_completion(&request).unwrap();

    let mut text = String::new();
    let mut chunks = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.unwrap();
        text.push_str(chunk.content().unwrap_or_default());
        chunks += 1;
    }
    assert_eq!(chunks, 2);
    assert_eq!(text, "Hello");
}

#[tokio::test]
async fn azure_flavor_against_a_custom_host() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/embed-small/embeddings"))
        .and(query_param("api-version", "2024-06-01"))
        .and(header("api-key", "azure-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "model": "text-embedding-3-small",
            "data": [{"object": "embedding", "index": 0, "embedding": [0.25, -0.5]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .api_key("azure-key")
        .base_url(server.uri())
        .flavor(ApiFlavor::Azure {
            resource_name: None,
            deployment_id: "embed-small".into(),
            api_version: "2024-06-01".into(),
        })
        .build();
    let client = OpenAi::new(config).unwrap();

    let request = EmbeddingCreateRequest::builder()
        .model("text-embedding-3-small")
        .input("hello")
        .build();
    let response = client.create_embedding(&request).await.unwrap();
    assert_eq!(response.vectors(), vec![&[0.25, -0.5][..]]);
}

#[tokio::test]
async fn connection_failures_are_transport_errors() {
    let config = ClientConfig::builder()
        .api_key("sk-test")
        .base_url("http://127.0.0.1:1")
        .default_model("gpt-4o-mini")
        .build();
    let client = OpenAi::new(config).unwrap();

    let request = ChatCompletionCreateRequest::builder()
        .user_message("hi")
        .build();
    let error = client.create_chat_completion(&request).await.unwrap_err();
    assert!(matches!(error, OpenAiError::Transport(_)), "{error:?}");
}
