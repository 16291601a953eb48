use oai_ox_common::{
    HttpMethod, HttpRequest, HttpTransport, MultipartForm, ReqwestTransport, SseParser,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string_contains, header, header_regex, method, path},
};

#[tokio::test]
async fn sends_json_and_returns_status_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({"input": "hi", "model": "text-embedding-3-small"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "req_123")
                .set_body_json(json!({"object": "list", "data": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::default();
    let request = HttpRequest::new(HttpMethod::Post, format!("{}/v1/embeddings", server.uri()))
        .with_header("Authorization", "Bearer sk-test")
        .with_json(json!({"input": "hi", "model": "text-embedding-3-small"}));

    let response = transport.send(request).await.expect("request should succeed");

    assert_eq!(response.status, 200);
    assert_eq!(response.header("X-Request-Id"), Some("req_123"));
    let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(body["object"], "list");
}

#[tokio::test]
async fn non_success_status_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(401).set_body_string("nope"))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::default();
    let response = transport
        .send(HttpRequest::new(HttpMethod::Get, format!("{}/v1/models", server.uri())))
        .await
        .expect("transport should not fail on HTTP errors");

    assert_eq!(response.status, 401);
    assert!(!response.is_success());
    assert_eq!(&response.body[..], b"nope");
}

#[tokio::test]
async fn sends_multipart_forms() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/files"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("fine-tune"))
        .and(body_string_contains("train.jsonl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "file-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let form = MultipartForm::new()
        .text("purpose", "fine-tune")
        .file_from_bytes("file", "train.jsonl", b"{\"prompt\":\"a\"}\n".to_vec());
    let request = HttpRequest::new(HttpMethod::Post, format!("{}/v1/files", server.uri()))
        .with_multipart(form);

    let response = ReqwestTransport::default().send(request).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn streams_event_payloads() {
    let server = MockServer::start().await;
    let body = "data: {\"i\":0}\n\ndata: {\"i\":1}\n\ndata: [DONE]\n\n";
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let request = HttpRequest::new(
        HttpMethod::Post,
        format!("{}/v1/chat/completions", server.uri()),
    )
    .with_json(json!({"stream": true}));
    let response = ReqwestTransport::default()
        .send_streaming(request)
        .await
        .unwrap();
    assert!(response.is_success());

    let mut parser = SseParser::new(response.body);
    let mut events = Vec::new();
    while let Some(event) = parser.next_event().await.unwrap() {
        events.push(event);
    }
    assert_eq!(events, vec!["{\"i\":0}", "{\"i\":1}"]);
}
