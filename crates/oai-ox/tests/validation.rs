use oai_ox::{
    ChatCompletionCreateRequest, ChatMessage, CompletionCreateRequest, CreateModerationRequest,
    EmbeddingCreateRequest, FileSearchResources, MessageContent, ModifyThreadRequest,
    ThreadCreateRequest, ThreadMessage, ToolResources, Validate, ViolationKind,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn every_exclusive_pair_is_reported() {
    let chat = ChatCompletionCreateRequest {
        model: Some("gpt-4o".into()),
        messages: vec![ChatMessage::user("hi")],
        stop: Some("\n".into()),
        stop_as_list: Some(strings(&["a"])),
        ..Default::default()
    };
    let errors = chat.validate().unwrap_err();
    assert!(errors.contains(ViolationKind::MutuallyExclusive, "stop"));
    assert!(errors.contains(ViolationKind::MutuallyExclusive, "stop_as_list"));

    let completion = CompletionCreateRequest {
        model: Some("gpt-3.5-turbo-instruct".into()),
        prompt: Some("Say hi".into()),
        prompt_as_list: Some(strings(&["Say hi"])),
        ..Default::default()
    };
    let errors = completion.validate().unwrap_err();
    assert!(errors.contains(ViolationKind::MutuallyExclusive, "prompt"));

    let embedding = EmbeddingCreateRequest {
        model: Some("text-embedding-3-small".into()),
        input: Some("x".into()),
        input_as_list: Some(strings(&["x"])),
        ..Default::default()
    };
    let errors = embedding.validate().unwrap_err();
    assert!(errors.contains(ViolationKind::MutuallyExclusive, "input_as_list"));

    let moderation = CreateModerationRequest {
        input: Some("x".into()),
        input_as_list: Some(strings(&["y"])),
        ..Default::default()
    };
    assert!(
        moderation
            .validate()
            .unwrap_err()
            .contains(ViolationKind::MutuallyExclusive, "input")
    );
}

#[test]
fn one_populated_side_is_enough() {
    let embedding = EmbeddingCreateRequest {
        model: Some("text-embedding-3-small".into()),
        input_as_list: Some(strings(&["a", "b"])),
        ..Default::default()
    };
    assert!(embedding.validate().is_ok());

    let moderation = CreateModerationRequest {
        input: Some("fine".into()),
        ..Default::default()
    };
    assert!(moderation.validate().is_ok());
}

#[test]
fn neither_side_of_a_required_pair_is_missing_required() {
    let moderation = CreateModerationRequest::default();
    let errors = moderation.validate().unwrap_err();
    assert!(errors.contains(ViolationKind::MissingRequired, "input"));
    assert!(errors.contains(ViolationKind::MissingRequired, "input_as_list"));
}

#[test]
fn violations_accumulate_in_check_order() {
    let chat = ChatCompletionCreateRequest {
        model: Some("gpt-4o".into()),
        messages: vec![ChatMessage::user("hi")],
        stop: Some("\n".into()),
        stop_as_list: Some(strings(&["a"])),
        temperature: Some(3.5),
        ..Default::default()
    };
    let violations = chat.validate().unwrap_err().into_violations();
    assert!(violations.len() >= 2);
    let stop = violations
        .iter()
        .position(|v| v.names("stop"))
        .expect("stop violation");
    let temperature = violations
        .iter()
        .position(|v| v.names("temperature"))
        .expect("temperature violation");
    assert!(stop < temperature);
    assert_eq!(violations[temperature].kind, ViolationKind::InvalidValue);
}

#[test]
fn message_content_pair_is_reported_with_its_index() {
    let mut message = ChatMessage::user("hello");
    message.contents = Some(vec![MessageContent::text("hello")]);

    let chat = ChatCompletionCreateRequest {
        model: Some("gpt-4o".into()),
        messages: vec![ChatMessage::system("be brief"), message],
        ..Default::default()
    };
    let errors = chat.validate().unwrap_err();
    assert!(errors.contains(ViolationKind::MutuallyExclusive, "messages[1].content"));
    assert!(errors.contains(ViolationKind::MutuallyExclusive, "messages[1].contents"));
}

#[test]
fn nested_tool_resources_are_prefixed() {
    let resources = ToolResources {
        file_search: Some(FileSearchResources {
            vector_store_ids: Some(strings(&["vs_1"])),
            vector_stores: Some(Vec::new()),
        }),
        ..Default::default()
    };

    let create = ThreadCreateRequest {
        messages: Some(vec![ThreadMessage::user("hi")]),
        tool_resources: Some(resources.clone()),
        ..Default::default()
    };
    assert!(create.validate().unwrap_err().contains(
        ViolationKind::MutuallyExclusive,
        "tool_resources.file_search.vector_store_ids"
    ));

    let modify = ModifyThreadRequest {
        tool_resources: Some(resources),
        ..Default::default()
    };
    assert!(modify.validate().unwrap_err().contains(
        ViolationKind::MutuallyExclusive,
        "tool_resources.file_search.vector_stores"
    ));
}

#[test]
fn serializing_an_invalid_pair_fails() {
    let chat = ChatCompletionCreateRequest {
        model: Some("gpt-4o".into()),
        messages: vec![ChatMessage::user("hi")],
        stop: Some("\n".into()),
        stop_as_list: Some(strings(&["a"])),
        ..Default::default()
    };
    let error = serde_json::to_value(&chat).unwrap_err();
    assert!(error.to_string().contains("mutually exclusive"), "{error}");

    let resources = FileSearchResources {
        vector_store_ids: Some(strings(&["vs_1"])),
        vector_stores: Some(Vec::new()),
    };
    assert!(serde_json::to_value(&resources).is_err());
}

#[test]
fn both_encodings_share_one_wire_name() {
    let single = CompletionCreateRequest {
        model: Some("m".into()),
        prompt: Some("one".into()),
        ..Default::default()
    };
    let list = CompletionCreateRequest {
        model: Some("m".into()),
        prompt_as_list: Some(strings(&["one", "two"])),
        ..Default::default()
    };

    let single = serde_json::to_value(&single).unwrap();
    let list = serde_json::to_value(&list).unwrap();
    assert_eq!(single["prompt"], "one");
    assert_eq!(list["prompt"], serde_json::json!(["one", "two"]));
    assert!(single.get("prompt_as_list").is_none());
    assert!(list.get("prompt_as_list").is_none());
}

#[test]
fn list_payloads_deserialize_into_the_list_side() {
    let request: EmbeddingCreateRequest = serde_json::from_value(serde_json::json!({
        "model": "text-embedding-3-small",
        "input": ["a", "b"]
    }))
    .unwrap();
    assert_eq!(request.input, None);
    assert_eq!(request.input_as_list, Some(strings(&["a", "b"])));
}
