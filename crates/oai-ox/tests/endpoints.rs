use oai_ox::{
    AzureEndpoints, EndpointError, EndpointProvider, HttpMethod, OpenAiEndpoints, Operation,
};

#[test]
fn cloud_paths() {
    let endpoints = OpenAiEndpoints::default();

    let cases = [
        (Operation::CreateChatCompletion, vec![], "/v1/chat/completions"),
        (Operation::ListModels, vec![], "/v1/models"),
        (Operation::RetrieveFileContent, vec!["file-1"], "/v1/files/file-1/content"),
        (Operation::CancelFineTune, vec!["ft-1"], "/v1/fine-tunes/ft-1/cancel"),
        (Operation::ListFineTuningJobEvents, vec!["ftjob-1"], "/v1/fine_tuning/jobs/ftjob-1/events"),
        (Operation::DeleteFineTune, vec!["ft:gpt:1"], "/v1/models/ft:gpt:1"),
        (Operation::DeleteFineTuningJob, vec!["ft:gpt:2"], "/v1/models/ft:gpt:2"),
        (Operation::EditImage, vec![], "/v1/images/edits"),
        (Operation::ModifyThread, vec!["thread_1"], "/v1/threads/thread_1"),
    ];

    for (operation, params, expected) in cases {
        let resolved = endpoints.resolve(operation, &params).unwrap();
        assert_eq!(resolved.path, expected, "{operation}");
    }
}

#[test]
fn methods_follow_the_operation() {
    let endpoints = OpenAiEndpoints::default();
    assert_eq!(
        endpoints.resolve(Operation::DeleteFile, &["f"]).unwrap().method,
        HttpMethod::Delete
    );
    assert_eq!(
        endpoints.resolve(Operation::ListFiles, &[]).unwrap().method,
        HttpMethod::Get
    );
    assert_eq!(
        endpoints.resolve(Operation::CancelFineTuningJob, &["j"]).unwrap().method,
        HttpMethod::Post
    );
}

#[test]
fn custom_api_version() {
    let endpoints = OpenAiEndpoints::new("v2");
    let resolved = endpoints.resolve(Operation::CreateEmbedding, &[]).unwrap();
    assert_eq!(resolved.path, "/v2/embeddings");
}

#[test]
fn azure_deployment_paths() {
    let endpoints = AzureEndpoints::new("d1", "v1");
    let resolved = endpoints
        .resolve(Operation::CreateChatCompletion, &[])
        .unwrap();
    assert_eq!(
        resolved.path,
        "/openai/deployments/d1/chat/completions?api-version=v1"
    );

    let resolved = endpoints
        .resolve(Operation::RetrieveFile, &["file-9"])
        .unwrap();
    assert_eq!(
        resolved.path,
        "/openai/deployments/d1/files/file-9?api-version=v1"
    );
}

#[test]
fn azure_deployment_id_is_encoded() {
    let endpoints = AzureEndpoints::new("my deployment/1", "2024-06-01");
    let resolved = endpoints.resolve(Operation::CreateEmbedding, &[]).unwrap();
    assert_eq!(
        resolved.path,
        "/openai/deployments/my+deployment%2F1/embeddings?api-version=2024-06-01"
    );
}

#[test]
fn azure_assistants_have_no_deployment_segment() {
    let endpoints = AzureEndpoints::new("d1", "2024-06-01");
    let resolved = endpoints.resolve(Operation::ListAssistants, &[]).unwrap();
    assert_eq!(resolved.path, "/openai/assistants?api-version=2024-06-01");

    let paged = resolved.with_pagination(Some("asst_1"), Some(20));
    assert_eq!(
        paged.path,
        "/openai/assistants?api-version=2024-06-01&after=asst_1&limit=20"
    );
}

#[test]
fn resolve_by_name() {
    let endpoints = OpenAiEndpoints::default();
    let resolved = endpoints
        .resolve_named("create-chat-completion", &[])
        .unwrap();
    assert_eq!(resolved.operation, Operation::CreateChatCompletion);

    let error = endpoints.resolve_named("create-chat", &[]).unwrap_err();
    assert_eq!(error, EndpointError::UnknownOperation("create-chat".into()));
}

#[test]
fn parameter_count_is_checked() {
    let endpoints = OpenAiEndpoints::default();
    assert!(matches!(
        endpoints.resolve(Operation::RetrieveModel, &[]),
        Err(EndpointError::MissingPathParameter { expected: 1, got: 0, .. })
    ));
    assert!(matches!(
        endpoints.resolve(Operation::ListModels, &["extra"]),
        Err(EndpointError::UnexpectedPathParameter { expected: 0, got: 1, .. })
    ));
}

#[test]
fn parameterless_paths_have_no_trailing_artifacts() {
    use strum::IntoEnumIterator;

    let cloud = OpenAiEndpoints::default();
    for operation in Operation::iter().filter(|op| op.path_params() == 0) {
        let path = cloud.resolve(operation, &[]).unwrap().path;
        assert!(
            !path.ends_with('/') && !path.ends_with('?') && !path.ends_with('&'),
            "{operation}: {path}"
        );
        assert!(!path.contains('?'), "{operation}: {path}");
        assert!(!path.contains("//"), "{operation}: {path}");
    }
}
