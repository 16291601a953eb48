use std::sync::Arc;

use oai_ox_common::{BoxStream, HttpTransport, ReqwestTransport};

use crate::{
    config::ClientConfig,
    endpoint::Operation,
    error::OpenAiError,
    internal::{RequestHelper, envelope_from_headers},
    request::{
        AssistantCreateRequest, AssistantModifyRequest, AudioCreateTranscriptionRequest,
        ChatCompletionCreateRequest, CompletionCreateRequest, CreateModerationRequest,
        DefaultModel, EditCreateRequest, EmbeddingCreateRequest, FileUploadRequest,
        FineTuneCreateRequest, FineTuningJobCreateRequest, FineTuningJobListRequest,
        ImageCreateRequest, ImageEditCreateRequest, ImageVariationCreateRequest,
        ModifyThreadRequest, ThreadCreateRequest,
    },
    response::{
        AssistantResponse, AudioResponse, ChatCompletionChunk, ChatCompletionCreateResponse,
        CompletionCreateResponse, CreateModerationResponse, DeletionStatusResponse,
        EditCreateResponse, EmbeddingCreateResponse, FileContentResponse, FileResponse,
        FineTuneEvent, FineTuneResponse, FineTuningJobEvent, FineTuningJobListResponse,
        FineTuningJobResponse, ImageCreateResponse, ListResponse, ModelResponse, ThreadResponse,
    },
    validation::{Validate, check_page_limit},
};

/// OpenAI / Azure OpenAI API client.
///
/// Cheap to clone; clones share the transport. Every method validates its
/// request before anything is sent.
#[derive(Debug, Clone)]
pub struct OpenAi {
    helper: RequestHelper,
    default_model: Option<String>,
}

impl OpenAi {
    /// Client over the default reqwest transport
    pub fn new(config: ClientConfig) -> Result<Self, OpenAiError> {
        Self::with_transport(config, Arc::new(ReqwestTransport::default()))
    }

    /// Client over a caller-supplied transport
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, OpenAiError> {
        let helper = RequestHelper::new(&config, transport)?;
        Ok(Self {
            helper,
            default_model: config.default_model,
        })
    }

    /// Client configured from `OPENAI_*` / `AZURE_OPENAI_*` variables
    pub fn from_env() -> Result<Self, OpenAiError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    fn with_model<'a, R: DefaultModel>(&self, request: &'a R) -> std::borrow::Cow<'a, R> {
        request.with_default_model(self.default_model.as_deref())
    }

    // Models

    pub async fn list_models(&self) -> Result<ListResponse<ModelResponse>, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::ListModels, &[])?;
        self.helper.send_empty(endpoint).await
    }

    pub async fn retrieve_model(&self, model: &str) -> Result<ModelResponse, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::RetrieveModel, &[model])?;
        self.helper.send_empty(endpoint).await
    }

    // Completions

    pub async fn create_completion(
        &self,
        request: &CompletionCreateRequest,
    ) -> Result<CompletionCreateResponse, OpenAiError> {
        let request = self.with_model(request);
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateCompletion, &[])?;
        self.helper.send_json(endpoint, &*request).await
    }

    /// Stream a text completion; `stream` is forced on
    pub fn stream_completion(
        &self,
        request: &CompletionCreateRequest,
    ) -> Result<BoxStream<'static, Result<CompletionCreateResponse, OpenAiError>>, OpenAiError>
    {
        let mut request = self.with_model(request).into_owned();
        request.stream = Some(true);
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateCompletion, &[])?;
        let body = serde_json::to_value(&request).map_err(OpenAiError::Serialize)?;
        Ok(self.helper.stream(endpoint, body))
    }

    pub async fn create_edit(
        &self,
        request: &EditCreateRequest,
    ) -> Result<EditCreateResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateEdit, &[])?;
        self.helper.send_json(endpoint, request).await
    }

    // Files

    pub async fn list_files(&self) -> Result<ListResponse<FileResponse>, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::ListFiles, &[])?;
        self.helper.send_empty(endpoint).await
    }

    pub async fn upload_file(&self, request: &FileUploadRequest) -> Result<FileResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::UploadFile, &[])?;
        self.helper.send_multipart(endpoint, request.to_form()).await
    }

    pub async fn retrieve_file(&self, file_id: &str) -> Result<FileResponse, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::RetrieveFile, &[file_id])?;
        self.helper.send_empty(endpoint).await
    }

    /// Download a file's raw content
    pub async fn retrieve_file_content(
        &self,
        file_id: &str,
    ) -> Result<FileContentResponse, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::RetrieveFileContent, &[file_id])?;
        let response = self.helper.send_raw(endpoint, None).await?;
        Ok(FileContentResponse {
            content_type: response.header("content-type").map(str::to_string),
            envelope: envelope_from_headers(&response),
            content: response.body,
        })
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<DeletionStatusResponse, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::DeleteFile, &[file_id])?;
        self.helper.send_empty(endpoint).await
    }

    // Legacy fine-tunes

    pub async fn create_fine_tune(
        &self,
        request: &FineTuneCreateRequest,
    ) -> Result<FineTuneResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateFineTune, &[])?;
        self.helper.send_json(endpoint, request).await
    }

    pub async fn list_fine_tunes(&self) -> Result<ListResponse<FineTuneResponse>, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::ListFineTunes, &[])?;
        self.helper.send_empty(endpoint).await
    }

    pub async fn retrieve_fine_tune(
        &self,
        fine_tune_id: &str,
    ) -> Result<FineTuneResponse, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::RetrieveFineTune, &[fine_tune_id])?;
        self.helper.send_empty(endpoint).await
    }

    pub async fn cancel_fine_tune(
        &self,
        fine_tune_id: &str,
    ) -> Result<FineTuneResponse, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::CancelFineTune, &[fine_tune_id])?;
        self.helper.send_empty(endpoint).await
    }

    pub async fn list_fine_tune_events(
        &self,
        fine_tune_id: &str,
    ) -> Result<ListResponse<FineTuneEvent>, OpenAiError> {
        let endpoint = self
            .helper
            .endpoint(Operation::ListFineTuneEvents, &[fine_tune_id])?;
        self.helper.send_empty(endpoint).await
    }

    /// Deletes the fine-tuned model
    pub async fn delete_fine_tune(
        &self,
        model: &str,
    ) -> Result<DeletionStatusResponse, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::DeleteFineTune, &[model])?;
        self.helper.send_empty(endpoint).await
    }

    // Fine-tuning jobs

    pub async fn create_fine_tuning_job(
        &self,
        request: &FineTuningJobCreateRequest,
    ) -> Result<FineTuningJobResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateFineTuningJob, &[])?;
        self.helper.send_json(endpoint, request).await
    }

    pub async fn list_fine_tuning_jobs(
        &self,
        request: &FineTuningJobListRequest,
    ) -> Result<FineTuningJobListResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self
            .helper
            .endpoint(Operation::ListFineTuningJobs, &[])?
            .with_pagination(request.after.as_deref(), request.limit);
        self.helper.send_empty(endpoint).await
    }

    pub async fn retrieve_fine_tuning_job(
        &self,
        job_id: &str,
    ) -> Result<FineTuningJobResponse, OpenAiError> {
        let endpoint = self
            .helper
            .endpoint(Operation::RetrieveFineTuningJob, &[job_id])?;
        self.helper.send_empty(endpoint).await
    }

    pub async fn cancel_fine_tuning_job(
        &self,
        job_id: &str,
    ) -> Result<FineTuningJobResponse, OpenAiError> {
        let endpoint = self
            .helper
            .endpoint(Operation::CancelFineTuningJob, &[job_id])?;
        self.helper.send_empty(endpoint).await
    }

    pub async fn list_fine_tuning_job_events(
        &self,
        job_id: &str,
        request: &FineTuningJobListRequest,
    ) -> Result<ListResponse<FineTuningJobEvent>, OpenAiError> {
        request.validate()?;
        let endpoint = self
            .helper
            .endpoint(Operation::ListFineTuningJobEvents, &[job_id])?
            .with_pagination(request.after.as_deref(), request.limit);
        self.helper.send_empty(endpoint).await
    }

    /// Deletes the model a job produced
    pub async fn delete_fine_tuning_job(
        &self,
        model: &str,
    ) -> Result<DeletionStatusResponse, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::DeleteFineTuningJob, &[model])?;
        self.helper.send_empty(endpoint).await
    }

    // Embeddings and moderation

    pub async fn create_embedding(
        &self,
        request: &EmbeddingCreateRequest,
    ) -> Result<EmbeddingCreateResponse, OpenAiError> {
        let request = self.with_model(request);
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateEmbedding, &[])?;
        self.helper.send_json(endpoint, &*request).await
    }

    pub async fn create_moderation(
        &self,
        request: &CreateModerationRequest,
    ) -> Result<CreateModerationResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateModeration, &[])?;
        self.helper.send_json(endpoint, request).await
    }

    // Images

    pub async fn create_image(
        &self,
        request: &ImageCreateRequest,
    ) -> Result<ImageCreateResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateImage, &[])?;
        self.helper.send_json(endpoint, request).await
    }

    pub async fn create_image_edit(
        &self,
        request: &ImageEditCreateRequest,
    ) -> Result<ImageCreateResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::EditImage, &[])?;
        self.helper.send_multipart(endpoint, request.to_form()).await
    }

    pub async fn create_image_variation(
        &self,
        request: &ImageVariationCreateRequest,
    ) -> Result<ImageCreateResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateImageVariation, &[])?;
        self.helper.send_multipart(endpoint, request.to_form()).await
    }

    // Chat

    pub async fn create_chat_completion(
        &self,
        request: &ChatCompletionCreateRequest,
    ) -> Result<ChatCompletionCreateResponse, OpenAiError> {
        let request = self.with_model(request);
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateChatCompletion, &[])?;
        self.helper.send_json(endpoint, &*request).await
    }

    /// Stream a chat completion; `stream` is forced on.
    ///
    /// Validation and request encoding happen here; the returned stream sends
    /// the request when first polled and ends at `[DONE]`.
    pub fn stream_chat_completion(
        &self,
        request: &ChatCompletionCreateRequest,
    ) -> Result<BoxStream<'static, Result<ChatCompletionChunk, OpenAiError>>, OpenAiError> {
        let mut request = self.with_model(request).into_owned();
        request.stream = Some(true);
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateChatCompletion, &[])?;
        let body = serde_json::to_value(&request).map_err(OpenAiError::Serialize)?;
        Ok(self.helper.stream(endpoint, body))
    }

    // Audio

    pub async fn create_transcription(
        &self,
        request: &AudioCreateTranscriptionRequest,
    ) -> Result<AudioResponse, OpenAiError> {
        self.send_audio(Operation::CreateAudioTranscription, request, false)
            .await
    }

    /// Translate audio into English
    pub async fn create_translation(
        &self,
        request: &AudioCreateTranscriptionRequest,
    ) -> Result<AudioResponse, OpenAiError> {
        self.send_audio(Operation::CreateAudioTranslation, request, true)
            .await
    }

    async fn send_audio(
        &self,
        operation: Operation,
        request: &AudioCreateTranscriptionRequest,
        translation: bool,
    ) -> Result<AudioResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self.helper.endpoint(operation, &[])?;
        let form = request.to_form(translation);
        if !request.expects_plain_text() {
            return self.helper.send_multipart(endpoint, form).await;
        }

        let response = self.helper.send_raw(endpoint, Some(form)).await?;
        let mut audio = AudioResponse::from_text(String::from_utf8_lossy(&response.body));
        audio.envelope = envelope_from_headers(&response);
        Ok(audio)
    }

    // Assistants

    pub async fn create_assistant(
        &self,
        request: &AssistantCreateRequest,
    ) -> Result<AssistantResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateAssistant, &[])?;
        self.helper.send_json(endpoint, request).await
    }

    /// One page of assistants, newest first
    pub async fn list_assistants(
        &self,
        after: Option<&str>,
        limit: Option<u32>,
    ) -> Result<ListResponse<AssistantResponse>, OpenAiError> {
        check_page_limit(limit)?;
        let endpoint = self
            .helper
            .endpoint(Operation::ListAssistants, &[])?
            .with_pagination(after, limit);
        self.helper.send_empty(endpoint).await
    }

    pub async fn retrieve_assistant(
        &self,
        assistant_id: &str,
    ) -> Result<AssistantResponse, OpenAiError> {
        let endpoint = self
            .helper
            .endpoint(Operation::RetrieveAssistant, &[assistant_id])?;
        self.helper.send_empty(endpoint).await
    }

    pub async fn modify_assistant(
        &self,
        assistant_id: &str,
        request: &AssistantModifyRequest,
    ) -> Result<AssistantResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self
            .helper
            .endpoint(Operation::ModifyAssistant, &[assistant_id])?;
        self.helper.send_json(endpoint, request).await
    }

    pub async fn delete_assistant(
        &self,
        assistant_id: &str,
    ) -> Result<DeletionStatusResponse, OpenAiError> {
        let endpoint = self
            .helper
            .endpoint(Operation::DeleteAssistant, &[assistant_id])?;
        self.helper.send_empty(endpoint).await
    }

    // Threads

    pub async fn create_thread(
        &self,
        request: &ThreadCreateRequest,
    ) -> Result<ThreadResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::CreateThread, &[])?;
        self.helper.send_json(endpoint, request).await
    }

    pub async fn retrieve_thread(&self, thread_id: &str) -> Result<ThreadResponse, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::RetrieveThread, &[thread_id])?;
        self.helper.send_empty(endpoint).await
    }

    pub async fn modify_thread(
        &self,
        thread_id: &str,
        request: &ModifyThreadRequest,
    ) -> Result<ThreadResponse, OpenAiError> {
        request.validate()?;
        let endpoint = self.helper.endpoint(Operation::ModifyThread, &[thread_id])?;
        self.helper.send_json(endpoint, request).await
    }

    pub async fn delete_thread(
        &self,
        thread_id: &str,
    ) -> Result<DeletionStatusResponse, OpenAiError> {
        let endpoint = self.helper.endpoint(Operation::DeleteThread, &[thread_id])?;
        self.helper.send_empty(endpoint).await
    }
}
