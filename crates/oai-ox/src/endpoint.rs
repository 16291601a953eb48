//! Maps logical operations to concrete request paths.
//!
//! The operation table is a closed enum with exhaustive matches, so adding an
//! operation without a template does not compile. Two path families exist:
//! the public cloud (`/v1/chat/completions`) and Azure-hosted deployments
//! (`/openai/deployments/{deployment}/chat/completions?api-version=...`).

use std::fmt;

use oai_ox_common::HttpMethod;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;
use url::form_urlencoded;

pub const DEFAULT_OPENAI_API_VERSION: &str = "v1";
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-06-01";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// The name does not correspond to any known operation
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    #[error("operation `{operation}` requires {expected} path parameter(s), got {got}")]
    MissingPathParameter {
        operation: Operation,
        expected: usize,
        got: usize,
    },

    #[error("operation `{operation}` takes {expected} path parameter(s), got {got}")]
    UnexpectedPathParameter {
        operation: Operation,
        expected: usize,
        got: usize,
    },
}

fn unknown_operation(name: &str) -> EndpointError {
    EndpointError::UnknownOperation(name.to_string())
}

/// Every remote action this client knows how to address.
///
/// Parses from and displays as kebab-case (`create-chat-completion`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(
    serialize_all = "kebab-case",
    parse_err_ty = EndpointError,
    parse_err_fn = unknown_operation
)]
pub enum Operation {
    ListModels,
    RetrieveModel,
    CreateCompletion,
    CreateEdit,
    ListFiles,
    UploadFile,
    DeleteFile,
    RetrieveFile,
    RetrieveFileContent,
    CreateFineTune,
    ListFineTunes,
    RetrieveFineTune,
    CancelFineTune,
    ListFineTuneEvents,
    DeleteFineTune,
    CreateFineTuningJob,
    ListFineTuningJobs,
    RetrieveFineTuningJob,
    CancelFineTuningJob,
    ListFineTuningJobEvents,
    DeleteFineTuningJob,
    CreateEmbedding,
    CreateModeration,
    CreateImage,
    EditImage,
    CreateImageVariation,
    CreateChatCompletion,
    CreateAudioTranscription,
    CreateAudioTranslation,
    CreateAssistant,
    ListAssistants,
    RetrieveAssistant,
    ModifyAssistant,
    DeleteAssistant,
    CreateThread,
    RetrieveThread,
    ModifyThread,
    DeleteThread,
}

impl Operation {
    pub fn method(self) -> HttpMethod {
        use Operation::*;
        match self {
            ListModels | RetrieveModel | ListFiles | RetrieveFile | RetrieveFileContent
            | ListFineTunes | RetrieveFineTune | ListFineTuneEvents | ListFineTuningJobs
            | RetrieveFineTuningJob | ListFineTuningJobEvents | ListAssistants
            | RetrieveAssistant | RetrieveThread => HttpMethod::Get,
            DeleteFile | DeleteFineTune | DeleteFineTuningJob | DeleteAssistant
            | DeleteThread => HttpMethod::Delete,
            CreateCompletion | CreateEdit | UploadFile | CreateFineTune | CancelFineTune
            | CreateFineTuningJob | CancelFineTuningJob | CreateEmbedding | CreateModeration
            | CreateImage | EditImage | CreateImageVariation | CreateChatCompletion
            | CreateAudioTranscription | CreateAudioTranslation | CreateAssistant
            | ModifyAssistant | CreateThread | ModifyThread => HttpMethod::Post,
        }
    }

    /// Path template relative to the flavor prefix; `{id}` is the single
    /// resource id an operation may take.
    pub fn template(self) -> &'static str {
        use Operation::*;
        match self {
            ListModels => "models",
            RetrieveModel => "models/{id}",
            CreateCompletion => "completions",
            CreateEdit => "edits",
            ListFiles | UploadFile => "files",
            DeleteFile | RetrieveFile => "files/{id}",
            RetrieveFileContent => "files/{id}/content",
            CreateFineTune | ListFineTunes => "fine-tunes",
            RetrieveFineTune => "fine-tunes/{id}",
            CancelFineTune => "fine-tunes/{id}/cancel",
            ListFineTuneEvents => "fine-tunes/{id}/events",
            // Deleting a fine-tune deletes the model it produced
            DeleteFineTune | DeleteFineTuningJob => "models/{id}",
            CreateFineTuningJob | ListFineTuningJobs => "fine_tuning/jobs",
            RetrieveFineTuningJob => "fine_tuning/jobs/{id}",
            CancelFineTuningJob => "fine_tuning/jobs/{id}/cancel",
            ListFineTuningJobEvents => "fine_tuning/jobs/{id}/events",
            CreateEmbedding => "embeddings",
            CreateModeration => "moderations",
            CreateImage => "images/generations",
            EditImage => "images/edits",
            CreateImageVariation => "images/variations",
            CreateChatCompletion => "chat/completions",
            CreateAudioTranscription => "audio/transcriptions",
            CreateAudioTranslation => "audio/translations",
            CreateAssistant | ListAssistants => "assistants",
            RetrieveAssistant | ModifyAssistant | DeleteAssistant => "assistants/{id}",
            CreateThread => "threads",
            RetrieveThread | ModifyThread | DeleteThread => "threads/{id}",
        }
    }

    /// Number of resource ids the template interpolates
    pub fn path_params(self) -> usize {
        usize::from(self.template().contains("{id}"))
    }

    /// List operations that accept `after` / `limit`
    pub fn is_paginated(self) -> bool {
        matches!(
            self,
            Operation::ListFineTuningJobs
                | Operation::ListFineTuningJobEvents
                | Operation::ListAssistants
        )
    }

    /// Assistants and threads are beta APIs and need the `OpenAI-Beta` header
    pub fn is_assistants_api(self) -> bool {
        use Operation::*;
        matches!(
            self,
            CreateAssistant
                | ListAssistants
                | RetrieveAssistant
                | ModifyAssistant
                | DeleteAssistant
                | CreateThread
                | RetrieveThread
                | ModifyThread
                | DeleteThread
        )
    }

    fn render(self, params: &[&str]) -> Result<String, EndpointError> {
        let expected = self.path_params();
        let got = params.len();
        if got > expected {
            return Err(EndpointError::UnexpectedPathParameter {
                operation: self,
                expected,
                got,
            });
        }
        if got < expected || params.iter().any(|p| p.trim().is_empty()) {
            return Err(EndpointError::MissingPathParameter {
                operation: self,
                expected,
                got,
            });
        }
        let template = self.template();
        Ok(match params.first() {
            Some(id) => template.replace("{id}", id),
            None => template.to_string(),
        })
    }
}

/// A concrete method and path (including any query string) for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub operation: Operation,
    pub method: HttpMethod,
    pub path: String,
}

impl ResolvedEndpoint {
    /// Append `key=value`, choosing `?` or `&` by whether a query already exists
    #[must_use]
    pub fn with_query(mut self, key: &str, value: impl fmt::Display) -> Self {
        let separator = if self.path.contains('?') { '&' } else { '?' };
        let encoded: String = form_urlencoded::Serializer::new(String::new())
            .append_pair(key, &value.to_string())
            .finish();
        self.path.push(separator);
        self.path.push_str(&encoded);
        self
    }

    /// Append the optional pagination cursor and page size
    #[must_use]
    pub fn with_pagination(self, after: Option<&str>, limit: Option<u32>) -> Self {
        let endpoint = match after {
            Some(after) => self.with_query("after", after),
            None => self,
        };
        match limit {
            Some(limit) => endpoint.with_query("limit", limit),
            None => endpoint,
        }
    }

    /// Full URL against `base_url`, tolerating a trailing slash on the base
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }
}

/// Resolves operations to paths for one deployment flavor
pub trait EndpointProvider: fmt::Debug + Send + Sync {
    fn resolve(
        &self,
        operation: Operation,
        params: &[&str],
    ) -> Result<ResolvedEndpoint, EndpointError>;

    /// Resolve by kebab-case operation name
    fn resolve_named(
        &self,
        operation: &str,
        params: &[&str],
    ) -> Result<ResolvedEndpoint, EndpointError> {
        self.resolve(operation.parse()?, params)
    }
}

/// Public cloud paths: `/{api_version}/{template}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiEndpoints {
    pub api_version: String,
}

impl OpenAiEndpoints {
    pub fn new(api_version: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
        }
    }
}

impl Default for OpenAiEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_OPENAI_API_VERSION)
    }
}

impl EndpointProvider for OpenAiEndpoints {
    fn resolve(
        &self,
        operation: Operation,
        params: &[&str],
    ) -> Result<ResolvedEndpoint, EndpointError> {
        let path = format!(
            "/{}/{}",
            self.api_version.trim_matches('/'),
            operation.render(params)?
        );
        Ok(ResolvedEndpoint {
            operation,
            method: operation.method(),
            path,
        })
    }
}

/// Azure-hosted paths.
///
/// Model-bound operations live under `/openai/deployments/{deployment}/`;
/// assistants and threads are account-level and live under `/openai/`. Every
/// path carries the `api-version` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureEndpoints {
    pub deployment_id: String,
    pub api_version: String,
}

impl AzureEndpoints {
    pub fn new(deployment_id: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            api_version: api_version.into(),
        }
    }
}

impl EndpointProvider for AzureEndpoints {
    fn resolve(
        &self,
        operation: Operation,
        params: &[&str],
    ) -> Result<ResolvedEndpoint, EndpointError> {
        let relative = operation.render(params)?;
        let prefix = if operation.is_assistants_api() {
            "/openai".to_string()
        } else {
            let deployment: String =
                form_urlencoded::byte_serialize(self.deployment_id.as_bytes()).collect();
            format!("/openai/deployments/{deployment}")
        };
        let endpoint = ResolvedEndpoint {
            operation,
            method: operation.method(),
            path: format!("{prefix}/{relative}"),
        };
        Ok(endpoint.with_query("api-version", &self.api_version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_operation_name_parses_back() {
        for operation in Operation::iter() {
            let name = operation.to_string();
            assert_eq!(name.parse::<Operation>(), Ok(operation), "{name}");
        }
    }

    #[test]
    fn kebab_case_names() {
        assert_eq!(
            Operation::ListFineTuningJobEvents.to_string(),
            "list-fine-tuning-job-events"
        );
        assert_eq!(Operation::EditImage.to_string(), "edit-image");
    }

    #[test]
    fn query_separator_depends_on_existing_query() {
        let endpoint = ResolvedEndpoint {
            operation: Operation::ListFineTuningJobs,
            method: HttpMethod::Get,
            path: "/v1/fine_tuning/jobs".into(),
        };
        let endpoint = endpoint.with_pagination(Some("ftjob-1"), Some(20));
        assert_eq!(endpoint.path, "/v1/fine_tuning/jobs?after=ftjob-1&limit=20");
    }

    #[test]
    fn url_joins_without_double_slash() {
        let endpoint = OpenAiEndpoints::default()
            .resolve(Operation::ListModels, &[])
            .unwrap();
        assert_eq!(
            endpoint.url("https://api.openai.com/"),
            "https://api.openai.com/v1/models"
        );
    }
}
