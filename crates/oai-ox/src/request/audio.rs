use bon::Builder;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use strum::Display;

use oai_ox_common::MultipartForm;

use crate::validation::{Validate, ValidationErrors, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AudioResponseFormat {
    Json,
    Text,
    Srt,
    VerboseJson,
    Vtt,
}

impl AudioResponseFormat {
    /// Formats whose body is not JSON
    pub fn is_plain_text(self) -> bool {
        matches!(self, Self::Text | Self::Srt | Self::Vtt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimestampGranularity {
    Word,
    Segment,
}

/// Shared by transcriptions and translations; translations ignore
/// `language` and `timestamp_granularities`.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct AudioCreateTranscriptionRequest {
    #[builder(into)]
    pub file: Bytes,

    /// Used for the multipart file name and MIME type
    #[builder(into)]
    pub file_name: String,

    #[builder(into)]
    pub model: String,

    #[builder(into)]
    pub prompt: Option<String>,

    pub response_format: Option<AudioResponseFormat>,

    /// 0..=1
    pub temperature: Option<f32>,

    /// ISO-639-1 code of the input audio
    #[builder(into)]
    pub language: Option<String>,

    /// Requires `response_format = verbose_json`
    pub timestamp_granularities: Option<Vec<TimestampGranularity>>,
}

impl AudioCreateTranscriptionRequest {
    pub fn to_form(&self, translation: bool) -> MultipartForm {
        let mut form = MultipartForm::new()
            .file_from_bytes("file", self.file_name.clone(), self.file.clone())
            .text("model", self.model.clone())
            .optional_text("prompt", self.prompt.as_ref())
            .optional_text("response_format", self.response_format)
            .optional_text("temperature", self.temperature);
        if translation {
            return form;
        }

        form = form.optional_text("language", self.language.as_ref());
        for granularity in self.timestamp_granularities.iter().flatten() {
            form = form.text("timestamp_granularities[]", granularity.to_string());
        }
        form
    }

    /// Whether the response body is plain text rather than JSON
    pub fn expects_plain_text(&self) -> bool {
        self.response_format
            .is_some_and(AudioResponseFormat::is_plain_text)
    }
}

impl Validate for AudioCreateTranscriptionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.require_bytes("file", &self.file);
        validator.require_str("file_name", &self.file_name);
        validator.require_str("model", &self.model);
        validator.range("temperature", self.temperature, 0.0, 1.0);
        validator.finish()
    }
}
