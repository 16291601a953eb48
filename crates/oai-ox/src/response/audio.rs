use serde::{Deserialize, Serialize};

use super::{ResponseEnvelope, impl_api_response};

/// Transcription or translation result.
///
/// `json` and `verbose_json` formats decode directly; `text`, `srt` and `vtt`
/// bodies are plain text and end up in `text` unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AudioResponse {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<AudioSegment>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<AudioWord>>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(AudioResponse);

impl AudioResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioSegment {
    pub id: u32,

    #[serde(default)]
    pub seek: u32,

    pub start: f64,

    pub end: f64,

    pub text: String,

    #[serde(default)]
    pub tokens: Vec<u32>,

    #[serde(default)]
    pub temperature: f64,

    #[serde(default)]
    pub avg_logprob: f64,

    #[serde(default)]
    pub compression_ratio: f64,

    #[serde(default)]
    pub no_speech_prob: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioWord {
    pub word: String,

    pub start: f64,

    pub end: f64,
}
