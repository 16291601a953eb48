//! Typed requests, one per operation.
//!
//! Every request implements [`Validate`](crate::validation::Validate). Requests
//! with an exclusive pair (`stop`/`stop_as_list`, `prompt`/`prompt_as_list`,
//! ...) serialize through a private wire struct and refuse to serialize when
//! both sides are set.

use std::{borrow::Cow, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use crate::validation::{Validator, Violation};

mod assistant;
mod audio;
mod chat;
mod completion;
mod embedding;
mod file;
mod fine_tune;
mod image;
mod thread;

pub use assistant::{
    AssistantCreateRequest, AssistantModifyRequest, CodeInterpreterResources,
    FileSearchResources, ToolResources, VectorStoreSpec,
};
pub use audio::{AudioCreateTranscriptionRequest, AudioResponseFormat, TimestampGranularity};
pub use chat::{ChatCompletionCreateRequest, ResponseFormat, StreamOptions};
pub use completion::{CompletionCreateRequest, EditCreateRequest};
pub use embedding::{CreateModerationRequest, EmbeddingCreateRequest, EncodingFormat};
pub use file::FileUploadRequest;
pub use fine_tune::{FineTuneCreateRequest, FineTuningJobCreateRequest, FineTuningJobListRequest};
pub use image::{
    ImageCreateRequest, ImageEditCreateRequest, ImageQuality, ImageResponseFormat, ImageSize,
    ImageStyle, ImageVariationCreateRequest,
};
pub use thread::{ModifyThreadRequest, ThreadCreateRequest, ThreadMessage};

/// Token id to bias in -100..=100, sent as `{"50256": -100}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogitBias(BTreeMap<u32, i32>);

impl LogitBias {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, token: u32, bias: i32) -> Self {
        self.0.insert(token, bias);
        self
    }

    pub fn insert(&mut self, token: u32, bias: i32) -> Option<i32> {
        self.0.insert(token, bias)
    }

    pub fn get(&self, token: u32) -> Option<i32> {
        self.0.get(&token).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, i32)> + '_ {
        self.0.iter().map(|(token, bias)| (*token, *bias))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(u32, i32)> for LogitBias {
    fn from_iter<I: IntoIterator<Item = (u32, i32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Requests whose `model` the client may fill from its configured default
pub(crate) trait DefaultModel: Clone {
    fn model(&self) -> Option<&str>;

    fn set_model(&mut self, model: String);

    /// A copy with `model` set when it was unset or blank
    fn with_default_model(&self, default: Option<&str>) -> Cow<'_, Self> {
        match default {
            Some(default) if self.model().is_none_or(|model| model.trim().is_empty()) => {
                let mut request = self.clone();
                request.set_model(default.to_string());
                Cow::Owned(request)
            }
            _ => Cow::Borrowed(self),
        }
    }
}

pub(crate) fn check_model(validator: &mut Validator, model: Option<&str>) {
    if model.is_none_or(|model| model.trim().is_empty()) {
        validator.push(Violation::missing_required("model"));
    }
}

/// Ranges shared by chat and text completions
pub(crate) fn check_sampling(
    validator: &mut Validator,
    temperature: Option<f32>,
    top_p: Option<f32>,
    presence_penalty: Option<f32>,
    frequency_penalty: Option<f32>,
    n: Option<u32>,
) {
    validator.range("temperature", temperature, 0.0, 2.0);
    validator.range("top_p", top_p, 0.0, 1.0);
    validator.range("presence_penalty", presence_penalty, -2.0, 2.0);
    validator.range("frequency_penalty", frequency_penalty, -2.0, 2.0);
    if n == Some(0) {
        validator.push(Violation::invalid_value("n", "must be at least 1"));
    }
}

pub(crate) fn check_logit_bias(validator: &mut Validator, logit_bias: Option<&LogitBias>) {
    let Some(logit_bias) = logit_bias else {
        return;
    };
    for (token, bias) in logit_bias.iter() {
        if !(-100..=100).contains(&bias) {
            validator.push(Violation::invalid_value(
                "logit_bias",
                format!("bias {bias} for token {token} is outside -100..=100"),
            ));
        }
    }
}
