use bon::Builder;
use serde::{Deserialize, Serialize, Serializer, ser::Error as _};

use crate::validation::{OneOf, Validate, ValidationErrors, Validator, Violation, exclusive};

use super::{DefaultModel, check_model};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EncodingFormat {
    Float,
    Base64,
}

/// Exactly one of `input` / `input_as_list` must be set
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Builder)]
#[serde(from = "EmbeddingWire")]
pub struct EmbeddingCreateRequest {
    #[builder(into)]
    pub model: Option<String>,

    #[builder(into)]
    pub input: Option<String>,

    /// At most 2048 inputs per request
    pub input_as_list: Option<Vec<String>>,

    pub encoding_format: Option<EncodingFormat>,

    /// Truncate output vectors (text-embedding-3 models only)
    pub dimensions: Option<u32>,

    #[builder(into)]
    pub user: Option<String>,
}

impl EmbeddingCreateRequest {
    /// The value sent as `"input"`
    pub fn effective_input(&self) -> Result<Option<OneOf<&String, &Vec<String>>>, Violation> {
        exclusive(("input", &self.input), ("input_as_list", &self.input_as_list))
    }
}

impl DefaultModel for EmbeddingCreateRequest {
    fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn set_model(&mut self, model: String) {
        self.model = Some(model);
    }
}

impl Validate for EmbeddingCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        check_model(&mut validator, self.model.as_deref());
        check_input(
            &mut validator,
            self.input.as_ref(),
            self.input_as_list.as_ref(),
        );
        validator.max_len("input_as_list", self.input_as_list.as_deref(), 2048);
        if self.dimensions == Some(0) {
            validator.push(Violation::invalid_value("dimensions", "must be at least 1"));
        }
        validator.finish()
    }
}

#[derive(Serialize, Deserialize)]
struct EmbeddingWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input: Option<OneOf<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    encoding_format: Option<EncodingFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dimensions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
}

impl From<EmbeddingWire> for EmbeddingCreateRequest {
    fn from(wire: EmbeddingWire) -> Self {
        let (input, input_as_list) = split_input(wire.input);
        Self {
            model: wire.model,
            input,
            input_as_list,
            encoding_format: wire.encoding_format,
            dimensions: wire.dimensions,
            user: wire.user,
        }
    }
}

impl Serialize for EmbeddingCreateRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let input = self.effective_input().map_err(S::Error::custom)?;
        EmbeddingWire {
            model: self.model.clone(),
            input: owned_input(input),
            encoding_format: self.encoding_format,
            dimensions: self.dimensions,
            user: self.user.clone(),
        }
        .serialize(serializer)
    }
}

/// Classify text against the usage policies
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Builder)]
#[serde(from = "ModerationWire")]
pub struct CreateModerationRequest {
    #[builder(into)]
    pub input: Option<String>,

    pub input_as_list: Option<Vec<String>>,

    /// `text-moderation-latest` when unset
    #[builder(into)]
    pub model: Option<String>,
}

impl CreateModerationRequest {
    pub fn effective_input(&self) -> Result<Option<OneOf<&String, &Vec<String>>>, Violation> {
        exclusive(("input", &self.input), ("input_as_list", &self.input_as_list))
    }
}

impl Validate for CreateModerationRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        check_input(
            &mut validator,
            self.input.as_ref(),
            self.input_as_list.as_ref(),
        );
        validator.finish()
    }
}

#[derive(Serialize, Deserialize)]
struct ModerationWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input: Option<OneOf<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

impl From<ModerationWire> for CreateModerationRequest {
    fn from(wire: ModerationWire) -> Self {
        let (input, input_as_list) = split_input(wire.input);
        Self {
            input,
            input_as_list,
            model: wire.model,
        }
    }
}

impl Serialize for CreateModerationRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let input = self.effective_input().map_err(S::Error::custom)?;
        ModerationWire {
            input: owned_input(input),
            model: self.model.clone(),
        }
        .serialize(serializer)
    }
}

/// Exactly one input form, and no empty list
fn check_input(
    validator: &mut Validator,
    input: Option<&String>,
    input_as_list: Option<&Vec<String>>,
) {
    validator.exactly_one(
        ("input", &input.cloned()),
        ("input_as_list", &input_as_list.cloned()),
    );
    if input_as_list.is_some_and(Vec::is_empty) {
        validator.push(Violation::missing_required("input_as_list"));
    }
}

fn owned_input(input: Option<OneOf<&String, &Vec<String>>>) -> Option<OneOf<String, Vec<String>>> {
    input.map(|value| match value {
        OneOf::First(single) => OneOf::First(single.clone()),
        OneOf::Second(list) => OneOf::Second(list.clone()),
    })
}

fn split_input(input: Option<OneOf<String, Vec<String>>>) -> (Option<String>, Option<Vec<String>>) {
    match input {
        Some(OneOf::First(single)) => (Some(single), None),
        Some(OneOf::Second(list)) => (None, Some(list)),
        None => (None, None),
    }
}
