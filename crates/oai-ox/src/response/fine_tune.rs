use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use oai_ox_common::Timestamp;

use super::{FileResponse, ListResponse, ResponseEnvelope, impl_api_response};

/// A hyperparameter that is either chosen by the API or pinned by the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoOr<T> {
    Auto,
    Value(T),
}

impl<T: Serialize> Serialize for AutoOr<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AutoOr::Auto => serializer.serialize_str("auto"),
            AutoOr::Value(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for AutoOr<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire<T> {
            Text(String),
            Value(T),
        }

        match Wire::<T>::deserialize(deserializer)? {
            Wire::Text(text) if text == "auto" => Ok(AutoOr::Auto),
            Wire::Text(text) => Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(&text),
                &"\"auto\" or a number",
            )),
            Wire::Value(value) => Ok(AutoOr::Value(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Hyperparameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_epochs: Option<AutoOr<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<AutoOr<u32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_rate_multiplier: Option<AutoOr<f64>>,
}

/// A legacy fine-tune
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FineTuneResponse {
    pub id: String,

    #[serde(default)]
    pub object: String,

    #[serde(default)]
    pub model: String,

    pub created_at: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,

    #[serde(default)]
    pub events: Vec<FineTuneEvent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine_tuned_model: Option<String>,

    /// Legacy hyperparameter names differ per base model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperparams: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    #[serde(default)]
    pub result_files: Vec<FileResponse>,

    pub status: String,

    #[serde(default)]
    pub training_files: Vec<FileResponse>,

    #[serde(default)]
    pub validation_files: Vec<FileResponse>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(FineTuneResponse);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FineTuneEvent {
    #[serde(default)]
    pub object: String,

    pub created_at: Timestamp,

    #[serde(default)]
    pub level: String,

    pub message: String,
}

/// A fine-tuning job.
///
/// The job's own failure reason arrives under `"error"` and is kept in
/// `job_error`; the envelope only reports failures of the request itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FineTuningJobResponse {
    pub id: String,

    #[serde(default)]
    pub object: String,

    pub created_at: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<Timestamp>,

    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine_tuned_model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    pub status: String,

    #[serde(default)]
    pub hyperparameters: Hyperparameters,

    pub training_file: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_file: Option<String>,

    #[serde(default)]
    pub result_files: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_tokens: Option<u64>,

    #[serde(
        default,
        rename = "error",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_error: Option<FineTuningJobError>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(FineTuningJobResponse);

impl FineTuningJobResponse {
    /// `succeeded`, `failed` and `cancelled` jobs will not change anymore
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "cancelled")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FineTuningJobError {
    #[serde(default)]
    pub code: String,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

pub type FineTuningJobListResponse = ListResponse<FineTuningJobResponse>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FineTuningJobEvent {
    pub id: String,

    #[serde(default)]
    pub object: String,

    pub created_at: Timestamp,

    #[serde(default)]
    pub level: String,

    pub message: String,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
