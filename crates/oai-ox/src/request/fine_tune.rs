use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    response::Hyperparameters,
    validation::{Validate, ValidationErrors, Validator, Violation},
};

/// Legacy `/fine-tunes` job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct FineTuneCreateRequest {
    /// Id of an uploaded JSONL file with `purpose = "fine-tune"`
    #[builder(into)]
    pub training_file: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub validation_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_epochs: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_rate_multiplier: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_loss_weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_classification_metrics: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_n_classes: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub classification_positive_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_betas: Option<Vec<f64>>,

    /// Up to 40 characters added to the fine-tuned model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub suffix: Option<String>,
}

impl Validate for FineTuneCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.require_str("training_file", &self.training_file);
        check_suffix(&mut validator, self.suffix.as_deref(), 40);
        if self.n_epochs == Some(0) {
            validator.push(Violation::invalid_value("n_epochs", "must be at least 1"));
        }
        validator.finish()
    }
}

/// `/fine_tuning/jobs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct FineTuningJobCreateRequest {
    #[builder(into)]
    pub model: String,

    #[builder(into)]
    pub training_file: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub validation_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperparameters: Option<Hyperparameters>,

    /// Up to 64 characters added to the fine-tuned model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub suffix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

impl Validate for FineTuningJobCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.require_str("model", &self.model);
        validator.require_str("training_file", &self.training_file);
        check_suffix(&mut validator, self.suffix.as_deref(), 64);
        validator.finish()
    }
}

/// Cursor pagination for `GET /fine_tuning/jobs` and its events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct FineTuningJobListRequest {
    /// Id of the last object from the previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub after: Option<String>,

    /// Page size, 1..=100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Validate for FineTuningJobListRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.page_limit(self.limit);
        validator.finish()
    }
}

fn check_suffix(validator: &mut Validator, suffix: Option<&str>, max: usize) {
    if let Some(suffix) = suffix {
        let len = suffix.chars().count();
        if len > max {
            validator.push(Violation::invalid_value(
                "suffix",
                format!("at most {max} characters allowed, got {len}"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{response::AutoOr, validation::ViolationKind};
    use serde_json::json;

    #[test]
    fn job_requires_model_and_training_file() {
        let request = FineTuningJobCreateRequest::builder()
            .model("")
            .training_file("")
            .build();
        let errors = request.validate().unwrap_err();
        assert!(errors.contains(ViolationKind::MissingRequired, "model"));
        assert!(errors.contains(ViolationKind::MissingRequired, "training_file"));
    }

    #[test]
    fn job_hyperparameters_serialize_auto() {
        let request = FineTuningJobCreateRequest::builder()
            .model("gpt-4o-mini-2024-07-18")
            .training_file("file-abc")
            .hyperparameters(Hyperparameters {
                n_epochs: Some(AutoOr::Auto),
                batch_size: Some(AutoOr::Value(4)),
                learning_rate_multiplier: None,
            })
            .build();
        assert!(request.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o-mini-2024-07-18",
                "training_file": "file-abc",
                "hyperparameters": {"n_epochs": "auto", "batch_size": 4}
            })
        );
    }

    #[test]
    fn legacy_suffix_is_limited_to_40_chars() {
        let request = FineTuneCreateRequest::builder()
            .training_file("file-abc")
            .suffix("x".repeat(41))
            .build();
        assert!(
            request
                .validate()
                .unwrap_err()
                .contains(ViolationKind::InvalidValue, "suffix")
        );
    }

    #[test]
    fn list_limit_bounds() {
        assert!(FineTuningJobListRequest::builder().limit(100).build().validate().is_ok());
        assert!(FineTuningJobListRequest::builder().limit(0).build().validate().is_err());
        assert!(FineTuningJobListRequest::builder().limit(101).build().validate().is_err());
    }
}
