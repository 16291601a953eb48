use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{ResponseEnvelope, impl_api_response};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateModerationResponse {
    pub id: String,

    pub model: String,

    pub results: Vec<ModerationResult>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(CreateModerationResponse);

impl CreateModerationResponse {
    /// Whether any input was flagged
    pub fn any_flagged(&self) -> bool {
        self.results.iter().any(|result| result.flagged)
    }
}

/// Classification of one input.
///
/// Category names (`hate`, `self-harm/intent`, ...) are kept as map keys since
/// the set grows with new moderation models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModerationResult {
    pub flagged: bool,

    pub categories: HashMap<String, bool>,

    pub category_scores: HashMap<String, f64>,
}

impl ModerationResult {
    /// Names of the categories that were flagged, sorted
    pub fn flagged_categories(&self) -> Vec<&str> {
        let mut flagged: Vec<&str> = self
            .categories
            .iter()
            .filter(|(_, flagged)| **flagged)
            .map(|(name, _)| name.as_str())
            .collect();
        flagged.sort_unstable();
        flagged
    }
}
