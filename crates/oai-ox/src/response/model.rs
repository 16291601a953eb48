use serde::{Deserialize, Serialize};

use oai_ox_common::Timestamp;

use super::{ResponseEnvelope, impl_api_response};

/// A model available to the account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelResponse {
    pub id: String,

    #[serde(default)]
    pub object: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by: Option<String>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(ModelResponse);
