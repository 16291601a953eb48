use serde::{Deserialize, Serialize};

use oai_ox_common::Timestamp;

use super::{ResponseEnvelope, impl_api_response};

/// Result of image generation, edit and variation calls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageCreateResponse {
    pub created: Timestamp,

    pub data: Vec<ImageData>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(ImageCreateResponse);

/// One generated image; `url` or `b64_json` depending on `response_format`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b64_json: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}
