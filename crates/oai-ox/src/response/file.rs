use bytes::Bytes;
use serde::{Deserialize, Serialize};

use oai_ox_common::Timestamp;

use super::{ResponseEnvelope, impl_api_response};

/// An uploaded file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileResponse {
    pub id: String,

    #[serde(default)]
    pub object: String,

    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,

    pub created_at: Timestamp,

    pub filename: String,

    pub purpose: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_details: Option<String>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(FileResponse);

/// Raw content of a stored file. Not JSON: the body is kept as received.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileContentResponse {
    pub content: Bytes,

    /// `content-type` of the download, if the server sent one
    pub content_type: Option<String>,

    pub envelope: ResponseEnvelope,
}

impl FileContentResponse {
    /// Content decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    /// Iterate JSON Lines content (the training file format) as typed records
    pub fn json_lines<T: serde::de::DeserializeOwned>(
        &self,
    ) -> impl Iterator<Item = Result<T, serde_json::Error>> + use<'_, T> {
        self.content
            .split(|byte| *byte == b'\n')
            .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
            .map(serde_json::from_slice)
    }
}

impl_api_response!(FileContentResponse);
