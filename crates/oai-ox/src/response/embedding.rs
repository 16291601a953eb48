use serde::{Deserialize, Serialize};

use crate::usage::Usage;

use super::{ResponseEnvelope, impl_api_response};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingCreateResponse {
    #[serde(default)]
    pub object: String,

    pub model: String,

    pub data: Vec<Embedding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    #[serde(flatten)]
    pub envelope: ResponseEnvelope,
}

impl_api_response!(EmbeddingCreateResponse);

impl EmbeddingCreateResponse {
    /// Float vectors in input order; base64 encoded entries are skipped
    pub fn vectors(&self) -> Vec<&[f64]> {
        let mut data: Vec<&Embedding> = self.data.iter().collect();
        data.sort_by_key(|embedding| embedding.index);
        data.into_iter()
            .filter_map(|embedding| match &embedding.embedding {
                EmbeddingVector::Float(values) => Some(values.as_slice()),
                EmbeddingVector::Base64(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    pub index: u32,

    pub embedding: EmbeddingVector,

    #[serde(default)]
    pub object: String,
}

/// `encoding_format = "float"` yields numbers, `"base64"` a packed string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EmbeddingVector {
    Float(Vec<f64>),
    Base64(String),
}
