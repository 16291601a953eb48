use serde::{Deserialize, Serialize};

use oai_ox_common::TokenUsage;

/// The `usage` object of completion, chat and embedding responses.
///
/// Embeddings report no completion tokens; streamed chat chunks only carry
/// usage on the final chunk, and only with `stream_options.include_usage`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_details: Option<PromptTokensDetails>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens_details: Option<CompletionTokensDetails>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptTokensDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_tokens: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_tokens: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionTokensDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_tokens: Option<u64>,
}

impl Usage {
    /// Flat counters, for accumulating across calls
    pub fn tokens(&self) -> TokenUsage {
        TokenUsage {
            prompt_tokens: self.prompt_tokens,
            completion_tokens: self.completion_tokens,
            total_tokens: self.total_tokens,
        }
    }

    /// Reported total, falling back to prompt plus completion
    pub fn total(&self) -> u64 {
        self.tokens().total_tokens()
    }

    /// Prompt tokens served from the prompt cache
    pub fn cached_prompt_tokens(&self) -> u64 {
        self.prompt_tokens_details
            .and_then(|details| details.cached_tokens)
            .unwrap_or(0)
    }

    /// Hidden tokens spent by reasoning models
    pub fn reasoning_tokens(&self) -> u64 {
        self.completion_tokens_details
            .and_then(|details| details.reasoning_tokens)
            .unwrap_or(0)
    }
}

impl From<Usage> for TokenUsage {
    fn from(usage: Usage) -> Self {
        usage.tokens()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embedding_usage_has_no_completion_tokens() {
        let usage: Usage =
            serde_json::from_value(json!({"prompt_tokens": 8, "total_tokens": 8})).unwrap();
        assert_eq!(usage.completion_tokens, None);
        assert_eq!(usage.total(), 8);
    }

    #[test]
    fn total_falls_back_to_the_sum() {
        let usage = Usage {
            prompt_tokens: Some(5),
            completion_tokens: Some(3),
            ..Usage::default()
        };
        assert_eq!(usage.total(), 8);
    }

    #[test]
    fn details_are_read_when_present() {
        let usage: Usage = serde_json::from_value(json!({
            "prompt_tokens": 100,
            "completion_tokens": 40,
            "total_tokens": 140,
            "prompt_tokens_details": {"cached_tokens": 64},
            "completion_tokens_details": {"reasoning_tokens": 32}
        }))
        .unwrap();
        assert_eq!(usage.cached_prompt_tokens(), 64);
        assert_eq!(usage.reasoning_tokens(), 32);

        let summed = TokenUsage::from(usage).merge(TokenUsage::with_prompt_completion(1, 1));
        assert_eq!(summed.total_tokens(), 142);
    }
}
