use bon::Builder;
use serde::{Deserialize, Serialize, Serializer, ser::Error as _};

use crate::validation::{OneOf, Validate, ValidationErrors, Validator, Violation, exclusive};

use super::{DefaultModel, LogitBias, check_logit_bias, check_model, check_sampling};

/// Legacy text completion request.
///
/// Exclusive pairs: `prompt`/`prompt_as_list` and `stop`/`stop_as_list`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Builder)]
#[serde(from = "CompletionWire")]
pub struct CompletionCreateRequest {
    #[builder(into)]
    pub model: Option<String>,

    #[builder(into)]
    pub prompt: Option<String>,

    pub prompt_as_list: Option<Vec<String>>,

    #[builder(into)]
    pub suffix: Option<String>,

    pub max_tokens: Option<u32>,

    pub temperature: Option<f32>,

    pub top_p: Option<f32>,

    pub n: Option<u32>,

    pub stream: Option<bool>,

    /// Number of most likely tokens to return log probabilities for, at most 5
    pub logprobs: Option<u32>,

    pub echo: Option<bool>,

    #[builder(into)]
    pub stop: Option<String>,

    pub stop_as_list: Option<Vec<String>>,

    pub presence_penalty: Option<f32>,

    pub frequency_penalty: Option<f32>,

    /// Server-side candidates to pick the best `n` from; must be at least `n`
    pub best_of: Option<u32>,

    pub logit_bias: Option<LogitBias>,

    pub seed: Option<i64>,

    #[builder(into)]
    pub user: Option<String>,
}

impl CompletionCreateRequest {
    /// The value sent as `"prompt"`
    pub fn effective_prompt(&self) -> Result<Option<OneOf<&String, &Vec<String>>>, Violation> {
        exclusive(("prompt", &self.prompt), ("prompt_as_list", &self.prompt_as_list))
    }

    /// The value sent as `"stop"`
    pub fn effective_stop(&self) -> Result<Option<OneOf<&String, &Vec<String>>>, Violation> {
        exclusive(("stop", &self.stop), ("stop_as_list", &self.stop_as_list))
    }
}

impl DefaultModel for CompletionCreateRequest {
    fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn set_model(&mut self, model: String) {
        self.model = Some(model);
    }
}

impl Validate for CompletionCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();

        check_model(&mut validator, self.model.as_deref());
        validator.exclusive(("prompt", &self.prompt), ("prompt_as_list", &self.prompt_as_list));
        validator.exclusive(("stop", &self.stop), ("stop_as_list", &self.stop_as_list));
        validator.max_len("stop_as_list", self.stop_as_list.as_deref(), 4);
        check_sampling(
            &mut validator,
            self.temperature,
            self.top_p,
            self.presence_penalty,
            self.frequency_penalty,
            self.n,
        );
        check_logit_bias(&mut validator, self.logit_bias.as_ref());
        validator.range("logprobs", self.logprobs, 0, 5);

        if let (Some(best_of), Some(n)) = (self.best_of, self.n) {
            if best_of < n {
                validator.push(Violation::invalid_value(
                    "best_of",
                    format!("must be at least n ({n}), got {best_of}"),
                ));
            }
        }
        if self.best_of.is_some() && self.stream == Some(true) {
            validator.push(Violation::invalid_value(
                "best_of",
                "cannot be combined with streaming",
            ));
        }

        validator.finish()
    }
}

#[derive(Serialize, Deserialize)]
struct CompletionWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt: Option<OneOf<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    n: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logprobs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    echo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stop: Option<OneOf<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    best_of: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logit_bias: Option<LogitBias>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
}

fn owned_pair(pair: Option<OneOf<&String, &Vec<String>>>) -> Option<OneOf<String, Vec<String>>> {
    pair.map(|value| match value {
        OneOf::First(single) => OneOf::First(single.clone()),
        OneOf::Second(list) => OneOf::Second(list.clone()),
    })
}

fn split_pair(pair: Option<OneOf<String, Vec<String>>>) -> (Option<String>, Option<Vec<String>>) {
    match pair {
        Some(OneOf::First(single)) => (Some(single), None),
        Some(OneOf::Second(list)) => (None, Some(list)),
        None => (None, None),
    }
}

impl TryFrom<&CompletionCreateRequest> for CompletionWire {
    type Error = Violation;

    fn try_from(request: &CompletionCreateRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            model: request.model.clone(),
            prompt: owned_pair(request.effective_prompt()?),
            suffix: request.suffix.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            n: request.n,
            stream: request.stream,
            logprobs: request.logprobs,
            echo: request.echo,
            stop: owned_pair(request.effective_stop()?),
            presence_penalty: request.presence_penalty,
            frequency_penalty: request.frequency_penalty,
            best_of: request.best_of,
            logit_bias: request.logit_bias.clone(),
            seed: request.seed,
            user: request.user.clone(),
        })
    }
}

impl From<CompletionWire> for CompletionCreateRequest {
    fn from(wire: CompletionWire) -> Self {
        let (prompt, prompt_as_list) = split_pair(wire.prompt);
        let (stop, stop_as_list) = split_pair(wire.stop);
        Self {
            model: wire.model,
            prompt,
            prompt_as_list,
            suffix: wire.suffix,
            max_tokens: wire.max_tokens,
            temperature: wire.temperature,
            top_p: wire.top_p,
            n: wire.n,
            stream: wire.stream,
            logprobs: wire.logprobs,
            echo: wire.echo,
            stop,
            stop_as_list,
            presence_penalty: wire.presence_penalty,
            frequency_penalty: wire.frequency_penalty,
            best_of: wire.best_of,
            logit_bias: wire.logit_bias,
            seed: wire.seed,
            user: wire.user,
        }
    }
}

impl Serialize for CompletionCreateRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        CompletionWire::try_from(self)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

/// Rewrite `input` following `instruction`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct EditCreateRequest {
    #[builder(into)]
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub input: Option<String>,

    #[builder(into)]
    pub instruction: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl Validate for EditCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.require_str("model", &self.model);
        validator.require_str("instruction", &self.instruction);
        check_sampling(&mut validator, self.temperature, self.top_p, None, None, self.n);
        validator.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ViolationKind;
    use serde_json::json;

    #[test]
    fn prompt_list_is_sent_as_array() {
        let request = CompletionCreateRequest::builder()
            .model("gpt-3.5-turbo-instruct")
            .prompt_as_list(vec!["a".into(), "b".into()])
            .build();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"model": "gpt-3.5-turbo-instruct", "prompt": ["a", "b"]}));
    }

    #[test]
    fn prompt_pair_is_exclusive() {
        let request = CompletionCreateRequest::builder()
            .model("m")
            .prompt("a")
            .prompt_as_list(vec!["b".into()])
            .build();
        assert!(
            request
                .validate()
                .unwrap_err()
                .contains(ViolationKind::MutuallyExclusive, "prompt")
        );
        assert!(serde_json::to_value(&request).is_err());
    }

    #[test]
    fn best_of_must_cover_n() {
        let request = CompletionCreateRequest::builder()
            .model("m")
            .prompt("a")
            .n(3)
            .best_of(2)
            .build();
        assert!(
            request
                .validate()
                .unwrap_err()
                .contains(ViolationKind::InvalidValue, "best_of")
        );
    }

    #[test]
    fn wire_string_prompt_lands_in_singular_field() {
        let request: CompletionCreateRequest =
            serde_json::from_value(json!({"model": "m", "prompt": "hi", "stop": ["x"]})).unwrap();
        assert_eq!(request.prompt.as_deref(), Some("hi"));
        assert_eq!(request.stop_as_list, Some(vec!["x".to_string()]));
        assert!(request.stop.is_none());
    }

    #[test]
    fn edit_requires_instruction() {
        let request = EditCreateRequest::builder()
            .model("text-davinci-edit-001")
            .instruction(" ")
            .build();
        assert!(
            request
                .validate()
                .unwrap_err()
                .contains(ViolationKind::MissingRequired, "instruction")
        );
    }
}
