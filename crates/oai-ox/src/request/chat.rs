use bon::Builder;
use serde::{Deserialize, Serialize, Serializer, ser::Error as _};
use serde_json::Value;

use crate::{
    message::ChatMessage,
    tool::{FunctionCallOption, FunctionDefinition, ToolChoice, ToolDefinition},
    validation::{OneOf, Validate, ValidationErrors, Validator, Violation, exclusive},
};

use super::{DefaultModel, LogitBias, check_logit_bias, check_model, check_sampling};

/// Output format constraint for chat completions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamOptions {
    /// Send a final chunk carrying token usage for the whole request
    pub include_usage: bool,
}

/// Request for a chat completion.
///
/// Exclusive pairs: `stop`/`stop_as_list` (both encode `"stop"`) and
/// `functions`/`functions_as_object` (both encode `"functions"`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Builder)]
#[serde(from = "ChatCompletionWire")]
#[builder(builder_type(vis = "pub"), state_mod(vis = "pub"))]
pub struct ChatCompletionCreateRequest {
    #[builder(field)]
    pub messages: Vec<ChatMessage>,

    #[builder(field)]
    pub tools: Option<Vec<ToolDefinition>>,

    /// Falls back to the client's default model when unset
    #[builder(into)]
    pub model: Option<String>,

    /// Deprecated in favour of `tools`
    pub functions: Option<Vec<FunctionDefinition>>,

    /// Functions given as raw JSON objects
    pub functions_as_object: Option<Vec<Value>>,

    /// Deprecated in favour of `tool_choice`
    pub function_call: Option<FunctionCallOption>,

    pub tool_choice: Option<ToolChoice>,

    pub parallel_tool_calls: Option<bool>,

    /// 0.0 to 2.0
    pub temperature: Option<f32>,

    /// 0.0 to 1.0
    pub top_p: Option<f32>,

    pub n: Option<u32>,

    /// Set by the client for streaming calls
    pub stream: Option<bool>,

    pub stream_options: Option<StreamOptions>,

    /// A single stop sequence
    #[builder(into)]
    pub stop: Option<String>,

    /// Up to 4 stop sequences
    pub stop_as_list: Option<Vec<String>>,

    pub max_tokens: Option<u32>,

    pub max_completion_tokens: Option<u32>,

    /// -2.0 to 2.0
    pub presence_penalty: Option<f32>,

    /// -2.0 to 2.0
    pub frequency_penalty: Option<f32>,

    pub logit_bias: Option<LogitBias>,

    pub logprobs: Option<bool>,

    /// 0 to 20, requires `logprobs`
    pub top_logprobs: Option<u32>,

    pub response_format: Option<ResponseFormat>,

    pub seed: Option<i64>,

    /// End-user identifier for abuse monitoring
    #[builder(into)]
    pub user: Option<String>,
}

impl ChatCompletionCreateRequest {
    /// The value sent as `"stop"`
    pub fn effective_stop(&self) -> Result<Option<OneOf<&String, &Vec<String>>>, Violation> {
        exclusive(("stop", &self.stop), ("stop_as_list", &self.stop_as_list))
    }

    /// The value sent as `"functions"`
    pub fn effective_functions(
        &self,
    ) -> Result<Option<OneOf<&Vec<FunctionDefinition>, &Vec<Value>>>, Violation> {
        exclusive(
            ("functions", &self.functions),
            ("functions_as_object", &self.functions_as_object),
        )
    }
}

impl<S: chat_completion_create_request_builder::State> ChatCompletionCreateRequestBuilder<S> {
    pub fn message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn system_message(self, content: impl Into<String>) -> Self {
        self.message(ChatMessage::system(content))
    }

    pub fn user_message(self, content: impl Into<String>) -> Self {
        self.message(ChatMessage::user(content))
    }

    pub fn assistant_message(self, content: impl Into<String>) -> Self {
        self.message(ChatMessage::assistant(content))
    }

    pub fn tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.get_or_insert_with(Vec::new).push(tool);
        self
    }
}

impl DefaultModel for ChatCompletionCreateRequest {
    fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn set_model(&mut self, model: String) {
        self.model = Some(model);
    }
}

impl Validate for ChatCompletionCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();

        check_model(&mut validator, self.model.as_deref());

        if self.messages.is_empty() {
            validator.push(Violation::missing_required("messages"));
        }
        for (index, message) in self.messages.iter().enumerate() {
            validator.nested(&format!("messages[{index}]"), message.validate());
        }

        validator.exclusive(("stop", &self.stop), ("stop_as_list", &self.stop_as_list));
        validator.max_len("stop_as_list", self.stop_as_list.as_deref(), 4);

        validator.exclusive(
            ("functions", &self.functions),
            ("functions_as_object", &self.functions_as_object),
        );
        for (index, function) in self.functions.iter().flatten().enumerate() {
            validator.nested(&format!("functions[{index}]"), function.validate());
        }

        for (index, tool) in self.tools.iter().flatten().enumerate() {
            match tool {
                ToolDefinition::Function { function } => {
                    validator.nested(&format!("tools[{index}].function"), function.validate());
                }
                other => validator.push(Violation::invalid_value(
                    &format!("tools[{index}]"),
                    format!("chat completions only accept function tools, got {other:?}"),
                )),
            }
        }

        check_sampling(
            &mut validator,
            self.temperature,
            self.top_p,
            self.presence_penalty,
            self.frequency_penalty,
            self.n,
        );
        check_logit_bias(&mut validator, self.logit_bias.as_ref());
        validator.range("top_logprobs", self.top_logprobs, 0, 20);
        if self.top_logprobs.is_some() && self.logprobs != Some(true) {
            validator.push(Violation::invalid_value(
                "top_logprobs",
                "requires `logprobs` to be true",
            ));
        }

        validator.finish()
    }
}

#[derive(Serialize, Deserialize)]
struct ChatCompletionWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(default)]
    messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    functions: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCallOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parallel_tool_calls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    n: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stream_options: Option<StreamOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stop: Option<OneOf<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logit_bias: Option<LogitBias>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logprobs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    top_logprobs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
}

impl TryFrom<&ChatCompletionCreateRequest> for ChatCompletionWire {
    type Error = Violation;

    fn try_from(request: &ChatCompletionCreateRequest) -> Result<Self, Self::Error> {
        let stop = request.effective_stop()?.map(|stop| match stop {
            OneOf::First(single) => OneOf::First(single.clone()),
            OneOf::Second(list) => OneOf::Second(list.clone()),
        });
        let functions = match request.effective_functions()? {
            Some(OneOf::First(typed)) => Some(
                typed
                    .iter()
                    .map(serde_json::to_value)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| Violation::invalid_value("functions", e))?,
            ),
            Some(OneOf::Second(raw)) => Some(raw.clone()),
            None => None,
        };

        Ok(Self {
            model: request.model.clone(),
            messages: request.messages.clone(),
            functions,
            function_call: request.function_call.clone(),
            tools: request.tools.clone(),
            tool_choice: request.tool_choice.clone(),
            parallel_tool_calls: request.parallel_tool_calls,
            temperature: request.temperature,
            top_p: request.top_p,
            n: request.n,
            stream: request.stream,
            stream_options: request.stream_options,
            stop,
            max_tokens: request.max_tokens,
            max_completion_tokens: request.max_completion_tokens,
            presence_penalty: request.presence_penalty,
            frequency_penalty: request.frequency_penalty,
            logit_bias: request.logit_bias.clone(),
            logprobs: request.logprobs,
            top_logprobs: request.top_logprobs,
            response_format: request.response_format,
            seed: request.seed,
            user: request.user.clone(),
        })
    }
}

impl From<ChatCompletionWire> for ChatCompletionCreateRequest {
    fn from(wire: ChatCompletionWire) -> Self {
        let (stop, stop_as_list) = match wire.stop {
            Some(OneOf::First(single)) => (Some(single), None),
            Some(OneOf::Second(list)) => (None, Some(list)),
            None => (None, None),
        };
        let (functions, functions_as_object) = match wire.functions {
            Some(raw) => split_functions(raw),
            None => (None, None),
        };

        Self {
            messages: wire.messages,
            tools: wire.tools,
            model: wire.model,
            functions,
            functions_as_object,
            function_call: wire.function_call,
            tool_choice: wire.tool_choice,
            parallel_tool_calls: wire.parallel_tool_calls,
            temperature: wire.temperature,
            top_p: wire.top_p,
            n: wire.n,
            stream: wire.stream,
            stream_options: wire.stream_options,
            stop,
            stop_as_list,
            max_tokens: wire.max_tokens,
            max_completion_tokens: wire.max_completion_tokens,
            presence_penalty: wire.presence_penalty,
            frequency_penalty: wire.frequency_penalty,
            logit_bias: wire.logit_bias,
            logprobs: wire.logprobs,
            top_logprobs: wire.top_logprobs,
            response_format: wire.response_format,
            seed: wire.seed,
            user: wire.user,
        }
    }
}

/// Both sides of the pair encode `"functions"` as an array of objects.
///
/// Entries are decoded as typed definitions only when every one of them
/// re-encodes to exactly the same JSON; otherwise the raw objects are kept so
/// no unknown key is dropped.
fn split_functions(raw: Vec<Value>) -> (Option<Vec<FunctionDefinition>>, Option<Vec<Value>>) {
    let typed: Option<Vec<FunctionDefinition>> = raw
        .iter()
        .map(|value| {
            let function = FunctionDefinition::deserialize(value).ok()?;
            (serde_json::to_value(&function).ok()? == *value).then_some(function)
        })
        .collect();
    match typed {
        Some(typed) => (Some(typed), None),
        None => (None, Some(raw)),
    }
}

impl Serialize for ChatCompletionCreateRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ChatCompletionWire::try_from(self)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}
