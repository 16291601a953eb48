use serde::{Deserialize, Serialize, Serializer, ser::Error as _};

use crate::{
    tool::{FunctionCall, ToolCall, check_identifier},
    validation::{OneOf, Validate, ValidationErrors, Validator, Violation, exclusive},
};

/// The role of the message author
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// System message (instructions to the model)
    System,
    /// User message (human input)
    User,
    /// Assistant message (model output)
    Assistant,
    /// Tool result message
    Tool,
}

/// One structured part of a message's content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>, detail: Option<ImageDetail>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageUrl {
    /// Either a URL of the image or base64 encoded image data
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ImageDetail>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Auto,
    Low,
    High,
}

/// A message in a chat conversation.
///
/// `content` and `contents` are alternative encodings of the wire field
/// `"content"` (a plain string or an array of parts). Set at most one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ChatMessageWire")]
pub struct ChatMessage {
    pub role: Role,
    pub content: Option<String>,
    pub contents: Option<Vec<MessageContent>>,
    /// Reasoning text returned by reasoning models
    pub reasoning_content: Option<String>,
    pub name: Option<String>,
    /// Required for tool role messages: the call this message answers
    pub tool_call_id: Option<String>,
    /// Deprecated in favour of `tool_calls`
    pub function_call: Option<FunctionCall>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Serialize, Deserialize)]
struct ChatMessageWire {
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<OneOf<String, Vec<MessageContent>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reasoning_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCall>>,
}

impl From<ChatMessageWire> for ChatMessage {
    fn from(wire: ChatMessageWire) -> Self {
        let (content, contents) = match wire.content {
            Some(OneOf::First(text)) => (Some(text), None),
            Some(OneOf::Second(parts)) => (None, Some(parts)),
            None => (None, None),
        };
        Self {
            role: wire.role,
            content,
            contents,
            reasoning_content: wire.reasoning_content,
            name: wire.name,
            tool_call_id: wire.tool_call_id,
            function_call: wire.function_call,
            tool_calls: wire.tool_calls,
        }
    }
}

impl TryFrom<&ChatMessage> for ChatMessageWire {
    type Error = Violation;

    fn try_from(message: &ChatMessage) -> Result<Self, Self::Error> {
        let content = message.effective_content()?.map(|value| match value {
            OneOf::First(text) => OneOf::First(text.clone()),
            OneOf::Second(parts) => OneOf::Second(parts.clone()),
        });
        Ok(Self {
            role: message.role,
            content,
            reasoning_content: message.reasoning_content.clone(),
            name: message.name.clone(),
            tool_call_id: message.tool_call_id.clone(),
            function_call: message.function_call.clone(),
            tool_calls: message.tool_calls.clone(),
        })
    }
}

impl Serialize for ChatMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ChatMessageWire::try_from(self)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl ChatMessage {
    fn with_role(role: Role) -> Self {
        Self {
            role,
            content: None,
            contents: None,
            reasoning_content: None,
            name: None,
            tool_call_id: None,
            function_call: None,
            tool_calls: None,
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::with_role(Role::System)
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::with_role(Role::User)
        }
    }

    /// Create a user message made of structured parts (text, images)
    pub fn user_with_contents(contents: Vec<MessageContent>) -> Self {
        Self {
            contents: Some(contents),
            ..Self::with_role(Role::User)
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::with_role(Role::Assistant)
        }
    }

    /// Create an assistant message that requests tool calls
    pub fn assistant_with_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content,
            tool_calls: Some(tool_calls),
            ..Self::with_role(Role::Assistant)
        }
    }

    /// Create a tool result message answering `tool_call_id`
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_call_id: Some(tool_call_id.into()),
            ..Self::with_role(Role::Tool)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The value sent as `"content"`: whichever of `content`/`contents` is set
    pub fn effective_content(
        &self,
    ) -> Result<Option<OneOf<&String, &Vec<MessageContent>>>, Violation> {
        exclusive(("content", &self.content), ("contents", &self.contents))
    }

    /// Concatenated text of the message, ignoring non-text parts
    pub fn text(&self) -> Option<String> {
        if let Some(content) = &self.content {
            return Some(content.clone());
        }
        let parts = self.contents.as_ref()?;
        let text: Vec<&str> = parts
            .iter()
            .filter_map(|part| match part {
                MessageContent::Text { text } => Some(text.as_str()),
                MessageContent::ImageUrl { .. } => None,
            })
            .collect();
        (!text.is_empty()).then(|| text.join(""))
    }

    fn carries_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
            || self.function_call.is_some()
    }
}

impl Validate for ChatMessage {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();

        match self.effective_content() {
            Err(violation) => validator.push(violation),
            Ok(None) if !(self.role == Role::Assistant && self.carries_calls()) => {
                validator.push(Violation::missing_required("content"));
            }
            Ok(_) => {}
        }

        if self.role == Role::Tool
            && self
                .tool_call_id
                .as_deref()
                .is_none_or(|id| id.trim().is_empty())
        {
            validator.push(Violation::missing_required("tool_call_id"));
        }

        if self.role != Role::User {
            if let Some(parts) = &self.contents {
                if parts
                    .iter()
                    .any(|part| matches!(part, MessageContent::ImageUrl { .. }))
                {
                    validator.push(Violation::invalid_value(
                        "contents",
                        format!("image parts are only allowed in user messages, not {}", self.role),
                    ));
                }
            }
        }

        check_identifier(&mut validator, "name", self.name.as_deref());

        validator.finish()
    }
}
