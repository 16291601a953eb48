use serde::{Deserialize, Serialize};

/// Well-known model ids; anything else goes through [`Model::Custom`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    #[serde(rename = "gpt-4o")]
    Gpt4o,

    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,

    #[serde(rename = "gpt-4-turbo")]
    Gpt4Turbo,

    #[serde(rename = "gpt-4")]
    Gpt4,

    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,

    #[serde(rename = "gpt-3.5-turbo-instruct")]
    Gpt35TurboInstruct,

    #[serde(rename = "text-davinci-edit-001")]
    TextDavinciEdit001,

    #[serde(rename = "text-embedding-3-small")]
    TextEmbedding3Small,

    #[serde(rename = "text-embedding-3-large")]
    TextEmbedding3Large,

    #[serde(rename = "text-embedding-ada-002")]
    TextEmbeddingAda002,

    #[serde(rename = "text-moderation-latest")]
    TextModerationLatest,

    #[serde(rename = "dall-e-2")]
    DallE2,

    #[serde(rename = "dall-e-3")]
    DallE3,

    #[serde(rename = "whisper-1")]
    Whisper1,

    /// Any model id not listed above, including fine-tuned models
    #[serde(untagged)]
    Custom(String),
}

impl Model {
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Gpt4Turbo => "gpt-4-turbo",
            Model::Gpt4 => "gpt-4",
            Model::Gpt35Turbo => "gpt-3.5-turbo",
            Model::Gpt35TurboInstruct => "gpt-3.5-turbo-instruct",
            Model::TextDavinciEdit001 => "text-davinci-edit-001",
            Model::TextEmbedding3Small => "text-embedding-3-small",
            Model::TextEmbedding3Large => "text-embedding-3-large",
            Model::TextEmbeddingAda002 => "text-embedding-ada-002",
            Model::TextModerationLatest => "text-moderation-latest",
            Model::DallE2 => "dall-e-2",
            Model::DallE3 => "dall-e-3",
            Model::Whisper1 => "whisper-1",
            Model::Custom(id) => id,
        }
    }

    /// Models served by the chat completions endpoint
    pub fn supports_chat(&self) -> bool {
        matches!(
            self,
            Model::Gpt4o | Model::Gpt4oMini | Model::Gpt4Turbo | Model::Gpt4 | Model::Gpt35Turbo
        ) || matches!(self, Model::Custom(id) if id.starts_with("gpt-") || id.starts_with("ft:gpt-"))
    }

    pub fn is_embedding(&self) -> bool {
        matches!(
            self,
            Model::TextEmbedding3Small | Model::TextEmbedding3Large | Model::TextEmbeddingAda002
        )
    }
}

impl From<String> for Model {
    fn from(id: String) -> Self {
        match id.as_str() {
            "gpt-4o" => Model::Gpt4o,
            "gpt-4o-mini" => Model::Gpt4oMini,
            "gpt-4-turbo" => Model::Gpt4Turbo,
            "gpt-4" => Model::Gpt4,
            "gpt-3.5-turbo" => Model::Gpt35Turbo,
            "gpt-3.5-turbo-instruct" => Model::Gpt35TurboInstruct,
            "text-davinci-edit-001" => Model::TextDavinciEdit001,
            "text-embedding-3-small" => Model::TextEmbedding3Small,
            "text-embedding-3-large" => Model::TextEmbedding3Large,
            "text-embedding-ada-002" => Model::TextEmbeddingAda002,
            "text-moderation-latest" => Model::TextModerationLatest,
            "dall-e-2" => Model::DallE2,
            "dall-e-3" => Model::DallE3,
            "whisper-1" => Model::Whisper1,
            _ => Model::Custom(id),
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Model {
    fn from(id: &str) -> Self {
        Model::from(id.to_string())
    }
}

impl From<Model> for String {
    fn from(model: Model) -> Self {
        match model {
            Model::Custom(id) => id,
            known => known.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_custom_ids_round_trip() {
        assert_eq!(Model::from("gpt-4o"), Model::Gpt4o);
        assert_eq!(Model::from("ft:gpt-4o:acme::123").as_str(), "ft:gpt-4o:acme::123");
        assert_eq!(String::from(Model::Whisper1), "whisper-1");
        assert_eq!(Model::DallE3.to_string(), "dall-e-3");
    }

    #[test]
    fn serializes_as_plain_id() {
        assert_eq!(serde_json::to_string(&Model::Gpt35Turbo).unwrap(), "\"gpt-3.5-turbo\"");
        let custom: Model = serde_json::from_str("\"my-deployment\"").unwrap();
        assert_eq!(custom, Model::Custom("my-deployment".into()));
    }
}
