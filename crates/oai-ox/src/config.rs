use std::sync::Arc;

use bon::Builder;
use thiserror::Error;

use crate::endpoint::{
    AzureEndpoints, DEFAULT_AZURE_API_VERSION, DEFAULT_OPENAI_API_VERSION, EndpointProvider,
    OpenAiEndpoints,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing API key")]
    MissingApiKey,

    #[error("Azure deployments need either a resource name or an explicit base URL")]
    MissingAzureResource,

    #[error("Azure deployments need a deployment id")]
    MissingDeployment,

    #[error("Invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Which family of endpoints and which auth header the client uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFlavor {
    /// api.openai.com style: `/v1/...`, `Authorization: Bearer`
    OpenAi { api_version: String },
    /// Azure OpenAI: `/openai/deployments/{deployment_id}/...?api-version=`, `api-key`
    Azure {
        resource_name: Option<String>,
        deployment_id: String,
        api_version: String,
    },
}

impl Default for ApiFlavor {
    fn default() -> Self {
        Self::OpenAi {
            api_version: DEFAULT_OPENAI_API_VERSION.to_string(),
        }
    }
}

impl ApiFlavor {
    pub fn azure(resource_name: impl Into<String>, deployment_id: impl Into<String>) -> Self {
        Self::Azure {
            resource_name: Some(resource_name.into()),
            deployment_id: deployment_id.into(),
            api_version: DEFAULT_AZURE_API_VERSION.to_string(),
        }
    }

    pub fn is_azure(&self) -> bool {
        matches!(self, Self::Azure { .. })
    }
}

/// Everything the client needs to address and authenticate against the API
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ClientConfig {
    #[builder(into)]
    pub api_key: String,

    #[builder(into)]
    pub organization: Option<String>,

    /// Overrides the flavor's default host
    #[builder(into)]
    pub base_url: Option<String>,

    #[builder(default)]
    pub flavor: ApiFlavor,

    /// Filled into chat, completion and embedding requests that leave `model` unset
    #[builder(into)]
    pub default_model: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::builder().api_key(api_key).build()
    }

    /// Load configuration from the process environment.
    ///
    /// Reads `OPENAI_API_KEY`, `OPENAI_ORGANIZATION`, `OPENAI_BASE_URL` and
    /// `OPENAI_DEFAULT_MODEL`. Setting `AZURE_OPENAI_RESOURCE` or
    /// `AZURE_OPENAI_DEPLOYMENT` selects the Azure flavor, with
    /// `AZURE_OPENAI_API_VERSION` overriding the default api-version.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = var("OPENAI_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let resource_name = var("AZURE_OPENAI_RESOURCE");
        let deployment_id = var("AZURE_OPENAI_DEPLOYMENT");

        let flavor = if resource_name.is_some() || deployment_id.is_some() {
            ApiFlavor::Azure {
                resource_name,
                deployment_id: deployment_id.unwrap_or_default(),
                api_version: var("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
            }
        } else {
            ApiFlavor::default()
        };

        let config = Self {
            api_key,
            organization: var("OPENAI_ORGANIZATION"),
            base_url: var("OPENAI_BASE_URL"),
            flavor,
            default_model: var("OPENAI_DEFAULT_MODEL"),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if let ApiFlavor::Azure {
            resource_name,
            deployment_id,
            ..
        } = &self.flavor
        {
            if deployment_id.trim().is_empty() {
                return Err(ConfigError::MissingDeployment);
            }
            if resource_name.is_none() && self.base_url.is_none() {
                return Err(ConfigError::MissingAzureResource);
            }
        }
        self.resolved_base_url().map(|_| ())
    }

    /// The host requests are sent to, without a trailing slash
    pub fn resolved_base_url(&self) -> Result<String, ConfigError> {
        let base = match (&self.base_url, &self.flavor) {
            (Some(url), _) => url.clone(),
            (None, ApiFlavor::OpenAi { .. }) => DEFAULT_BASE_URL.to_string(),
            (
                None,
                ApiFlavor::Azure {
                    resource_name: Some(resource),
                    ..
                },
            ) => format!("https://{resource}.openai.azure.com"),
            (
                None,
                ApiFlavor::Azure {
                    resource_name: None,
                    ..
                },
            ) => return Err(ConfigError::MissingAzureResource),
        };

        url::Url::parse(&base).map_err(|err| ConfigError::InvalidBaseUrl {
            url: base.clone(),
            reason: err.to_string(),
        })?;
        Ok(base.trim_end_matches('/').to_string())
    }

    pub fn endpoint_provider(&self) -> Arc<dyn EndpointProvider> {
        match &self.flavor {
            ApiFlavor::OpenAi { api_version } => Arc::new(OpenAiEndpoints::new(api_version)),
            ApiFlavor::Azure {
                deployment_id,
                api_version,
                ..
            } => Arc::new(AzureEndpoints::new(deployment_id, api_version)),
        }
    }

    /// Authentication and organization headers for every request
    pub fn auth_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(2);
        match self.flavor {
            ApiFlavor::OpenAi { .. } => {
                headers.push(("Authorization".to_string(), format!("Bearer {}", self.api_key)));
                if let Some(organization) = &self.organization {
                    headers.push(("OpenAI-Organization".to_string(), organization.clone()));
                }
            }
            ApiFlavor::Azure { .. } => {
                headers.push(("api-key".to_string(), self.api_key.clone()));
            }
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn env_without_azure_variables_is_cloud() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_ORGANIZATION", "org-1"),
        ]))
        .unwrap();
        assert_eq!(config.flavor, ApiFlavor::default());
        assert_eq!(config.resolved_base_url().unwrap(), DEFAULT_BASE_URL);
        assert_eq!(
            config.auth_headers(),
            vec![
                ("Authorization".to_string(), "Bearer sk-test".to_string()),
                ("OpenAI-Organization".to_string(), "org-1".to_string()),
            ]
        );
    }

    #[test]
    fn env_with_azure_resource_selects_azure() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "key"),
            ("AZURE_OPENAI_RESOURCE", "acme"),
            ("AZURE_OPENAI_DEPLOYMENT", "gpt4o"),
        ]))
        .unwrap();
        assert!(config.flavor.is_azure());
        assert_eq!(
            config.resolved_base_url().unwrap(),
            "https://acme.openai.azure.com"
        );
        assert_eq!(
            config.auth_headers(),
            vec![("api-key".to_string(), "key".to_string())]
        );
    }

    #[test]
    fn missing_key_and_deployment_are_rejected() {
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::MissingApiKey
        );
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[
                ("OPENAI_API_KEY", "key"),
                ("AZURE_OPENAI_RESOURCE", "acme"),
            ]))
            .unwrap_err(),
            ConfigError::MissingDeployment
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = ClientConfig::builder()
            .api_key("key")
            .base_url("not a url")
            .build();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
