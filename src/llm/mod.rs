pub mod claude;
pub mod gemini;
pub mod local;
pub mod openai_compat;
pub mod prompts;

use std::time::Duration;

use async_trait::async_trait;

use crate::config::settings::LlmConfig;
use crate::error::{MinutesError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Anthropic,
    OpenAI,
    Moonshot,
    OpenRouter,
    Gemini,
    Local,
}

impl LlmProvider {
    pub fn from_provider(provider: &str) -> Option<Self> {
        match provider.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Some(Self::Anthropic),
            "openai" => Some(Self::OpenAI),
            "moonshot" => Some(Self::Moonshot),
            "openrouter" => Some(Self::OpenRouter),
            "gemini" | "google" => Some(Self::Gemini),
            "local" => Some(Self::Local),
            _ => None,
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Moonshot => "https://api.moonshot.ai/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::Anthropic | Self::Local => "",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::OpenAI => "gpt-4o",
            Self::Moonshot => "kimi-k2-0711-preview",
            Self::OpenRouter => "openai/gpt-4o",
            Self::Gemini => "gemini-2.0-flash",
            Self::Local => "qwen2.5-7b-instruct",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Local)
    }
}

/// Sampling settings shared by the hosted providers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Text completion capability: one prompt in, the model's raw reply out.
///
/// Implementations report any failure as [`MinutesError::CompletionFailure`]
/// and never retry.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Completion client backed by the provider named in the config
pub struct ProviderClient {
    provider: LlmProvider,
    model: String,
    api_key: Option<String>,
    local_lms_path: String,
    params: GenerationParams,
    http: reqwest::Client,
}

impl ProviderClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        if config.provider.trim().eq_ignore_ascii_case("none") {
            return Err(MinutesError::InvalidConfig(
                "LLM provider is not configured. Set [llm] provider in the config file.".to_string(),
            ));
        }

        let provider = LlmProvider::from_provider(&config.provider).ok_or_else(|| {
            MinutesError::InvalidConfig(format!("Unknown LLM provider '{}'", config.provider))
        })?;

        let api_key = config.api_key.clone().filter(|k| !k.trim().is_empty());
        if provider.requires_api_key() && api_key.is_none() {
            return Err(MinutesError::InvalidConfig(format!(
                "API key for provider '{}' not configured",
                config.provider
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            provider,
            model: config.effective_model(),
            api_key,
            local_lms_path: config.local_lms_path.clone(),
            params: GenerationParams {
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
            http,
        })
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn call(&self, prompt: &str) -> anyhow::Result<String> {
        let api_key = self.api_key.as_deref().unwrap_or_default();

        match self.provider {
            LlmProvider::Anthropic => {
                claude::complete(&self.http, api_key, &self.model, prompt, self.params).await
            }
            LlmProvider::OpenAI | LlmProvider::Moonshot | LlmProvider::OpenRouter => {
                openai_compat::complete(
                    &self.http,
                    self.provider.base_url(),
                    api_key,
                    &self.model,
                    prompt,
                    self.params,
                )
                .await
            }
            LlmProvider::Gemini => {
                gemini::complete(
                    &self.http,
                    self.provider.base_url(),
                    api_key,
                    &self.model,
                    prompt,
                    self.params,
                )
                .await
            }
            LlmProvider::Local => {
                local::complete_with_lms(&self.local_lms_path, &self.model, prompt).await
            }
        }
    }
}

#[async_trait]
impl CompletionClient for ProviderClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        tracing::info!(
            "Requesting completion from {:?}/{} ({} chars)",
            self.provider,
            self.model,
            prompt.len()
        );

        let reply = self
            .call(prompt)
            .await
            .map_err(|e| MinutesError::CompletionFailure(format!("{:#}", e)))?;

        tracing::debug!("Completion returned {} chars", reply.len());
        Ok(reply)
    }
}
