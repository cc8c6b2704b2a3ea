use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::llm::LlmProvider;
use crate::minutes::request::DEFAULT_LANGUAGE;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinutesConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub transcription: TranscriptionConfig,

    #[serde(default)]
    pub defaults: RequestDefaults,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "gemini", "anthropic", "openai", "moonshot", "openrouter", "local" or "none"
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model id; the provider's default when unset
    pub model: Option<String>,
    pub api_key: Option<String>,
    /// Path to the LM Studio `lms` binary (searched when empty)
    #[serde(default)]
    pub local_lms_path: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Whole-request timeout for hosted providers
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn effective_model(&self) -> String {
        if let Some(model) = self.model.as_deref().filter(|m| !m.trim().is_empty()) {
            return model.to_string();
        }
        LlmProvider::from_provider(&self.provider)
            .map(|p| p.default_model().to_string())
            .unwrap_or_default()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            api_key: None,
            local_lms_path: String::new(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Whisper model: tiny, base, small, medium, large-v3-turbo
    #[serde(default = "default_whisper_model")]
    pub whisper_model: String,
    /// Explicit ggml model file, overrides `whisper_model`
    pub whisper_model_path: Option<PathBuf>,
    #[serde(default)]
    pub use_gpu: bool,
    /// Spoken language hint, auto-detected when unset
    pub language: Option<String>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            whisper_model: default_whisper_model(),
            whisper_model_path: None,
            use_gpu: false,
            language: None,
        }
    }
}

/// Request flags used when the command line does not override them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDefaults {
    #[serde(default = "default_true")]
    pub include_speakers: bool,
    #[serde(default = "default_true")]
    pub include_sentiment: bool,
    #[serde(default = "default_true")]
    pub include_timeline: bool,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            include_speakers: true,
            include_sentiment: true,
            include_timeline: true,
            language: default_language(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_whisper_model() -> String {
    "small".to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_creates() {
        let config = MinutesConfig::default();
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.transcription.whisper_model, "small");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_request_defaults() {
        let defaults = RequestDefaults::default();
        assert!(defaults.include_speakers);
        assert!(defaults.include_sentiment);
        assert!(defaults.include_timeline);
        assert_eq!(defaults.language, "english");
    }

    #[test]
    fn test_effective_model_falls_back_to_provider_default() {
        let llm = LlmConfig::default();
        assert_eq!(llm.effective_model(), "gemini-2.0-flash");

        let llm = LlmConfig {
            provider: "anthropic".to_string(),
            model: Some("  ".to_string()),
            ..LlmConfig::default()
        };
        assert_eq!(llm.effective_model(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: MinutesConfig = toml::from_str(
            r#"
            [llm]
            provider = "openai"

            [defaults]
            include_timeline = false
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.max_tokens, 4096);
        assert!(!config.defaults.include_timeline);
        assert!(config.defaults.include_sentiment);
    }
}
