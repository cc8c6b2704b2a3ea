use crate::config::settings::MinutesConfig;
use crate::error::{MinutesError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get XDG-compliant config directory
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "minutes")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| MinutesError::Config("Could not determine config directory".to_string()))
}

/// Get XDG-compliant data directory
pub fn data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "minutes")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MinutesError::Config("Could not determine data directory".to_string()))
}

/// Get config file path
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get Whisper models directory
pub fn models_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("models"))
}

/// Load config from the default path, creating it if missing
pub fn load_config() -> Result<MinutesConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<MinutesConfig> {
    if !path.exists() {
        let config = MinutesConfig::default();
        save_config_to(&config, path)?;
        return Ok(config);
    }

    let content = fs::read_to_string(path)?;
    let config: MinutesConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Write the default config to `path`. An existing file is left alone
/// unless `force` is set; returns whether anything was written. The old
/// file is never parsed, so a corrupt config can always be replaced.
pub fn init_config_at(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    save_config_to(&MinutesConfig::default(), path)?;
    Ok(true)
}

/// `[logging] level` from the config file, if it exists and parses.
/// Read before logging is set up, so it never creates or reports anything.
pub fn configured_log_level() -> Option<String> {
    let content = fs::read_to_string(config_path().ok()?).ok()?;
    toml::from_str::<MinutesConfig>(&content)
        .ok()
        .map(|config| config.logging.level)
}

pub fn save_config_to(config: &MinutesConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

/// Load config and apply environment overrides
pub fn load_config_with_env() -> Result<MinutesConfig> {
    let mut config = load_config()?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

fn apply_env_overrides<F>(config: &mut MinutesConfig, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(provider) = var("MINUTES_LLM_PROVIDER") {
        config.llm.provider = provider;
    }
    if let Some(model) = var("MINUTES_LLM_MODEL") {
        config.llm.model = Some(model);
    }
    if let Some(key) = var("MINUTES_LLM_API_KEY") {
        config.llm.api_key = Some(key);
    }
    if config.llm.api_key.is_none() && config.llm.provider.eq_ignore_ascii_case("gemini") {
        config.llm.api_key = var("GOOGLE_API_KEY");
    }
    if let Some(model) = var("MINUTES_WHISPER_MODEL") {
        config.transcription.whisper_model = model;
    }
}
