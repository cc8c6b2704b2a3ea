use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinutesError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Completion failed: {0}")]
    CompletionFailure(String),

    #[error("Model output is not JSON: {reason}")]
    UnparsableOutput { raw: String, reason: String },

    #[error("Model output does not fit the minutes schema: {0}")]
    NotSerializable(String),

    #[error("Unsupported transcript file: {0}")]
    UnsupportedFile(PathBuf),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Whisper model not found: {0}")]
    WhisperModelNotFound(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification callers can branch on without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    CompletionFailure,
    UnparsableOutput,
    NotSerializable,
    Other,
}

impl MinutesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::CompletionFailure(_) => ErrorKind::CompletionFailure,
            Self::UnparsableOutput { .. } => ErrorKind::UnparsableOutput,
            Self::NotSerializable(_) => ErrorKind::NotSerializable,
            _ => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, MinutesError>;
