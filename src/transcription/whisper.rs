use crate::config::loader::models_dir;
use crate::config::settings::TranscriptionConfig;
use crate::error::{MinutesError, Result};
use crate::transcription::models::{ModelManager, WhisperModel};
use crate::transcription::{Transcript, TranscriptSegment};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Process-wide engine, loaded on first use and never reloaded
static SHARED_ENGINE: OnceCell<WhisperEngine> = OnceCell::new();

/// Whisper transcription engine
pub struct WhisperEngine {
    ctx: WhisperContext,
}

impl WhisperEngine {
    pub fn new(model_path: &Path, use_gpu: bool) -> Result<Self> {
        if !model_path.exists() {
            return Err(MinutesError::WhisperModelNotFound(model_path.to_path_buf()));
        }

        let mut params = WhisperContextParameters::default();
        params.use_gpu = use_gpu;

        let path_str = model_path.to_str().ok_or_else(|| {
            MinutesError::Transcription(format!("Model path is not UTF-8: {}", model_path.display()))
        })?;

        let ctx = WhisperContext::new_with_params(path_str, params)
            .map_err(|e| MinutesError::Transcription(format!("Failed to load model: {}", e)))?;

        Ok(Self { ctx })
    }

    /// Transcribe 16 kHz mono f32 samples
    pub fn transcribe(&self, samples: &[f32], language: Option<&str>) -> Result<Transcript> {
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| MinutesError::Transcription(format!("Failed to create state: {}", e)))?;

        let mut params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: 5,
            patience: -1.0,
        });
        params.set_language(language);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| MinutesError::Transcription(format!("Transcription failed: {}", e)))?;

        let mut segments = Vec::new();
        for i in 0..state.full_n_segments() {
            if let Some(segment) = state.get_segment(i) {
                let text = segment.to_str_lossy().map_err(|e| {
                    MinutesError::Transcription(format!("Failed to get text: {}", e))
                })?;

                // Whisper reports centiseconds
                segments.push(TranscriptSegment::new(
                    (segment.start_timestamp() * 10) as u64,
                    (segment.end_timestamp() * 10) as u64,
                    text.trim().to_string(),
                ));
            }
        }

        let mut transcript = Transcript::new(segments);
        transcript.language = language.map(str::to_string);
        Ok(transcript)
    }
}

/// Model file for the configured engine: explicit path first, then the
/// named model inside the data directory.
pub fn resolve_model_path(config: &TranscriptionConfig) -> Result<PathBuf> {
    if let Some(path) = &config.whisper_model_path {
        return Ok(path.clone());
    }

    let model = WhisperModel::from_name(&config.whisper_model).ok_or_else(|| {
        MinutesError::InvalidConfig(format!("Unknown Whisper model '{}'", config.whisper_model))
    })?;
    Ok(ModelManager::new(models_dir()?).model_path(model))
}

/// Shared engine, loading it from `config` on the first call. Later calls
/// reuse the loaded model whatever their config says.
pub fn shared_engine(config: &TranscriptionConfig) -> Result<&'static WhisperEngine> {
    SHARED_ENGINE.get_or_try_init(|| {
        let path = resolve_model_path(config)?;
        tracing::info!("Loading Whisper model from {}", path.display());
        WhisperEngine::new(&path, config.use_gpu)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_model_path_wins() {
        let config = TranscriptionConfig {
            whisper_model_path: Some(PathBuf::from("/models/custom.bin")),
            ..TranscriptionConfig::default()
        };
        assert_eq!(
            resolve_model_path(&config).unwrap(),
            PathBuf::from("/models/custom.bin")
        );
    }

    #[test]
    fn test_unknown_model_name() {
        let config = TranscriptionConfig {
            whisper_model: "gigantic".to_string(),
            ..TranscriptionConfig::default()
        };
        assert!(matches!(
            resolve_model_path(&config),
            Err(MinutesError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_model_file() {
        let dir = tempdir().unwrap();
        let result = WhisperEngine::new(&dir.path().join("ggml-base.bin"), false);
        assert!(matches!(result, Err(MinutesError::WhisperModelNotFound(_))));
    }
}
