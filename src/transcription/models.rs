use crate::error::{MinutesError, Result};
use std::fmt;
use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;

const HF_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// ggml Whisper models that can be fetched on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhisperModel {
    Tiny,
    Base,
    Small,
    Medium,
    LargeV3Turbo,
}

impl WhisperModel {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "tiny" => Some(Self::Tiny),
            "base" => Some(Self::Base),
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "largev3turbo" | "turbo" => Some(Self::LargeV3Turbo),
            _ => None,
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            Self::Tiny => "ggml-tiny.bin",
            Self::Base => "ggml-base.bin",
            Self::Small => "ggml-small.bin",
            Self::Medium => "ggml-medium.bin",
            Self::LargeV3Turbo => "ggml-large-v3-turbo.bin",
        }
    }

    pub fn download_url(&self) -> String {
        format!("{}/{}", HF_BASE_URL, self.filename())
    }

    pub fn size_mb(&self) -> u64 {
        match self {
            Self::Tiny => 75,
            Self::Base => 142,
            Self::Small => 466,
            Self::Medium => 1500,
            Self::LargeV3Turbo => 1620,
        }
    }

    pub fn all() -> &'static [WhisperModel] {
        &[
            Self::Tiny,
            Self::Base,
            Self::Small,
            Self::Medium,
            Self::LargeV3Turbo,
        ]
    }
}

impl fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tiny => "tiny",
            Self::Base => "base",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::LargeV3Turbo => "large-v3-turbo",
        };
        f.write_str(name)
    }
}

/// Manages downloaded model files in one directory
pub struct ModelManager {
    models_dir: PathBuf,
}

impl ModelManager {
    pub fn new(models_dir: PathBuf) -> Self {
        Self { models_dir }
    }

    pub fn model_path(&self, model: WhisperModel) -> PathBuf {
        self.models_dir.join(model.filename())
    }

    pub fn model_exists(&self, model: WhisperModel) -> bool {
        self.model_path(model).exists()
    }

    /// Every known model with whether it is downloaded and its size
    pub fn list_all(&self) -> Vec<(WhisperModel, bool, u64)> {
        WhisperModel::all()
            .iter()
            .map(|m| (*m, self.model_exists(*m), m.size_mb()))
            .collect()
    }

    /// Download `model` unless already present. Writes to a temp file and
    /// renames so an interrupted download never looks complete.
    pub fn download_model<F>(&self, model: WhisperModel, progress: F) -> Result<PathBuf>
    where
        F: Fn(u64, u64),
    {
        fs::create_dir_all(&self.models_dir)?;

        let path = self.model_path(model);
        if path.exists() {
            let size = fs::metadata(&path)?.len();
            progress(size, size);
            return Ok(path);
        }

        let url = model.download_url();
        tracing::info!("Downloading {} from {}", model, url);

        let mut response = reqwest::blocking::Client::new()
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| MinutesError::Api(format!("Download failed: {}", e)))?;

        let total_size = response
            .content_length()
            .unwrap_or(model.size_mb() * 1024 * 1024);

        let temp_path = path.with_extension("bin.part");
        let mut file = fs::File::create(&temp_path)?;
        let mut downloaded: u64 = 0;
        let mut buffer = [0u8; 8192];

        loop {
            let bytes_read = response.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            file.write_all(&buffer[..bytes_read])?;
            downloaded += bytes_read as u64;
            progress(downloaded, total_size);
        }

        file.flush()?;
        fs::rename(&temp_path, &path)?;
        Ok(path)
    }

    pub fn delete_model(&self, model: WhisperModel) -> Result<bool> {
        let path = self.model_path(model);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_model_from_name() {
        assert_eq!(WhisperModel::from_name("base"), Some(WhisperModel::Base));
        assert_eq!(WhisperModel::from_name("SMALL"), Some(WhisperModel::Small));
        assert_eq!(
            WhisperModel::from_name("large_v3_turbo"),
            Some(WhisperModel::LargeV3Turbo)
        );
        assert_eq!(WhisperModel::from_name("invalid"), None);
    }

    #[test]
    fn test_display_round_trips_through_from_name() {
        for model in WhisperModel::all() {
            assert_eq!(WhisperModel::from_name(&model.to_string()), Some(*model));
        }
    }

    #[test]
    fn test_download_url() {
        assert_eq!(
            WhisperModel::Tiny.download_url(),
            "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-tiny.bin"
        );
    }

    #[test]
    fn test_list_all_marks_downloaded() {
        let dir = tempdir().unwrap();
        let manager = ModelManager::new(dir.path().to_path_buf());
        fs::write(manager.model_path(WhisperModel::Base), b"dummy").unwrap();

        let models = manager.list_all();
        assert_eq!(models.len(), 5);
        assert!(models
            .iter()
            .any(|(m, present, _)| *m == WhisperModel::Base && *present));
        assert!(models
            .iter()
            .any(|(m, present, _)| *m == WhisperModel::Tiny && !*present));
    }

    #[test]
    fn test_existing_model_skips_download() {
        let dir = tempdir().unwrap();
        let manager = ModelManager::new(dir.path().to_path_buf());
        fs::write(manager.model_path(WhisperModel::Tiny), b"12345").unwrap();

        let seen = std::cell::Cell::new((0, 0));
        let path = manager
            .download_model(WhisperModel::Tiny, |done, total| seen.set((done, total)))
            .unwrap();
        assert!(path.ends_with("ggml-tiny.bin"));
        assert_eq!(seen.get(), (5, 5));
    }

    #[test]
    fn test_delete_model() {
        let dir = tempdir().unwrap();
        let manager = ModelManager::new(dir.path().to_path_buf());
        let path = manager.model_path(WhisperModel::Base);
        fs::write(&path, b"dummy").unwrap();

        assert!(manager.delete_model(WhisperModel::Base).unwrap());
        assert!(!path.exists());
        assert!(!manager.delete_model(WhisperModel::Base).unwrap());
    }
}
