pub mod models;
pub mod pdf;
pub mod whisper;

use std::fs;
use std::path::Path;

use crate::audio::convert::load_wav_for_whisper;
use crate::config::settings::TranscriptionConfig;
use crate::error::{MinutesError, Result};

/// A segment of transcribed speech
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start_ms: u64, end_ms: u64, text: String) -> Self {
        Self {
            start_ms,
            end_ms,
            text,
        }
    }

    /// `[start - end] text` with times in seconds
    pub fn to_line(&self) -> String {
        format!(
            "[{:.2} - {:.2}] {}",
            self.start_ms as f64 / 1000.0,
            self.end_ms as f64 / 1000.0,
            self.text
        )
    }
}

#[derive(Debug, Clone)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
    pub language: Option<String>,
}

impl Transcript {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self {
            segments,
            language: None,
        }
    }

    /// One timestamped line per non-empty segment
    pub fn to_timestamped_text(&self) -> String {
        self.segments
            .iter()
            .filter(|s| !s.text.trim().is_empty())
            .map(TranscriptSegment::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptSource {
    Text,
    Pdf,
    Audio,
}

impl TranscriptSource {
    pub fn for_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "txt" | "md" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            "wav" => Some(Self::Audio),
            _ => None,
        }
    }
}

/// Produce transcript text from a text file, a PDF or a WAV recording.
/// Audio is transcribed on a blocking thread with the shared Whisper engine.
pub async fn load_transcript(path: &Path, config: &TranscriptionConfig) -> Result<String> {
    let source = TranscriptSource::for_path(path)
        .ok_or_else(|| MinutesError::UnsupportedFile(path.to_path_buf()))?;

    match source {
        TranscriptSource::Text => {
            let bytes = fs::read(path)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        TranscriptSource::Pdf => pdf::extract_text(path),
        TranscriptSource::Audio => {
            let path = path.to_path_buf();
            let config = config.clone();
            let transcript = tokio::task::spawn_blocking(move || -> Result<Transcript> {
                let samples = load_wav_for_whisper(&path)?;
                let engine = whisper::shared_engine(&config)?;
                engine.transcribe(&samples, config.language.as_deref())
            })
            .await
            .map_err(|e| MinutesError::Transcription(format!("Task join error: {}", e)))??;

            tracing::info!("Transcribed {} segments", transcript.segments.len());
            Ok(transcript.to_timestamped_text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minutes::timestamps::has_timestamp_cues;
    use tempfile::tempdir;

    #[test]
    fn test_segment_line_format() {
        let segment = TranscriptSegment::new(0, 4520, "Welcome everyone".to_string());
        assert_eq!(segment.to_line(), "[0.00 - 4.52] Welcome everyone");
    }

    #[test]
    fn test_timestamped_text_is_detected_as_cues() {
        let transcript = Transcript::new(vec![
            TranscriptSegment::new(0, 2000, "Hello".to_string()),
            TranscriptSegment::new(2000, 2500, "  ".to_string()),
            TranscriptSegment::new(2500, 61000, "Let's start".to_string()),
        ]);
        let text = transcript.to_timestamped_text();
        assert_eq!(text, "[0.00 - 2.00] Hello\n[2.50 - 61.00] Let's start");
        assert!(has_timestamp_cues(&text));
    }

    #[test]
    fn test_source_for_path() {
        assert_eq!(
            TranscriptSource::for_path(Path::new("notes.TXT")),
            Some(TranscriptSource::Text)
        );
        assert_eq!(
            TranscriptSource::for_path(Path::new("call.wav")),
            Some(TranscriptSource::Audio)
        );
        assert_eq!(
            TranscriptSource::for_path(Path::new("minutes.PDF")),
            Some(TranscriptSource::Pdf)
        );
        assert_eq!(TranscriptSource::for_path(Path::new("deck.docx")), None);
        assert_eq!(TranscriptSource::for_path(Path::new("README")), None);
    }

    #[tokio::test]
    async fn test_load_text_transcript() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("meeting.txt");
        fs::write(&path, "Alice: let's ship on Friday").unwrap();

        let text = load_transcript(&path, &TranscriptionConfig::default())
            .await
            .unwrap();
        assert_eq!(text, "Alice: let's ship on Friday");
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slides.docx");
        fs::write(&path, b"PK").unwrap();

        let err = load_transcript(&path, &TranscriptionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MinutesError::UnsupportedFile(_)));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_an_extraction_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        fs::write(&path, b"%PDF-1.4\nnot really a pdf").unwrap();

        let err = load_transcript(&path, &TranscriptionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MinutesError::Extraction(_)));
    }
}
