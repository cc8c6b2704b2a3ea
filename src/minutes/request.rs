use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MinutesError, Result};

/// Shortest transcript (after trimming) worth sending to a model
pub const MIN_TRANSCRIPT_CHARS: usize = 10;

pub const DEFAULT_LANGUAGE: &str = "english";

/// Per-invocation settings for minutes generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestConfig {
    pub transcript: String,
    #[serde(default)]
    pub meeting_title: Option<String>,
    /// Reference point for relative deadlines, `YYYY-MM-DD` on the wire
    #[serde(default)]
    pub meeting_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub include_speakers: bool,
    #[serde(default = "default_true")]
    pub include_sentiment: bool,
    #[serde(default = "default_true")]
    pub include_timeline: bool,
    #[serde(default = "default_language")]
    pub language: String,
}

impl RequestConfig {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            meeting_title: None,
            meeting_date: None,
            include_speakers: true,
            include_sentiment: true,
            include_timeline: true,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meeting_title = Some(title.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.meeting_date = Some(date);
        self
    }

    pub fn with_speakers(mut self, enabled: bool) -> Self {
        self.include_speakers = enabled;
        self
    }

    pub fn with_sentiment(mut self, enabled: bool) -> Self {
        self.include_sentiment = enabled;
        self
    }

    pub fn with_timeline(mut self, enabled: bool) -> Self {
        self.include_timeline = enabled;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Parse a request from its JSON wire form. Malformed input, including a
    /// meeting date that is not `YYYY-MM-DD`, is an invalid request.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MinutesError::InvalidRequest(e.to_string()))
    }

    /// Title to show the model, ignoring blank strings
    pub fn title(&self) -> Option<&str> {
        self.meeting_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        let len = self.transcript.trim().chars().count();
        if len < MIN_TRANSCRIPT_CHARS {
            return Err(MinutesError::InvalidRequest(format!(
                "transcript is too short or empty ({} characters, need at least {})",
                len, MIN_TRANSCRIPT_CHARS
            )));
        }
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` meeting date
pub fn parse_meeting_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| {
        MinutesError::InvalidRequest(format!("meeting date '{}' is not YYYY-MM-DD: {}", s, e))
    })
}

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let request = RequestConfig::new("Alice: let's ship it on Friday");
        assert!(request.include_speakers);
        assert!(request.include_sentiment);
        assert!(request.include_timeline);
        assert_eq!(request.language, "english");
        assert!(request.meeting_date.is_none());
    }

    #[test]
    fn test_short_transcript_rejected() {
        let err = RequestConfig::new("hi").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_whitespace_does_not_count() {
        let padded = format!("   {}   ", "abc");
        assert!(RequestConfig::new(padded).validate().is_err());
        assert!(RequestConfig::new("0123456789").validate().is_ok());
    }

    #[test]
    fn test_from_json_wire_form() {
        let request = RequestConfig::from_json(
            r#"{"transcript": "Bob: I'll update the docs tomorrow",
                "meeting_title": "Docs sync",
                "meeting_date": "2025-06-10",
                "include_speakers": true,
                "include_sentiment": false,
                "include_timeline": false,
                "language": "english"}"#,
        )
        .unwrap();
        assert_eq!(request.title(), Some("Docs sync"));
        assert_eq!(
            request.meeting_date,
            Some(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap())
        );
        assert!(!request.include_sentiment);
    }

    #[test]
    fn test_from_json_fills_missing_flags() {
        let request = RequestConfig::from_json(r#"{"transcript": "long enough text"}"#).unwrap();
        assert!(request.include_timeline);
        assert_eq!(request.language, "english");
    }

    #[test]
    fn test_from_json_bad_date() {
        let err = RequestConfig::from_json(
            r#"{"transcript": "long enough text", "meeting_date": "10/06/2025"}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_blank_title_ignored() {
        let request = RequestConfig::new("long enough text").with_title("   ");
        assert_eq!(request.title(), None);
    }

    #[test]
    fn test_parse_meeting_date() {
        assert_eq!(
            parse_meeting_date("2025-06-10").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
        );
        assert!(parse_meeting_date("June 10").is_err());
    }
}
