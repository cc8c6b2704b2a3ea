//! Local scan for timestamp cues in a transcript.
//!
//! A timeline is only worth requesting when the transcript carries timing
//! information the model can cite. Two shapes count: bracketed segment ranges
//! as written by the transcriber (`[12.40 - 15.02]`) and clock tokens
//! (`9:05`, `01:02:33`, `10:30am`).

use once_cell::sync::Lazy;
use regex::Regex;

static BRACKETED_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\s*\d+(?:[.:]\d+)*\s*-\s*\d+(?:[.:]\d+)*\s*\]").expect("Invalid regex")
});

static CLOCK_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{1,2}:\d{2}(?::\d{2})?(?:\b|(?i:[ap]\.?m)\b)").expect("Invalid regex")
});

pub fn has_timestamp_cues(transcript: &str) -> bool {
    BRACKETED_RANGE_RE.is_match(transcript) || CLOCK_TOKEN_RE.is_match(transcript)
}
