use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::minutes::request::RequestConfig;
use crate::minutes::timestamps::has_timestamp_cues;

/// Which optional sections a request produces. Derived once per request and
/// shared by the prompt builder and the reconciler so both agree on shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaVariant {
    /// Effective timeline: requested and the transcript carries timestamp cues
    pub timeline: bool,
    pub sentiment: bool,
}

impl SchemaVariant {
    pub fn for_request(request: &RequestConfig) -> Self {
        Self {
            timeline: request.include_timeline && has_timestamp_cues(&request.transcript),
            sentiment: request.include_sentiment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(format!(
                "sentiment '{}' is not one of positive, neutral, negative",
                other
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub timestamp: String,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub task: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// `YYYY-MM-DD` as resolved by the model
    #[serde(default)]
    pub deadline: Option<String>,
}

/// Meeting minutes as returned to callers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredResult {
    pub summary_short: Vec<String>,
    pub summary_detailed: String,
    pub discussion_flow: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
    pub action_items: Vec<ActionItem>,
    pub speaker_sentiment: BTreeMap<String, Sentiment>,
    pub meeting_title: Option<String>,
    pub meeting_date: Option<NaiveDate>,
}

impl StructuredResult {
    /// Clear sections the variant disables, normalise deadlines and echo
    /// request metadata.
    pub fn enforce(&mut self, request: &RequestConfig, variant: SchemaVariant) {
        if !variant.timeline {
            self.timeline.clear();
        }
        if !variant.sentiment {
            self.speaker_sentiment.clear();
        }
        for item in &mut self.action_items {
            item.deadline = item.deadline.take().and_then(|d| normalize_deadline(&d));
        }
        self.meeting_title = request.meeting_title.clone();
        self.meeting_date = request.meeting_date;
    }
}

/// Strict `YYYY-MM-DD`, or `None` when the model wrote anything else
fn normalize_deadline(raw: &str) -> Option<String> {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date.format("%Y-%m-%d").to_string()),
        Err(_) => {
            tracing::warn!("Dropping deadline '{}', not YYYY-MM-DD", raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_requires_cues() {
        let plain = RequestConfig::new("Alice: we ship on Friday, agreed.");
        assert!(!SchemaVariant::for_request(&plain).timeline);

        let stamped = RequestConfig::new("[0.00 - 3.10] Alice: we ship on Friday");
        assert!(SchemaVariant::for_request(&stamped).timeline);

        let declined = stamped.clone().with_timeline(false);
        assert!(!SchemaVariant::for_request(&declined).timeline);
    }

    #[test]
    fn test_variant_sentiment_follows_flag() {
        let request = RequestConfig::new("Alice: we ship on Friday").with_sentiment(false);
        assert!(!SchemaVariant::for_request(&request).sentiment);
    }

    #[test]
    fn test_sentiment_parse_is_case_insensitive() {
        assert_eq!("Positive".parse::<Sentiment>(), Ok(Sentiment::Positive));
        assert_eq!(" NEUTRAL ".parse::<Sentiment>(), Ok(Sentiment::Neutral));
        assert!("mixed".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_sentiment_serializes_lowercase() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"negative\"");
    }

    #[test]
    fn test_enforce_overrides_metadata() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let request = RequestConfig::new("Alice: we ship on Friday")
            .with_title("Release")
            .with_date(date);
        let mut result = StructuredResult {
            meeting_title: Some("Hallucinated".to_string()),
            timeline: vec![TimelineEntry {
                timestamp: "00:10".to_string(),
                topic: "Intro".to_string(),
            }],
            ..Default::default()
        };
        result
            .speaker_sentiment
            .insert("Alice".to_string(), Sentiment::Positive);

        result.enforce(
            &request,
            SchemaVariant {
                timeline: false,
                sentiment: false,
            },
        );

        assert!(result.timeline.is_empty());
        assert!(result.speaker_sentiment.is_empty());
        assert_eq!(result.meeting_title.as_deref(), Some("Release"));
        assert_eq!(result.meeting_date, Some(date));
    }

    #[test]
    fn test_enforce_normalizes_deadlines() {
        let task = |deadline: &str| ActionItem {
            task: "Update the docs".to_string(),
            assigned_to: None,
            deadline: Some(deadline.to_string()),
        };
        let mut result = StructuredResult {
            action_items: vec![task("2025-06-13"), task("next Friday"), task(" 2025-06-02 ")],
            ..Default::default()
        };

        result.enforce(
            &RequestConfig::new("Bob: I'll update the docs"),
            SchemaVariant {
                timeline: true,
                sentiment: true,
            },
        );

        let deadlines: Vec<Option<&str>> = result
            .action_items
            .iter()
            .map(|item| item.deadline.as_deref())
            .collect();
        assert_eq!(deadlines, vec![Some("2025-06-13"), None, Some("2025-06-02")]);
    }

    #[test]
    fn test_meeting_date_wire_format() {
        let result = StructuredResult {
            meeting_date: NaiveDate::from_ymd_opt(2025, 6, 10),
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["meeting_date"], "2025-06-10");
        assert_eq!(json["timeline"], serde_json::json!([]));
        assert_eq!(json["speaker_sentiment"], serde_json::json!({}));
    }
}
