//! Wire records for analysis outcomes
//!
//! These are the stable JSON contract of the service. Records exist for the
//! lifetime of a single request; nothing here is persisted.

use serde::{Deserialize, Serialize};

/// Normalized single-text result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    /// Input text, echoed back
    pub text: String,

    /// Display label from the normalization table (or the raw label verbatim)
    pub label: String,

    /// Top-class score, rounded to 3 decimal places
    pub score: f64,

    /// `score * 100` rounded to 1 decimal place with a trailing `%`
    pub confidence: String,

    /// Display glyph for the label
    pub emoji: String,
}

impl SentimentRecord {
    /// Build a record from a raw score, applying rounding and formatting.
    pub fn new(
        text: impl Into<String>,
        label: impl Into<String>,
        score: f32,
        emoji: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            score: round_score(score),
            confidence: format_confidence(score),
            emoji: emoji.into(),
        }
    }
}

/// Outcome of one analysis call.
///
/// Serializes with a `status` tag: success carries the full record, error
/// carries the message in place of label/score fields. Analysis never raises;
/// internal failures become the error arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Success {
        #[serde(flatten)]
        record: SentimentRecord,
    },
    Error {
        text: String,
        error: String,
    },
}

impl AnalysisOutcome {
    /// Error outcome carrying the failure message.
    pub fn error(text: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Error {
            text: text.into(),
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Per-item record of the batch path.
///
/// The batch contract is narrower than the single-text one: no glyph and no
/// confidence string, only the normalized label and rounded score. Clients
/// that need the full record call the single-text path per item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchOutcome {
    Success {
        text: String,
        label: String,
        score: f64,
    },
    Error {
        text: String,
        error: String,
    },
}

impl BatchOutcome {
    /// Success entry from an already-normalized record.
    pub fn success(text: impl Into<String>, label: impl Into<String>, score: f64) -> Self {
        Self::Success {
            text: text.into(),
            label: label.into(),
            score,
        }
    }

    /// Error entry carrying the failure message.
    pub fn error(text: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Error {
            text: text.into(),
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Round a unit-interval score to 3 decimal places.
pub fn round_score(score: f32) -> f64 {
    (score as f64 * 1000.0).round() / 1000.0
}

/// Format a unit-interval score as a percentage with 1 decimal place.
pub fn format_confidence(score: f32) -> String {
    format!("{:.1}%", score as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.87654), 0.877);
        assert_eq!(round_score(0.1), 0.1);
        assert_eq!(round_score(1.0), 1.0);
        assert_eq!(round_score(0.0005), 0.001);
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(0.87654), "87.7%");
        assert_eq!(format_confidence(1.0), "100.0%");
        assert_eq!(format_confidence(0.5), "50.0%");
    }

    #[test]
    fn test_success_serialization() {
        let outcome = AnalysisOutcome::Success {
            record: SentimentRecord::new("great stuff", "Positive", 0.9876, "\u{1F60A}"),
        };

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["text"], "great stuff");
        assert_eq!(value["label"], "Positive");
        assert_eq!(value["score"], 0.988);
        assert_eq!(value["confidence"], "98.8%");
        assert_eq!(value["emoji"], "\u{1F60A}");
    }

    #[test]
    fn test_error_serialization() {
        let outcome = AnalysisOutcome::error("some text", "weights unavailable");

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "weights unavailable");
        assert!(value.get("label").is_none());
        assert!(value.get("score").is_none());
    }

    #[test]
    fn test_batch_outcome_serialization() {
        let ok = BatchOutcome::success("a", "Negative", 0.75);
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["label"], "Negative");
        assert!(value.get("emoji").is_none());

        let err = BatchOutcome::error("b", "boom");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "boom");
    }

    #[test]
    fn test_outcome_roundtrip() {
        let outcome = AnalysisOutcome::Success {
            record: SentimentRecord::new("ok", "Neutral", 0.5, "\u{1F610}"),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        let back: AnalysisOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }
}
