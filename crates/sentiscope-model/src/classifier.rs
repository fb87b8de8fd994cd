//! Classifier trait and prediction types

use async_trait::async_trait;
use sentiscope_core::Result;

/// Trait for sentiment classification backends
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text, returning the top class and all class scores
    async fn classify(&self, text: &str) -> Result<Prediction>;

    /// Backend name (model identifier or lexicon name)
    fn name(&self) -> &str;
}

/// Raw prediction, before label normalization
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Raw top-class label as emitted by the backend
    pub label: String,

    /// Top-class score (0.0-1.0)
    pub score: f32,

    /// Scores for every class
    pub all_scores: Vec<(String, f32)>,
}

impl Prediction {
    /// Build a prediction by selecting the maximum-score class.
    ///
    /// Returns `None` for an empty score list.
    pub fn from_scores(all_scores: Vec<(String, f32)>) -> Option<Self> {
        let (label, score) = all_scores
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .cloned()?;
        Some(Self {
            label,
            score,
            all_scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scores_selects_max() {
        let prediction = Prediction::from_scores(vec![
            ("negative".to_string(), 0.1),
            ("neutral".to_string(), 0.2),
            ("positive".to_string(), 0.7),
        ])
        .unwrap();

        assert_eq!(prediction.label, "positive");
        assert_eq!(prediction.score, 0.7);
        assert_eq!(prediction.all_scores.len(), 3);
    }

    #[test]
    fn test_from_scores_empty() {
        assert!(Prediction::from_scores(Vec::new()).is_none());
    }
}
