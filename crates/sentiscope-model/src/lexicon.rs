//! Lexicon fallback classifier
//!
//! Keyword-ratio scoring for offline serving and tests; produces the same
//! prediction shape as the pretrained backend without downloading weights.

use crate::classifier::{Classifier, Prediction};
use aho_corasick::AhoCorasick;
use sentiscope_core::{Error, Result};

pub const LEXICON_NAME: &str = "sentiment-lexicon";

pub struct LexiconClassifier {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconClassifier {
    pub fn new() -> Result<Self> {
        let positive = [
            "good",
            "great",
            "excellent",
            "love",
            "amazing",
            "wonderful",
            "happy",
            "fantastic",
            "awesome",
            "best",
        ];
        let negative = [
            "bad",
            "terrible",
            "awful",
            "hate",
            "horrible",
            "worst",
            "sad",
            "angry",
            "disappointed",
            "poor",
        ];

        let positive = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(positive)
            .map_err(|e| Error::model(format!("failed to build positive matcher: {e}")))?;

        let negative = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(negative)
            .map_err(|e| Error::model(format!("failed to build negative matcher: {e}")))?;

        Ok(Self {
            name: LEXICON_NAME.to_string(),
            positive,
            negative,
        })
    }
}

#[async_trait::async_trait]
impl Classifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<Prediction> {
        let positive_hits = self.positive.find_iter(text).count() as f32;
        let negative_hits = self.negative.find_iter(text).count() as f32;
        let total = positive_hits + negative_hits;

        // No lexicon hits reads as neutral; otherwise split the mass by
        // hit ratio.
        let all_scores = if total == 0.0 {
            vec![
                ("negative".to_string(), 0.0),
                ("neutral".to_string(), 1.0),
                ("positive".to_string(), 0.0),
            ]
        } else {
            vec![
                ("negative".to_string(), negative_hits / total),
                ("neutral".to_string(), 0.0),
                ("positive".to_string(), positive_hits / total),
            ]
        };

        Prediction::from_scores(all_scores)
            .ok_or_else(|| Error::internal("empty lexicon score set"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
