//! Lazy analyzer over a classification backend
//!
//! The classifier handle is constructed at most once per process through a
//! single-initialization cell; concurrent first requests wait on the same
//! load instead of triggering redundant ones. Analysis itself never returns
//! `Err`: internal failures are converted into structured error outcomes.

use crate::classifier::{Classifier, Prediction};
use crate::lexicon::LexiconClassifier;
use crate::roberta::RobertaClassifier;
use sentiscope_core::{labels, AnalysisOutcome, BatchOutcome, Error, Result, SentimentRecord};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;

/// Factory producing the classifier on first use.
pub type ClassifierLoader = Arc<dyn Fn() -> Result<Arc<dyn Classifier>> + Send + Sync>;

pub struct SentimentAnalyzer {
    cell: OnceCell<Arc<dyn Classifier>>,
    loader: ClassifierLoader,
}

impl SentimentAnalyzer {
    /// Analyzer backed by the pretrained checkpoint for `model_id`. The
    /// checkpoint downloads on first use, not at construction.
    pub fn pretrained(model_id: &str) -> Self {
        let model_id = model_id.to_string();
        Self::with_loader(Arc::new(move || {
            Ok(Arc::new(RobertaClassifier::load(&model_id)?) as Arc<dyn Classifier>)
        }))
    }

    /// Analyzer backed by the offline lexicon.
    pub fn offline() -> Self {
        Self::with_loader(Arc::new(|| {
            Ok(Arc::new(LexiconClassifier::new()?) as Arc<dyn Classifier>)
        }))
    }

    /// Analyzer over a custom loader. Tests inject mock backends here.
    pub fn with_loader(loader: ClassifierLoader) -> Self {
        Self {
            cell: OnceCell::new(),
            loader,
        }
    }

    /// Shared classifier handle, initialized at most once.
    async fn classifier(&self) -> Result<Arc<dyn Classifier>> {
        self.cell
            .get_or_try_init(|| {
                let loader = Arc::clone(&self.loader);
                async move {
                    // Checkpoint loading blocks on download and mmap.
                    tokio::task::spawn_blocking(move || loader())
                        .await
                        .map_err(|e| Error::internal(format!("classifier load task failed: {e}")))?
                }
            })
            .await
            .cloned()
    }

    /// Analyze one text.
    ///
    /// Returns a success outcome with the normalized record, or an error
    /// outcome carrying the failure message. Blank-input validation is the
    /// caller's concern; this function classifies whatever it is given.
    pub async fn analyze(&self, text: &str) -> AnalysisOutcome {
        match self.classify_normalized(text).await {
            Ok(record) => {
                metrics::counter!("sentiscope_analyses_total", "status" => "success").increment(1);
                AnalysisOutcome::Success { record }
            }
            Err(e) => {
                metrics::counter!("sentiscope_analyses_total", "status" => "error").increment(1);
                tracing::warn!(error = %e, "analysis failed");
                AnalysisOutcome::error(text, e.to_string())
            }
        }
    }

    /// Analyze a sequence of texts, producing one outcome per input in input
    /// order. Each item is isolated: a failure marks that entry and the rest
    /// of the batch still runs.
    pub async fn analyze_batch(&self, texts: &[String]) -> Vec<BatchOutcome> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            let outcome = match self.classify_normalized(text).await {
                Ok(record) => {
                    metrics::counter!("sentiscope_analyses_total", "status" => "success")
                        .increment(1);
                    BatchOutcome::success(record.text, record.label, record.score)
                }
                Err(e) => {
                    metrics::counter!("sentiscope_analyses_total", "status" => "error")
                        .increment(1);
                    BatchOutcome::error(text, e.to_string())
                }
            };
            results.push(outcome);
        }
        results
    }

    /// Single normalization path shared by both entry points: classify, pick
    /// the max class, map the label through the table, round and format.
    async fn classify_normalized(&self, text: &str) -> Result<SentimentRecord> {
        let classifier = self.classifier().await?;

        let start = Instant::now();
        let Prediction { label, score, .. } = classifier.classify(text).await?;
        metrics::histogram!("sentiscope_inference_latency_us")
            .record(start.elapsed().as_micros() as f64);

        let (label, emoji) = labels::normalize(&label);
        Ok(SentimentRecord::new(text, label, score, emoji))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock backend with a fixed score table and a construction counter.
    struct MockClassifier {
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl Classifier for MockClassifier {
        async fn classify(&self, text: &str) -> Result<Prediction> {
            if Some(text) == self.fail_on {
                return Err(Error::model("induced failure"));
            }
            let scores = vec![
                ("LABEL_0".to_string(), 0.05),
                ("LABEL_1".to_string(), 0.05),
                ("LABEL_2".to_string(), 0.9),
            ];
            Ok(Prediction::from_scores(scores).unwrap())
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn mock_analyzer(fail_on: Option<&'static str>) -> SentimentAnalyzer {
        SentimentAnalyzer::with_loader(Arc::new(move || {
            Ok(Arc::new(MockClassifier { fail_on }) as Arc<dyn Classifier>)
        }))
    }

    #[tokio::test]
    async fn test_analyze_normalizes_labels_and_scores() {
        let analyzer = mock_analyzer(None);
        let outcome = analyzer.analyze("nice").await;

        let AnalysisOutcome::Success { record } = outcome else {
            panic!("expected success outcome");
        };
        assert_eq!(record.text, "nice");
        assert_eq!(record.label, "Positive");
        assert_eq!(record.score, 0.9);
        assert_eq!(record.confidence, "90.0%");
        assert_eq!(record.emoji, "\u{1F60A}");
    }

    #[tokio::test]
    async fn test_analyze_converts_failures_into_error_outcomes() {
        let analyzer = mock_analyzer(Some("boom"));
        let outcome = analyzer.analyze("boom").await;

        let AnalysisOutcome::Error { text, error } = outcome else {
            panic!("expected error outcome");
        };
        assert_eq!(text, "boom");
        assert!(error.contains("induced failure"));
    }

    #[tokio::test]
    async fn test_loader_failure_is_caught() {
        let analyzer = SentimentAnalyzer::with_loader(Arc::new(|| {
            Err(Error::model("weights unavailable"))
        }));

        let outcome = analyzer.analyze("anything").await;
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_classifier_is_constructed_once() {
        static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

        let analyzer = SentimentAnalyzer::with_loader(Arc::new(|| {
            CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(MockClassifier { fail_on: None }) as Arc<dyn Classifier>)
        }));

        for _ in 0..3 {
            analyzer.analyze("warm").await;
        }
        assert_eq!(CONSTRUCTIONS.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_failures() {
        let analyzer = mock_analyzer(Some("b"));
        let texts: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();

        let results = analyzer.analyze_batch(&texts).await;
        assert_eq!(results.len(), 3);

        assert!(matches!(&results[0], BatchOutcome::Success { text, .. } if text == "a"));
        assert!(matches!(&results[1], BatchOutcome::Error { text, .. } if text == "b"));
        assert!(matches!(&results[2], BatchOutcome::Success { text, .. } if text == "c"));
    }

    #[tokio::test]
    async fn test_batch_uses_the_same_normalization() {
        let analyzer = mock_analyzer(None);
        let texts = vec!["x".to_string()];

        let results = analyzer.analyze_batch(&texts).await;
        let BatchOutcome::Success { label, score, .. } = &results[0] else {
            panic!("expected success entry");
        };
        assert_eq!(label, "Positive");
        assert_eq!(*score, 0.9);
    }
}
