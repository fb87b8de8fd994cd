//! Application state and the in-process invoker

use metrics_exporter_prometheus::PrometheusHandle;
use sentiscope_core::{
    AppConfig, Error, FunctionInvoker, FunctionSpec, Result, ANALYZE_FUNCTION, BATCH_FUNCTION,
};
use sentiscope_model::SentimentAnalyzer;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// Invocation seam the endpoints delegate to
    pub invoker: Arc<dyn FunctionInvoker>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

#[derive(Debug, Deserialize)]
struct AnalyzeArgs {
    text: String,
}

#[derive(Debug, Deserialize)]
struct BatchArgs {
    texts: Vec<String>,
}

/// In-process implementation of the invocation seam.
///
/// The managed platform enforces the concurrency limit and timeout attached
/// to each function descriptor remotely; this invoker applies the same
/// declarative numbers to local execution, so behavior matches in both
/// contexts. A warm analyzer handle is reused across invocations.
pub struct InProcessInvoker {
    analyzer: Arc<SentimentAnalyzer>,
    analyze_spec: FunctionSpec,
    batch_spec: FunctionSpec,
    permits: Semaphore,
}

impl InProcessInvoker {
    pub fn new(analyzer: Arc<SentimentAnalyzer>, config: &AppConfig) -> Self {
        Self {
            analyzer,
            analyze_spec: FunctionSpec::analyze(config.max_concurrent_requests),
            batch_spec: FunctionSpec::batch(),
            permits: Semaphore::new(config.max_concurrent_requests as usize),
        }
    }

    async fn run_analyze(&self, payload: Value) -> Result<Value> {
        let args: AnalyzeArgs = serde_json::from_value(payload)?;
        let outcome = self.analyzer.analyze(&args.text).await;
        Ok(serde_json::to_value(outcome)?)
    }

    async fn run_batch(&self, payload: Value) -> Result<Value> {
        let args: BatchArgs = serde_json::from_value(payload)?;
        let outcomes = self.analyzer.analyze_batch(&args.texts).await;
        Ok(serde_json::to_value(outcomes)?)
    }
}

#[async_trait::async_trait]
impl FunctionInvoker for InProcessInvoker {
    async fn invoke(&self, function: &str, payload: Value) -> Result<Value> {
        let spec = match function {
            ANALYZE_FUNCTION => &self.analyze_spec,
            BATCH_FUNCTION => &self.batch_spec,
            other => return Err(Error::invoke(format!("unknown function: {other}"))),
        };

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| Error::internal("invoker semaphore closed"))?;

        let deadline = Duration::from_secs(spec.timeout_secs);
        let result = match function {
            ANALYZE_FUNCTION => {
                tokio::time::timeout(deadline, self.run_analyze(payload)).await
            }
            _ => tokio::time::timeout(deadline, self.run_batch(payload)).await,
        };

        result.map_err(|_| Error::Timeout)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn invoker() -> InProcessInvoker {
        let analyzer = Arc::new(SentimentAnalyzer::offline());
        InProcessInvoker::new(analyzer, &AppConfig::default())
    }

    #[tokio::test]
    async fn test_invoke_analyze() {
        let result = invoker()
            .invoke(ANALYZE_FUNCTION, json!({"text": "I love this"}))
            .await
            .unwrap();

        assert_eq!(result["status"], "success");
        assert_eq!(result["label"], "Positive");
    }

    #[tokio::test]
    async fn test_invoke_batch_preserves_order() {
        let result = invoker()
            .invoke(BATCH_FUNCTION, json!({"texts": ["great stuff", "awful day"]}))
            .await
            .unwrap();

        let entries = result.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["text"], "great stuff");
        assert_eq!(entries[0]["label"], "Positive");
        assert_eq!(entries[1]["text"], "awful day");
        assert_eq!(entries[1]["label"], "Negative");
    }

    #[tokio::test]
    async fn test_invoke_unknown_function() {
        let err = invoker()
            .invoke("no_such_function", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Invoke(_)));
    }

    #[tokio::test]
    async fn test_invoke_rejects_malformed_payload() {
        let err = invoker()
            .invoke(ANALYZE_FUNCTION, json!({"body": 42}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
