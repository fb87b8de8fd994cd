//! Function invocation seam

use crate::Result;
use serde_json::Value;

/// Name of the deployed single-text analysis function.
pub const ANALYZE_FUNCTION: &str = "analyze_sentiment";

/// Name of the deployed batch analysis function.
pub const BATCH_FUNCTION: &str = "batch_sentiment_analysis";

/// Capability to invoke a deployed function by name.
///
/// The web endpoints call the analysis functions through this trait rather
/// than through a concrete platform client, so endpoint logic runs unchanged
/// against an in-process implementation locally and in tests.
#[async_trait::async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// Invoke `function` with a JSON payload, returning its JSON result.
    async fn invoke(&self, function: &str, payload: Value) -> Result<Value>;
}
