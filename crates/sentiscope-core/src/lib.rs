//! Sentiscope Core
//!
//! Shared types for the sentiment function service:
//! - Error types and result handling
//! - The label normalization table and wire records
//! - Process configuration with optional local overrides
//! - Deployment descriptors and the function-invocation seam

pub mod config;
pub mod deploy;
pub mod error;
pub mod invoke;
pub mod labels;
pub mod record;

pub use config::AppConfig;
pub use deploy::{EnvironmentSpec, FunctionSpec};
pub use error::{Error, Result};
pub use invoke::{FunctionInvoker, ANALYZE_FUNCTION, BATCH_FUNCTION};
pub use record::{AnalysisOutcome, BatchOutcome, SentimentRecord};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::deploy::{EnvironmentSpec, FunctionSpec};
    pub use crate::error::{Error, Result};
    pub use crate::invoke::FunctionInvoker;
    pub use crate::record::{AnalysisOutcome, BatchOutcome, SentimentRecord};
}
