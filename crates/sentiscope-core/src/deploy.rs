//! Deployment descriptors for the managed platform
//!
//! The remote platform owns container builds, autoscaling, request routing,
//! and timeout enforcement. This module only describes the units the service
//! wants deployed; descriptors are created once and never mutated.

use crate::invoke::{ANALYZE_FUNCTION, BATCH_FUNCTION};
use serde::{Deserialize, Serialize};

/// Immutable runtime environment attached to a deployable function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSpec {
    /// Managed runtime version inside the container image
    pub runtime_version: String,

    /// Packages baked into the image. Versions are pinned exactly so
    /// deployments are reproducible.
    pub packages: Vec<String>,
}

impl EnvironmentSpec {
    /// Image used by the sentiment functions.
    pub fn sentiment_image() -> Self {
        Self {
            runtime_version: "3.11".to_string(),
            packages: vec![
                "transformers==4.36.0".to_string(),
                "torch==2.1.0".to_string(),
                "fastapi==0.104.1".to_string(),
                "pydantic==2.5.0".to_string(),
            ],
        }
    }

    /// Empty environment for connectivity probes.
    pub fn minimal() -> Self {
        Self {
            runtime_version: "3.11".to_string(),
            packages: Vec::new(),
        }
    }
}

/// Descriptor for one deployable function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,

    pub environment: EnvironmentSpec,

    /// Per-invocation timeout in seconds, enforced by the platform
    pub timeout_secs: u64,

    /// Maximum concurrent invocations; `None` leaves the platform default
    pub concurrency_limit: Option<u32>,
}

impl FunctionSpec {
    /// The single-text analysis function. Carries the configured concurrency
    /// limit and a 5 minute timeout.
    pub fn analyze(concurrency_limit: u32) -> Self {
        Self {
            name: ANALYZE_FUNCTION.to_string(),
            environment: EnvironmentSpec::sentiment_image(),
            timeout_secs: 300,
            concurrency_limit: Some(concurrency_limit),
        }
    }

    /// The batch analysis function. Longer 10 minute timeout for bulk work.
    pub fn batch() -> Self {
        Self {
            name: BATCH_FUNCTION.to_string(),
            environment: EnvironmentSpec::sentiment_image(),
            timeout_secs: 600,
            concurrency_limit: None,
        }
    }

    /// Minimal no-op function used by setup to confirm the remote service
    /// accepts submissions. Nothing is deployed.
    pub fn noop() -> Self {
        Self {
            name: "connection_probe".to_string(),
            environment: EnvironmentSpec::minimal(),
            timeout_secs: 60,
            concurrency_limit: Some(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_image_pins_exact_versions() {
        let image = EnvironmentSpec::sentiment_image();
        assert_eq!(image.runtime_version, "3.11");
        assert_eq!(
            image.packages,
            vec![
                "transformers==4.36.0",
                "torch==2.1.0",
                "fastapi==0.104.1",
                "pydantic==2.5.0",
            ]
        );
    }

    #[test]
    fn test_function_specs() {
        let analyze = FunctionSpec::analyze(10);
        assert_eq!(analyze.name, "analyze_sentiment");
        assert_eq!(analyze.timeout_secs, 300);
        assert_eq!(analyze.concurrency_limit, Some(10));

        let batch = FunctionSpec::batch();
        assert_eq!(batch.name, "batch_sentiment_analysis");
        assert_eq!(batch.timeout_secs, 600);
        assert_eq!(batch.concurrency_limit, None);

        let noop = FunctionSpec::noop();
        assert!(noop.environment.packages.is_empty());
    }
}
