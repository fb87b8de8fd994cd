//! Error types for sentiscope

/// Result type alias using sentiscope's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sentiscope operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Model loading or inference errors
    #[error("model error: {0}")]
    Model(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Bootstrap/setup errors
    #[error("setup error: {0}")]
    Setup(String),

    /// Function invocation errors
    #[error("invoke error: {0}")]
    Invoke(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new setup error
    pub fn setup(msg: impl Into<String>) -> Self {
        Self::Setup(msg.into())
    }

    /// Create a new invocation error
    pub fn invoke(msg: impl Into<String>) -> Self {
        Self::Invoke(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
