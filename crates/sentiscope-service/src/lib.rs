//! Sentiscope Service
//!
//! HTTP surface of the sentiment analyzer: the axum router, the shared
//! application state, and the in-process implementation of the
//! function-invocation seam.

pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppState, InProcessInvoker};
