//! Sentiscope Service
//!
//! Serves the sentiment-analysis endpoints: single-text and batch analysis
//! over a lazily loaded pretrained classifier, plus health and metrics.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use sentiscope_core::{config, AppConfig, FunctionSpec};
use sentiscope_model::SentimentAnalyzer;
use sentiscope_service::{create_router, AppState, InProcessInvoker};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "sentiscope-service")]
#[command(about = "Sentiment analysis function service", long_about = None)]
struct Cli {
    /// Optional settings file applied before reading configuration
    #[arg(short, long, default_value = config::DEFAULT_SETTINGS_FILE)]
    config: String,

    /// Listen address
    #[arg(short = 'l', long, default_value = "0.0.0.0")]
    listen: String,

    /// Listen port
    #[arg(short = 'P', long, default_value = "8000")]
    port: u16,

    /// Serve the lexicon backend instead of downloading model weights
    #[arg(long)]
    offline: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting sentiscope service");

    let app_config = AppConfig::load(&cli.config)?;
    info!("App name: {}", app_config.app_name);
    info!("Concurrency limit: {}", app_config.max_concurrent_requests);
    info!("Model: {}", app_config.model_id);

    let metrics_handle = init_metrics()?;

    let analyzer = if cli.offline {
        info!("Offline mode: serving the lexicon backend");
        SentimentAnalyzer::offline()
    } else {
        SentimentAnalyzer::pretrained(&app_config.model_id)
    };

    for spec in [
        FunctionSpec::analyze(app_config.max_concurrent_requests),
        FunctionSpec::batch(),
    ] {
        info!(
            "Function {}: timeout {}s, concurrency limit {:?}",
            spec.name, spec.timeout_secs, spec.concurrency_limit
        );
    }

    let app_config = Arc::new(app_config);
    let invoker = Arc::new(InProcessInvoker::new(Arc::new(analyzer), &app_config));
    let state = AppState {
        config: app_config,
        invoker,
        metrics_handle,
    };

    let addr: SocketAddr = format!("{}:{}", cli.listen, cli.port).parse()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    // Graceful shutdown handler
    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sentiscope=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sentiscope=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "sentiscope_requests_total",
        "Total number of requests by endpoint"
    );
    metrics::describe_counter!(
        "sentiscope_analyses_total",
        "Total number of analyses by status"
    );
    metrics::describe_counter!(
        "sentiscope_decisions_total",
        "Total number of endpoint decisions by action"
    );
    metrics::describe_histogram!(
        "sentiscope_inference_latency_us",
        metrics::Unit::Microseconds,
        "Classifier inference latency in microseconds"
    );
    metrics::describe_counter!("sentiscope_errors_total", "Total number of invoker errors");

    info!("Metrics exporter initialized");
    Ok(handle)
}
