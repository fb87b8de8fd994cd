//! Local smoke harness
//!
//! Runs the fixed example texts through the single-text path and prints the
//! results. Manual entry point for checking a machine end to end; no
//! assertions, not a test suite.

use anyhow::Result;
use clap::Parser;
use sentiscope_core::{config, AppConfig, FunctionInvoker, ANALYZE_FUNCTION};
use sentiscope_model::SentimentAnalyzer;
use sentiscope_service::InProcessInvoker;
use serde_json::json;
use std::sync::Arc;

const EXAMPLE_TEXTS: [&str; 4] = [
    "I love this workshop!",
    "This is terrible",
    "It's an okay day",
    "Machine learning is amazing!",
];

#[derive(Parser, Debug)]
#[command(name = "smoke")]
#[command(about = "Run the example texts through the analyzer", long_about = None)]
struct Cli {
    /// Optional settings file applied before reading configuration
    #[arg(short, long, default_value = config::DEFAULT_SETTINGS_FILE)]
    config: String,

    /// Use the lexicon backend instead of downloading model weights
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app_config = AppConfig::load(&cli.config)?;

    let analyzer = if cli.offline {
        SentimentAnalyzer::offline()
    } else {
        SentimentAnalyzer::pretrained(&app_config.model_id)
    };
    let invoker = InProcessInvoker::new(Arc::new(analyzer), &app_config);

    println!("Testing sentiment analysis locally...");
    for text in EXAMPLE_TEXTS {
        let result = invoker.invoke(ANALYZE_FUNCTION, json!({ "text": text })).await?;
        println!("Text: '{text}'");
        match result["status"].as_str() {
            Some("success") => println!(
                "Result: {} {} ({})",
                result["label"].as_str().unwrap_or("?"),
                result["emoji"].as_str().unwrap_or(""),
                result["confidence"].as_str().unwrap_or("?"),
            ),
            _ => println!("Result: error - {}", result["error"].as_str().unwrap_or("?")),
        }
        println!("{}", "-".repeat(50));
    }

    Ok(())
}
