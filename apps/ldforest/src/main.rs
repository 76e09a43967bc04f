//! # ldforest - JSON-LD Graph Resolver
//!
//! The main binary for the ldforest graph engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            apps/ldforest (THE BINARY)        │
//! │                                              │
//! │  ┌─────────────┐          ┌───────────────┐  │
//! │  │   CLI       │          │    Config     │  │
//! │  │  (clap)     │          │  (toml, env)  │  │
//! │  └──────┬──────┘          └───────┬───────┘  │
//! │         └────────────┬────────────┘          │
//! │                      ▼                       │
//! │              ┌───────────────┐               │
//! │              │ ldforest-core │               │
//! │              │  (THE LOGIC)  │               │
//! │              └───────────────┘               │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! ldforest resolve -f graph.jsonld --top-level --pretty
//! ldforest entity -f record.jsonld
//! cat annotation.jsonld | ldforest lift
//! ldforest label -f glossary.jsonld --id ex:almanac
//! ```

use clap::Parser;
use ldforest::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // Initialize tracing. LDFOREST_LOG_FORMAT=json enables machine-parseable output.
    // Logs go to stderr; stdout carries the command output.
    let log_format = std::env::var("LDFOREST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "ldforest=debug,ldforest_core=debug"
    } else {
        "ldforest=info,ldforest_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
