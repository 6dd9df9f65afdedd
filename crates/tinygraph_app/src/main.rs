// SPDX-License-Identifier: MIT OR Apache-2.0
//! `TinyGraph` headless host.
//!
//! Loads graph settings, installs logging, builds a demo pipeline from the
//! built-in node catalog and drives it through a series of user edits and
//! connection changes. Node health is reported through logging views.
//!
//! Usage: `tinygraph [config.ron]`

mod demo;
mod log_view;

use std::path::PathBuf;
use tinygraph_engine::GraphConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let loaded = path.as_deref().map(GraphConfig::load);
    let config = match &loaded {
        Some(Ok(config)) => config.clone(),
        _ => GraphConfig::default(),
    };

    // Logging comes up before any failure is reported
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting TinyGraph v{}", env!("CARGO_PKG_VERSION"));

    if let (Some(path), Some(result)) = (&path, &loaded) {
        match result {
            Ok(_) => tracing::info!("Loaded config from {}", path.display()),
            Err(e) => {
                tracing::error!("Failed to load config {}: {e}", path.display());
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = demo::run(config) {
        tracing::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}
