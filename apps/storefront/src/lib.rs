//! # Web Larek Storefront
//!
//! Terminal storefront: browse the catalog, fill a basket, check out.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Session                               │
//! │                                                                         │
//! │  stdin ──► shell ──► app::Storefront::execute ──► views (intents)       │
//! │                                                      │                  │
//! │                                                      ▼                  │
//! │                                               EventBus (larek-core)     │
//! │                                                      │                  │
//! │                              orchestration ◄─────────┘                  │
//! │                              │          │                               │
//! │                    AppState ◄┘          └► BackendWorker ──► larek-api  │
//! │                                                          │              │
//! │  shell ◄── BackendResults ◄──────────────────────────────┘              │
//! │    └──► Storefront::deliver ──► EventBus                                │
//! │                                                                         │
//! │  stdout ◄── Storefront::render ◄── views (render state)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Parse command line
//! 2. Initialize tracing (stderr)
//! 3. Load configuration
//! 4. Build the HTTP client and the session
//! 5. Spawn the backend worker, queue the catalog fetch
//! 6. Run the shell until `quit`

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod input;
pub mod orchestration;
pub mod shell;
pub mod views;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use larek_api::LarekClient;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::Storefront;
use crate::config::{ConfigOverrides, StorefrontConfig};
use crate::error::AppResult;

/// Command line of the `storefront` binary.
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Web Larek terminal storefront")]
pub struct Cli {
    /// Path to storefront.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API root, e.g. https://larek-api.nomoreparties.co/api/weblarek
    #[arg(long)]
    pub api_url: Option<String>,

    /// Image CDN root
    #[arg(long)]
    pub cdn_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Log at debug level (RUST_LOG still wins)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_url: self.api_url.clone(),
            cdn_url: self.cdn_url.clone(),
            timeout_secs: self.timeout,
        }
    }
}

/// Runs the storefront until the user quits.
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    info!("Starting Web Larek storefront");

    let config = StorefrontConfig::load(cli.config.clone(), &cli.overrides())?;
    info!(api = %config.api.base_url, "Configuration loaded");

    let client = LarekClient::new(&config.api_config())?;
    let (mut app, worker, results) = Storefront::new(Arc::new(client), &config);
    let worker = tokio::spawn(worker.run());

    app.load_catalog()?;
    let result = shell::run(&app, results).await;

    // Dropping the session closes the command channel and stops the worker
    app.shutdown();
    drop(app);
    if let Err(e) = worker.await {
        warn!("Backend worker ended abnormally: {}", e);
    }

    result
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - default: `info`
/// - `--verbose`: `debug` for the storefront crates
/// - `RUST_LOG` overrides both
///
/// Logs are written to stderr.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,larek_core=debug,larek_api=debug,larek_storefront=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "storefront",
            "--api-url",
            "http://localhost:3000/api/weblarek",
            "--timeout",
            "5",
            "-v",
        ]);

        assert!(cli.verbose);
        let overrides = cli.overrides();
        assert_eq!(
            overrides.api_url.as_deref(),
            Some("http://localhost:3000/api/weblarek")
        );
        assert_eq!(overrides.cdn_url, None);
        assert_eq!(overrides.timeout_secs, Some(5));
    }
}
