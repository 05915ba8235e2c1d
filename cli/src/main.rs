//! Storefront CLI - Binary entry point.
//!
//! # Architecture
//!
//! The binary wires [`storefront_config`] (settings), [`storefront_catalog`]
//! (remote product data) and [`storefront_core`] (the cart) into a
//! line-oriented session on stdin/stdout.
//!
//! ```text
//! main() -> init_tracing() -> StorefrontConfig::load() -> CatalogClient
//!                                                            |
//!                                                            v
//!                                  Session::handle_line() per stdin line
//!                                                            |
//!                                                            v
//!                                           Flow::Continue | Flow::Quit
//! ```
//!
//! Logs go to `~/.storefront/logs/storefront.log` so they never interleave
//! with the session output.

mod command;
mod session;

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::{Write, stdout},
    path::PathBuf,
    sync::Mutex,
};
use tokio::io::{AsyncBufReadExt, BufReader, stdin};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use storefront_catalog::{CatalogClient, CatalogConfig, retry::RetryConfig};
use storefront_config::{CatalogSettings, StorefrontConfig};

use crate::session::{Flow, Session};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Without a log file, stay silent rather than writing into the session.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.storefront/logs/storefront.log
    if let Some(config_path) = StorefrontConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("storefront.log"));
    }

    // Fallback: ./.storefront/logs/storefront.log
    candidates.push(
        PathBuf::from(".storefront")
            .join("logs")
            .join("storefront.log"),
    );

    candidates
}

/// Build the catalog client, or explain why the session runs without one.
fn catalog_client(settings: CatalogSettings) -> Result<CatalogClient, String> {
    let (Some(url), Some(anon_key)) = (settings.url, settings.anon_key) else {
        return Err("catalog URL or anon key is not set".to_string());
    };

    let config = CatalogConfig::new(&url, anon_key)
        .map_err(|e| e.to_string())?
        .with_timeout(settings.timeout)
        .with_retry(RetryConfig::default().with_max_retries(settings.max_retries));

    CatalogClient::new(config).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = match StorefrontConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            eprintln!("Ignoring config: {err}");
            StorefrontConfig::default()
        }
    };

    let catalog = match catalog_client(config.catalog_settings()) {
        Ok(client) => {
            tracing::info!(url = %client.config().rest_url(), "Catalog configured");
            Some(client)
        }
        Err(reason) => {
            tracing::warn!(%reason, "Running without a catalog");
            eprintln!("Catalog unavailable: {reason}");
            None
        }
    };

    let mut session = Session::new(catalog, config.currency_symbol(), stdout());
    println!("Welcome to the store. Type `help` for commands.");

    let mut lines = BufReader::new(stdin()).lines();
    loop {
        print!("> ");
        stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if session.handle_line(&line).await? == Flow::Quit {
            break;
        }
    }

    tracing::info!("Session ended");
    Ok(())
}
