//! Operations entrypoint: wires configuration, the fallback store and the
//! service layer, then runs one admin command and prints its envelope.

use dotenvy::dotenv;
use leadbox::config::AppConfig;
use leadbox::errors::{Error, Result};
use leadbox::notify::LogNotifier;
use leadbox::service::{ContactService, ListParams};
use leadbox::store::FallbackStore;
use serde::Serialize;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Reporting window used when the report command gets no explicit period.
const DEFAULT_REPORT_PERIOD_DAYS: i64 = 30;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; non-fatal, env vars can be set externally
    dotenv().ok();

    // 3. Load configuration (leadbox.toml + environment overrides)
    let config = AppConfig::load()?;

    // 4. Wire the store; a dead relational backend degrades to the file path
    let store = FallbackStore::connect(&config).await?;
    info!(
        relational = store.is_relational_available(),
        fallback = %config.fallback_path.display(),
        "contact store ready"
    );

    let service = ContactService::new(store, LogNotifier);

    let command = env::args().nth(1).unwrap_or_else(|| "stats".to_string());
    match command.as_str() {
        "stats" => print_json(&service.stats().await),
        "list" => print_json(&service.list(ListParams::default()).await),
        "report" => {
            let period = parse_arg(2)?.unwrap_or(DEFAULT_REPORT_PERIOD_DAYS);
            print_json(&service.report(period).await)
        }
        "cleanup" => {
            let days = parse_arg(2)?.unwrap_or_else(|| i64::from(config.retention_days));
            print_json(&service.cleanup(days).await)
        }
        "export" => {
            let format = env::args().nth(2).unwrap_or_else(|| "json".to_string());
            let response = service.export(&format).await;
            if response.success {
                println!("{}", response.body);
                Ok(())
            } else {
                print_json(&response)
            }
        }
        other => Err(Error::Config {
            message: format!(
                "Unknown command '{other}'; expected stats, list, report, cleanup or export"
            ),
        }),
    }
}

fn parse_arg(position: usize) -> Result<Option<i64>> {
    match env::args().nth(position) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| Error::Config {
            message: format!("Expected a number, got '{raw}'"),
        }),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
