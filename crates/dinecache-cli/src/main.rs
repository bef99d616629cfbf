//! dinecache - print today's dining hall menu from DineOnCampus.
//!
//! Resolves the configured school and location, fetches one meal period and
//! prints it. Everything interesting lives in `dinecache-core`.

mod render;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dinecache_core::{Config, MenuFetcher};

/// Log file name prefix inside --log-dir
const LOG_FILE_PREFIX: &str = "dinecache.log";

#[derive(Debug, Parser)]
#[command(name = "dinecache", version, about = "Show a DineOnCampus dining hall menu")]
struct Cli {
    /// Meal period to show, by position in the location's period list
    #[arg(short, long, default_value_t = 0)]
    period: usize,

    /// Menu date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// School slug, overrides config
    #[arg(long)]
    school: Option<String>,

    /// Dining location name, overrides config
    #[arg(long)]
    location: Option<String>,

    /// Print the menu as JSON
    #[arg(long)]
    json: bool,

    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, env = "DINECACHE_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

/// Initialize the tracing subscriber for logging
fn init_tracing(log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_dir.as_ref());

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(school) = cli.school {
        config.school_slug = school;
    }
    if let Some(location) = cli.location {
        config.location_name = location;
    }
    info!(school = %config.school_slug, location = %config.location_name, "dinecache starting");

    let menus = MenuFetcher::from_config(&config).context("Failed to create HTTP client")?;
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());

    // The period list is unknown until a menu has loaded once
    let mut result = menus.get_menu(0, date).await;
    if result.is_some() && cli.period != 0 {
        let known = menus.period_ids().await.len();
        if cli.period >= known {
            anyhow::bail!("Period {} does not exist; this location has {} periods", cli.period, known);
        }
        result = menus.get_menu(cli.period, date).await;
    }

    let Some(result) = result else {
        let message = menus
            .last_error()
            .await
            .unwrap_or_else(|| "Unknown error.".to_string());
        anyhow::bail!(message);
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let title = menus.title().await.unwrap_or(config.location_name);
        let period_ids = menus.period_ids().await;
        let selected = period_ids.get(cli.period).map(String::as_str);
        print!("{}", render::render_menu(&title, date, &result, selected));
    }

    Ok(())
}
