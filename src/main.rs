use clap::Parser;

mod app;
mod config;
mod errors;
mod format;
mod images;
mod meals;
mod nutrition;
mod report;
mod shopping;

use crate::app::Mode;
use crate::config::AppConfig;

/// Renders the meal log report and the shopping checklist as markdown.
#[derive(Debug, Parser)]
#[command(name = "carbolog", version)]
struct Cli {
    /// Documents to render, in order
    #[arg(value_enum, required = true)]
    modes: Vec<Mode>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "carbolog=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    tracing::debug!(?config, "configuration loaded");

    for mode in cli.modes {
        let out = app::run(mode, &config)?;
        tracing::info!(?mode, path = %out.display(), "done");
    }

    Ok(())
}
