use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Arc;

use pyjobs_etl::cli::{handle_command, EtlCli};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging first; the log file accumulates across runs
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("etl.log")
        .expect("Failed to open log file");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(Arc::new(file))
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::from_default_env()
                .add_directive("info".parse().expect("Invalid log directive")),
        )
        .init();

    let cli = EtlCli::parse();
    handle_command(cli).await
}
