//! voflow CLI
//!
//! Command-line interface for querying a TAP archive and moving results in
//! and out of a VOSpace object store.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voflow_client::PollConfig;

#[derive(Parser)]
#[command(name = "voflow")]
#[command(about = "Asynchronous TAP query and VOSpace transfer client", long_about = None)]
struct Cli {
    /// Asynchronous TAP job endpoint
    #[arg(
        long,
        env = "VOFLOW_TAP_URL",
        default_value = "http://eas.esac.esa.int/tap-dev/tap/async"
    )]
    tap_url: String,

    /// VOSpace store root URL
    #[arg(
        long,
        env = "VOFLOW_VOSPACE_URL",
        default_value = "https://vospace.esac.esa.int/vospace"
    )]
    vospace_url: String,

    /// VOSpace user name
    #[arg(long, env = "VOFLOW_USER")]
    user: Option<String>,

    /// VOSpace password
    #[arg(long, env = "VOFLOW_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Delay between job status polls, in milliseconds
    #[arg(long, default_value_t = 250)]
    poll_interval_ms: u64,

    /// Give up on a job after this many seconds without a terminal phase
    #[arg(long, default_value_t = 600)]
    max_wait_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        tap_url: cli.tap_url,
        vospace_url: cli.vospace_url,
        user: cli.user,
        password: cli.password,
        poll: PollConfig::default()
            .with_interval(Duration::from_millis(cli.poll_interval_ms))
            .with_max_wait(Duration::from_secs(cli.max_wait_secs)),
    };

    handle_command(cli.command, &config).await
}
