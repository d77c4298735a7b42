//! Query command handlers

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::*;
use tokio_util::sync::CancellationToken;
use voflow_client::TapClient;
use voflow_core::domain::payload::Payload;
use voflow_core::domain::query::QuerySpec;

use crate::commands::vospace::vospace_client;
use crate::config::Config;

/// Submit a query, wait for the result, write it to a file or stdout
pub async fn run_query(
    config: &Config,
    adql: &str,
    output: Option<PathBuf>,
    format: &str,
    name: &str,
) -> Result<()> {
    let bytes = execute_query(config, adql, format, name).await?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            println!(
                "{}",
                format!("Wrote {} bytes to {}", bytes.len(), path.display()).green()
            );
        }
        None => {
            print!("{}", String::from_utf8_lossy(&bytes));
        }
    }
    Ok(())
}

/// Submit a query and push its result straight into VOSpace
pub async fn run_and_store(config: &Config, adql: &str, folder: &str, file: &str) -> Result<()> {
    let bytes = execute_query(config, adql, "csv", "voflow").await?;
    println!(
        "{}",
        format!("Query finished, {} result bytes", bytes.len()).bold()
    );

    let vospace = vospace_client(config)?;
    vospace
        .store(
            folder,
            file,
            Payload::Bytes(bytes),
            None,
            &config.poll,
            &CancellationToken::new(),
        )
        .await
        .context("storing query result in VOSpace")?;

    println!(
        "{}",
        format!("Result stored as {folder}/{file} in your VOSpace").green()
    );
    Ok(())
}

async fn execute_query(config: &Config, adql: &str, format: &str, name: &str) -> Result<Vec<u8>> {
    let tap = TapClient::new(&config.tap_url);
    let spec = QuerySpec::new(adql).with_format(format).with_name(name);

    let mut handle = tap.submit(&spec).await.context("submitting query job")?;
    println!("{}", format!("Query job {} submitted", handle.job_id).bold());

    tap.await_result(&mut handle, &config.poll, &CancellationToken::new())
        .await
        .context("waiting for query result")
}
