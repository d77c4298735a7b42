//! VOSpace command handlers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::*;
use tokio_util::sync::CancellationToken;
use voflow_client::VospaceClient;

use crate::config::Config;

/// Build a store client with credentials from the configuration
pub fn vospace_client(config: &Config) -> Result<VospaceClient> {
    let mut client = VospaceClient::new(&config.vospace_url);
    match (&config.user, &config.password) {
        (Some(user), Some(password)) => client.set_credentials(user, password),
        _ => bail!(
            "VOSpace credentials required: pass --user/--password or set \
             VOFLOW_USER/VOFLOW_PASSWORD"
        ),
    }
    Ok(client)
}

/// Push a local file into a VOSpace folder
pub async fn store(
    config: &Config,
    local: &Path,
    folder: &str,
    file: Option<String>,
) -> Result<()> {
    let remote_name = match file {
        Some(name) => name,
        None => local
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("local path has no file name; pass --file")?,
    };

    let client = vospace_client(config)?;
    client
        .store_file(
            folder,
            &remote_name,
            local,
            None,
            &config.poll,
            &CancellationToken::new(),
        )
        .await
        .with_context(|| format!("storing {}", local.display()))?;

    println!(
        "{}",
        format!("Stored {} as {folder}/{remote_name}", local.display()).green()
    );
    Ok(())
}

/// Pull a VOSpace file to local disk
pub async fn fetch(
    config: &Config,
    folder: &str,
    file: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let target = output.unwrap_or_else(|| PathBuf::from(file));

    let client = vospace_client(config)?;
    client
        .retrieve_to_file(
            folder,
            file,
            &target,
            None,
            &config.poll,
            &CancellationToken::new(),
        )
        .await
        .with_context(|| format!("fetching {folder}/{file}"))?;

    println!(
        "{}",
        format!("Fetched {folder}/{file} to {}", target.display()).green()
    );
    Ok(())
}
