//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod query;
mod vospace;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit an ADQL query and write the result locally
    Query {
        /// ADQL query text
        adql: String,

        /// Write result bytes to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Result format requested from the service
        #[arg(long, default_value = "csv")]
        format: String,

        /// Job name shown by the remote service
        #[arg(long, default_value = "voflow")]
        name: String,
    },
    /// Push a local file into a VOSpace folder
    Store {
        /// Local file to upload
        local: PathBuf,

        /// Target folder under the user's VOSpace root
        folder: String,

        /// Remote file name (defaults to the local file name)
        #[arg(long)]
        file: Option<String>,
    },
    /// Pull a VOSpace file to local disk
    Fetch {
        /// Folder under the user's VOSpace root
        folder: String,

        /// Remote file name
        file: String,

        /// Local path to write (defaults to the remote file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Submit a query and store its result in VOSpace in one go
    Run {
        /// ADQL query text
        adql: String,

        /// Target folder under the user's VOSpace root
        folder: String,

        /// Remote file name for the result
        file: String,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Query {
            adql,
            output,
            format,
            name,
        } => query::run_query(config, &adql, output, &format, &name).await,
        Commands::Store {
            local,
            folder,
            file,
        } => vospace::store(config, &local, &folder, file).await,
        Commands::Fetch {
            folder,
            file,
            output,
        } => vospace::fetch(config, &folder, &file, output).await,
        Commands::Run { adql, folder, file } => {
            query::run_and_store(config, &adql, &folder, &file).await
        }
    }
}
