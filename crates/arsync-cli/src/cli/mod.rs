//! CLI for arsync.

mod commands;
mod progress;

use anyhow::Result;
use arsync_core::config::{self, ArsyncConfig};
use arsync_core::store::MetadataDb;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use commands::{run_completions, run_crawl, run_man, run_pass, run_status, run_sync};

/// Top-level CLI for arsync.
#[derive(Debug, Parser)]
#[command(name = "arsync")]
#[command(about = "arsync: keep workstation folders in step with a remote file archive", long_about = None)]
pub struct Cli {
    /// Load configuration from this file instead of ~/.config/arsync/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Crawl the archive listing, then sync every user.
    Run {
        /// User list file (one user directory per line). Defaults to `users_file` from config.
        #[arg(long, value_name = "FILE")]
        users: Option<PathBuf>,
        /// Sync against the existing index without crawling first.
        #[arg(long)]
        skip_crawl: bool,
    },

    /// Build or refresh the archive index only.
    Crawl,

    /// Sync users against the existing index only.
    Sync {
        /// User list file (one user directory per line). Defaults to `users_file` from config.
        #[arg(long, value_name = "FILE")]
        users: Option<PathBuf>,
    },

    /// Show the indexed archive files.
    Status {
        /// Print records as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print a shell completion script.
    Completions {
        shell: Shell,
    },

    /// Print the man page (roff).
    Man,
}

fn load_config(path: Option<&PathBuf>) -> Result<ArsyncConfig> {
    match path {
        Some(p) => config::load_from_path(p),
        None => config::load_or_init(),
    }
}

async fn open_db(cfg: &ArsyncConfig) -> Result<MetadataDb> {
    let db = match &cfg.database {
        Some(path) => MetadataDb::open_at(path).await?,
        None => MetadataDb::open_default().await?,
    };
    Ok(db)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Commands that need neither config nor database.
        match &cli.command {
            CliCommand::Completions { shell } => return run_completions(*shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let cfg = load_config(cli.config.as_ref())?;
        tracing::debug!("loaded config: {:?}", cfg);
        let db = open_db(&cfg).await?;

        let result = match cli.command {
            CliCommand::Run { users, skip_crawl } => {
                run_pass(&db, &cfg, users.as_deref(), skip_crawl).await
            }
            CliCommand::Crawl => run_crawl(&db, &cfg).await.map(|_| ()),
            CliCommand::Sync { users } => run_sync(&db, &cfg, users.as_deref()).await.map(|_| ()),
            CliCommand::Status { json } => run_status(&db, &cfg, json).await,
            CliCommand::Completions { .. } | CliCommand::Man => Ok(()),
        };
        db.close().await;
        result
    }
}

#[cfg(test)]
mod tests;
