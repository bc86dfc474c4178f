//! Backup commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use pbase_http::Client;

use crate::commands::path_segment;
use crate::output;

#[derive(Args, Debug)]
pub struct BackupsCommand {
    #[command(subcommand)]
    pub command: BackupsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BackupsSubcommand {
    /// List stored backups
    List,

    /// Start a new backup
    Create {
        /// Archive name, e.g. `nightly.zip` (server picks one if omitted)
        name: Option<String>,
    },

    /// Delete a backup
    Delete {
        /// Archive key
        key: String,
    },

    /// Restore from a backup; the server restarts afterwards
    Restore {
        /// Archive key
        key: String,
    },

    /// Print a download URL for a backup
    Url {
        /// Archive key
        key: String,
    },
}

pub async fn handle(cmd: BackupsCommand, client: &Client) -> Result<()> {
    let backups = client.backups();

    match cmd.command {
        BackupsSubcommand::List => {
            let listed = backups.list().await.context("Failed to list backups")?;
            if listed.is_empty() {
                output::note("No backups found.");
            }
            for backup in &listed {
                println!(
                    "{}  {:>10}  {}",
                    backup.key,
                    backup.size,
                    backup.modified.dimmed()
                );
            }
        }
        BackupsSubcommand::Create { name } => {
            backups
                .create(name.as_deref())
                .await
                .context("Failed to create backup")?;
            output::success("Backup started");
        }
        BackupsSubcommand::Delete { key } => {
            backups
                .delete(&path_segment(&key))
                .await
                .context("Failed to delete backup")?;
            output::success(&format!("Deleted backup: {}", key));
        }
        BackupsSubcommand::Restore { key } => {
            backups
                .restore(&path_segment(&key))
                .await
                .context("Failed to restore backup")?;
            output::success(&format!("Restore started from: {}", key));
        }
        BackupsSubcommand::Url { key } => {
            let token = client
                .files()
                .token()
                .await
                .context("Failed to get file token")?;
            let url = backups.download_url(&key, &token)?;
            println!("{}", url);
        }
    }

    Ok(())
}
