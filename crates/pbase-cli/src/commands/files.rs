//! File commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use pbase_http::{Client, FileUrlOptions};

#[derive(Args, Debug)]
pub struct FilesCommand {
    #[command(subcommand)]
    pub command: FilesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum FilesSubcommand {
    /// Request a protected file token
    Token,

    /// Print the URL of a record's file
    Url(UrlArgs),
}

#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Collection name or id
    pub collection: String,

    /// Record id
    pub record: String,

    /// File name as stored on the record
    pub filename: String,

    /// Thumbnail size, e.g. `100x100`
    #[arg(long)]
    pub thumb: Option<String>,

    /// Append a freshly requested file token
    #[arg(long)]
    pub protected: bool,

    /// Ask the server to send the file as an attachment
    #[arg(long)]
    pub download: bool,
}

pub async fn handle(cmd: FilesCommand, client: &Client) -> Result<()> {
    let files = client.files();

    match cmd.command {
        FilesSubcommand::Token => {
            let token = files.token().await.context("Failed to get file token")?;
            println!("{}", token);
        }
        FilesSubcommand::Url(args) => {
            let mut options = FileUrlOptions::new().with_download(args.download);
            if let Some(thumb) = args.thumb {
                options = options.with_thumb(thumb);
            }
            if args.protected {
                let token = files.token().await.context("Failed to get file token")?;
                options = options.with_token(token);
            }

            let url = files.url(&args.collection, &args.record, &args.filename, &options)?;
            println!("{}", url);
        }
    }

    Ok(())
}
