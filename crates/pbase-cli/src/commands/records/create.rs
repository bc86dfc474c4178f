//! Create record command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pbase_http::Client;

use crate::commands::{path_segment, read_json_input};
use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Collection name
    pub collection: String,

    /// Inline JSON object with the record fields
    #[arg(long)]
    pub data: Option<String>,

    /// JSON file with the record fields (use - for stdin)
    #[arg(long)]
    pub json: Option<String>,

    /// Print the full created record instead of its id
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: CreateArgs, client: &Client) -> Result<()> {
    let body = read_json_input(args.data.as_deref(), args.json.as_deref())?;

    let created = client
        .create(&path_segment(&args.collection), &body)
        .await
        .context("Failed to create record")?;

    if args.pretty {
        output::json(&created.record, true)?;
    } else {
        println!("{}", created.id);
    }
    output::success(&format!("Created record: {}", created.id));

    Ok(())
}
