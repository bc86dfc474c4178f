//! Update record command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pbase_http::Client;

use crate::commands::{path_segment, read_json_input};
use crate::output;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Collection name
    pub collection: String,

    /// Record id
    pub id: String,

    /// Inline JSON object with the fields to change
    #[arg(long)]
    pub data: Option<String>,

    /// JSON file with the fields to change (use - for stdin)
    #[arg(long)]
    pub json: Option<String>,
}

pub async fn run(args: UpdateArgs, client: &Client) -> Result<()> {
    let body = read_json_input(args.data.as_deref(), args.json.as_deref())?;

    client
        .update(
            &path_segment(&args.collection),
            &path_segment(&args.id),
            &body,
        )
        .await
        .context("Failed to update record")?;

    output::success(&format!("Updated record: {}", args.id));

    Ok(())
}
