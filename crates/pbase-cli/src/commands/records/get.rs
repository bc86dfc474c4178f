//! Get record command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pbase_http::Client;

use crate::commands::path_segment;
use crate::output;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Collection name
    pub collection: String,

    /// Record id
    pub id: String,
}

pub async fn run(args: GetArgs, client: &Client) -> Result<()> {
    let record = client
        .read(&path_segment(&args.collection), &path_segment(&args.id))
        .await
        .context("Failed to get record")?;

    output::json(&record, true)?;

    Ok(())
}
