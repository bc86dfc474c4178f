//! Delete record command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pbase_http::Client;

use crate::commands::path_segment;
use crate::output;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Collection name
    pub collection: String,

    /// Record id
    pub id: String,
}

pub async fn run(args: DeleteArgs, client: &Client) -> Result<()> {
    client
        .delete(&path_segment(&args.collection), &path_segment(&args.id))
        .await
        .context("Failed to delete record")?;

    output::success(&format!("Deleted record: {}", args.id));

    Ok(())
}
