//! Full list command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pbase_http::Client;

use super::QueryArgs;
use crate::commands::path_segment;
use crate::output;

#[derive(Args, Debug)]
pub struct FullListArgs {
    /// Collection name
    pub collection: String,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: FullListArgs, client: &Client) -> Result<()> {
    let params = args.query.to_params();

    match client.full_list(&path_segment(&args.collection), &params).await {
        Ok(all) => {
            output::json_lines(&all.items, args.pretty)?;
            output::note(&format!("{} records", all.items.len()));
            Ok(())
        }
        Err(failed) => {
            // Print what arrived before the failing page, then fail.
            let (partial, error) = failed.into_parts();
            output::json_lines(&partial.items, args.pretty)?;
            output::note(&format!(
                "Stopped after {} of {} records",
                partial.items.len(),
                partial.total_items
            ));
            Err(error).context("Failed to list all records")
        }
    }
}
