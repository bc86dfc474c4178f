//! List records command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pbase_http::Client;

use super::QueryArgs;
use crate::commands::path_segment;
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Collection name
    pub collection: String,

    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<i64>,

    /// Records per page
    #[arg(long)]
    pub per_page: Option<i64>,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ListArgs, client: &Client) -> Result<()> {
    let mut params = args.query.to_params();
    if let Some(page) = args.page {
        params = params.with_page(page);
    }
    if let Some(size) = args.per_page {
        params = params.with_size(size);
    }

    let result = client
        .list(&path_segment(&args.collection), &params)
        .await
        .context("Failed to list records")?;

    if result.items.is_empty() {
        output::note("No records found.");
    }
    output::json_lines(&result.items, args.pretty)?;

    output::note(&format!(
        "Page {} of {} ({} records total)",
        result.page, result.total_pages, result.total_items
    ));

    Ok(())
}
