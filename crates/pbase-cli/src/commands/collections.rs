//! Collection metadata commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use pbase_core::ListParams;
use pbase_http::Client;

use crate::commands::path_segment;
use crate::output;

#[derive(Args, Debug)]
pub struct CollectionsCommand {
    #[command(subcommand)]
    pub command: CollectionsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CollectionsSubcommand {
    /// List collection definitions
    List(ListArgs),

    /// Show one collection definition
    View(ViewArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<i64>,

    /// Collections per page
    #[arg(long)]
    pub per_page: Option<i64>,

    /// Filter expression
    #[arg(long)]
    pub filter: Option<String>,

    /// Print full definitions as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Collection name or id
    pub collection: String,
}

pub async fn handle(cmd: CollectionsCommand, client: &Client) -> Result<()> {
    match cmd.command {
        CollectionsSubcommand::List(args) => list(args, client).await,
        CollectionsSubcommand::View(args) => view(args, client).await,
    }
}

async fn list(args: ListArgs, client: &Client) -> Result<()> {
    let mut params = ListParams::new();
    if let Some(page) = args.page {
        params = params.with_page(page);
    }
    if let Some(size) = args.per_page {
        params = params.with_size(size);
    }
    if let Some(filter) = args.filter {
        params = params.with_filter(filter);
    }

    let result = client
        .collections()
        .list(&params)
        .await
        .context("Failed to list collections")?;

    if args.json {
        return output::json_lines(&result.items, false);
    }

    for collection in &result.items {
        output::field(&collection.name, &collection.kind);
    }
    output::note(&format!("{} collections total", result.total_items));

    Ok(())
}

async fn view(args: ViewArgs, client: &Client) -> Result<()> {
    let collection = client
        .collections()
        .view(&path_segment(&args.collection))
        .await
        .context("Failed to fetch collection")?;

    output::json(&collection, true)?;

    Ok(())
}
