//! Record subcommand implementations.

mod create;
mod delete;
mod full_list;
mod get;
mod list;
mod update;

use anyhow::Result;
use clap::{Args, Subcommand};

use pbase_core::ListParams;
use pbase_http::Client;

#[derive(Args, Debug)]
pub struct RecordsCommand {
    #[command(subcommand)]
    pub command: RecordsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RecordsSubcommand {
    /// Create a record
    Create(create::CreateArgs),

    /// Fetch a single record
    Get(get::GetArgs),

    /// Patch a record
    Update(update::UpdateArgs),

    /// Delete a record
    Delete(delete::DeleteArgs),

    /// List one page of records
    List(list::ListArgs),

    /// Fetch every record matching a filter
    FullList(full_list::FullListArgs),
}

pub async fn handle(cmd: RecordsCommand, client: &Client) -> Result<()> {
    match cmd.command {
        RecordsSubcommand::Create(args) => create::run(args, client).await,
        RecordsSubcommand::Get(args) => get::run(args, client).await,
        RecordsSubcommand::Update(args) => update::run(args, client).await,
        RecordsSubcommand::Delete(args) => delete::run(args, client).await,
        RecordsSubcommand::List(args) => list::run(args, client).await,
        RecordsSubcommand::FullList(args) => full_list::run(args, client).await,
    }
}

/// Query options shared by the listing commands.
#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// Filter expression, e.g. `status = "done"`
    #[arg(long)]
    pub filter: Option<String>,

    /// Sort fields, e.g. `-created,title`
    #[arg(long)]
    pub sort: Option<String>,

    /// Relations to expand
    #[arg(long)]
    pub expand: Option<String>,

    /// Fields to return
    #[arg(long)]
    pub fields: Option<String>,
}

impl QueryArgs {
    pub fn to_params(&self) -> ListParams {
        let mut params = ListParams::new();
        if let Some(filter) = &self.filter {
            params = params.with_filter(filter);
        }
        if let Some(sort) = &self.sort {
            params = params.with_sort(sort);
        }
        if let Some(expand) = &self.expand {
            params = params.with_expand(expand);
        }
        if let Some(fields) = &self.fields {
            params = params.with_fields(fields);
        }
        params
    }
}
