//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use pbase_http::Client;

use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Also print the authenticated record
    #[arg(long)]
    pub record: bool,
}

pub async fn run(args: WhoamiArgs, client: &Client) -> Result<()> {
    client.authorize().await.context("Failed to authenticate")?;

    let auth = client.auth_store();
    output::field("URL", &client.base_url().to_string());
    output::field("Strategy", &auth.strategy().kind().to_string());
    if let Some(endpoint) = auth.strategy().endpoint_path() {
        output::field("Endpoint", &endpoint);
    }

    if args.record
        && let Some(record) = auth.record().await
    {
        output::json(&record, true)?;
    }

    Ok(())
}
