//! CLI argument definitions.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use pbase_core::BaseUrl;
use pbase_http::{AuthConfig, Client, ClientConfig, RetryConfig};

use crate::commands::backups::BackupsCommand;
use crate::commands::collections::CollectionsCommand;
use crate::commands::files::FilesCommand;
use crate::commands::records::RecordsCommand;
use crate::commands::whoami::WhoamiArgs;

/// Command-line client for PocketBase-style record services.
#[derive(Parser, Debug)]
#[command(name = "pbase")]
#[command(author, version = env!("PBASE_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record CRUD and listing
    Records(RecordsCommand),

    /// Collection schema metadata
    Collections(CollectionsCommand),

    /// Backup archives (superuser only)
    Backups(BackupsCommand),

    /// File URLs and tokens
    Files(FilesCommand),

    /// Authenticate and show the identity in use
    Whoami(WhoamiArgs),
}

/// Where to connect and as whom.
///
/// At most one identity may be given. Without one, requests are sent
/// unauthenticated.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Base URL of the service
    #[arg(long, env = "PBASE_URL", default_value = "http://127.0.0.1:8090", global = true)]
    pub url: String,

    /// Log request and response bodies (needs -vv to be visible)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Superuser email
    #[arg(long, env = "PBASE_ADMIN_EMAIL", global = true)]
    pub admin_email: Option<String>,

    /// Superuser password
    #[arg(long, env = "PBASE_ADMIN_PASSWORD", hide_env_values = true, global = true)]
    pub admin_password: Option<String>,

    /// User email
    #[arg(long, env = "PBASE_USER_EMAIL", global = true)]
    pub user_email: Option<String>,

    /// User password
    #[arg(long, env = "PBASE_USER_PASSWORD", hide_env_values = true, global = true)]
    pub user_password: Option<String>,

    /// Auth collection for user login (defaults to `users`)
    #[arg(long, env = "PBASE_AUTH_COLLECTION", global = true)]
    pub auth_collection: Option<String>,

    /// Existing superuser token, refreshed before first use
    #[arg(long, env = "PBASE_ADMIN_TOKEN", hide_env_values = true, global = true)]
    pub admin_token: Option<String>,

    /// Existing user token, refreshed before first use
    #[arg(long, env = "PBASE_USER_TOKEN", hide_env_values = true, global = true)]
    pub user_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Transport retries for connection failures and 429/502/503/504
    #[arg(long, default_value_t = 3, global = true)]
    pub retries: u32,
}

impl ConnectionArgs {
    /// Pick the identity from the given flags.
    pub fn auth(&self) -> Result<AuthConfig> {
        let mut chosen = Vec::new();

        if let Some(email) = &self.admin_email {
            let password = self
                .admin_password
                .clone()
                .context("--admin-email needs --admin-password")?;
            chosen.push(AuthConfig::admin_password(email.clone(), password));
        }
        if let Some(email) = &self.user_email {
            let password = self
                .user_password
                .clone()
                .context("--user-email needs --user-password")?;
            chosen.push(match &self.auth_collection {
                Some(collection) => {
                    AuthConfig::user_password_in(email.clone(), password, collection.clone())
                }
                None => AuthConfig::user_password(email.clone(), password),
            });
        }
        if let Some(token) = &self.admin_token {
            chosen.push(AuthConfig::AdminToken(token.clone()));
        }
        if let Some(token) = &self.user_token {
            chosen.push(AuthConfig::UserToken(token.clone()));
        }

        if chosen.len() > 1 {
            bail!("Only one of admin email, user email, admin token or user token may be set");
        }
        Ok(chosen.pop().unwrap_or_default())
    }

    pub fn config(&self) -> Result<ClientConfig> {
        let base_url = BaseUrl::new(&self.url).context("Invalid --url")?;
        let retry = if self.retries == 0 {
            RetryConfig::no_retry()
        } else {
            RetryConfig::default().with_max_retries(self.retries)
        };

        Ok(ClientConfig::new(base_url)
            .with_debug(self.debug)
            .with_auth(self.auth()?)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_retry(retry))
    }

    pub fn client(&self) -> Result<Client> {
        let config = self.config()?;
        debug!(url = %config.base_url, auth = ?config.auth, "client configured");
        Client::new(config).context("Failed to create client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["pbase"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn no_identity_means_unauthenticated() {
        let cli = parse(&["--url", "http://localhost:8090", "whoami"]);
        assert_eq!(cli.connection.auth().unwrap(), AuthConfig::None);
    }

    #[test]
    fn user_login_with_collection() {
        let cli = parse(&[
            "whoami",
            "--user-email",
            "m@x.io",
            "--user-password",
            "pw",
            "--auth-collection",
            "members",
        ]);
        assert_eq!(
            cli.connection.auth().unwrap(),
            AuthConfig::user_password_in("m@x.io", "pw", "members")
        );
    }

    #[test]
    fn email_without_password_is_rejected() {
        let cli = parse(&["--admin-email", "a@x.io", "whoami"]);
        assert!(cli.connection.auth().is_err());
    }

    #[test]
    fn two_identities_are_rejected() {
        let cli = parse(&["--admin-token", "a", "--user-token", "b", "whoami"]);
        assert!(cli.connection.auth().is_err());
    }

    #[test]
    fn zero_retries_disables_retry() {
        let cli = parse(&["--retries", "0", "whoami"]);
        assert_eq!(cli.connection.config().unwrap().retry.max_retries, 0);
    }
}
