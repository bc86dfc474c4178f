//! pbase-http - reqwest-backed client for a PocketBase-style record service.
//!
//! [`Client`] pairs one [`Authenticator`] with one [`HttpExecutor`]. Record
//! CRUD and listing live on the client itself; collection metadata, backups
//! and files are reached through [`Client::collections`],
//! [`Client::backups`] and [`Client::files`].

mod auth;
mod backups;
mod client;
mod collections;
mod config;
mod endpoints;
mod executor;
mod files;
mod request;

pub use auth::Authenticator;
pub use backups::Backups;
pub use client::{Client, ClientBuilder};
pub use collections::Collections;
pub use config::{AuthConfig, ClientConfig, RetryConfig};
pub use executor::HttpExecutor;
pub use files::{FileUrlOptions, Files};
pub use request::RequestSpec;
