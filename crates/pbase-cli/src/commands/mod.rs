//! Subcommand implementations.

pub mod backups;
pub mod collections;
pub mod files;
pub mod records;
pub mod whoami;

use std::borrow::Cow;
use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use serde_json::Value;

/// Percent-encode a command-line value for use as one URL path segment.
pub(crate) fn path_segment(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}

/// Read a JSON object from inline text, a file, or stdin (`-`).
pub(crate) fn read_json_input(data: Option<&str>, file: Option<&str>) -> Result<Value> {
    let value: Value = match (data, file) {
        (Some(_), Some(_)) => bail!("Use either --data or --json, not both"),
        (Some(inline), None) => serde_json::from_str(inline).context("Invalid JSON in --data")?,
        (None, Some("-")) => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            serde_json::from_str(&buf).context("Invalid JSON from stdin")?
        }
        (None, Some(path)) => {
            let content = std::fs::read_to_string(path).context("Failed to read JSON file")?;
            serde_json::from_str(&content).context("Invalid JSON in file")?
        }
        (None, None) => bail!("Record data is required: pass --data or --json"),
    };

    if !value.is_object() {
        bail!("Record data must be a JSON object");
    }
    Ok(value)
}
