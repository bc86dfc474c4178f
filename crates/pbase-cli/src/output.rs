//! Output formatting helpers.
//!
//! Data goes to stdout as JSON; status lines go to stderr so output can be
//! piped into `jq` and friends.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a dimmed status line.
pub fn note(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a value as JSON.
pub fn json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

/// Print one JSON value per item.
pub fn json_lines<T: Serialize>(values: &[T], pretty: bool) -> Result<()> {
    values.iter().try_for_each(|value| json(value, pretty))
}
