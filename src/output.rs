//! Operator-facing output: status lines and tables.
//!
//! The tables are the product of a reconnaissance run, so they go to
//! stdout untouched by the logging stack; `tracing` is for internal
//! diagnostics only.

use colored::Colorize;
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cluster::FetchPolicy;
use crate::config::value_to_string;
use crate::metadata::{ConfigEntry, MetadataBroker};

/// Print a success line.
pub fn ok(message: impl AsRef<str>) {
    println!(" {} {}", "(+)".green(), message.as_ref());
}

/// Print a failure line.
pub fn err(message: impl AsRef<str>) {
    println!(" {} {}", "(-)".red(), message.as_ref());
}

#[derive(Tabled)]
struct KeyValueRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Render configuration `(key, value)` pairs in the order given.
pub fn config_table<'a>(entries: impl Iterator<Item = (&'a str, &'a Value)>) -> String {
    render(
        entries
            .map(|(key, value)| KeyValueRow {
                key: key.to_owned(),
                value: value_to_string(value),
            })
            .collect::<Vec<_>>(),
    )
}

#[derive(Tabled)]
struct CommandRow {
    #[tabled(rename = "Command")]
    command: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Render the command surface for `help`.
pub fn help_table(commands: &[(&str, &str)]) -> String {
    render(
        commands
            .iter()
            .map(|(command, description)| CommandRow {
                command: (*command).to_owned(),
                description: (*description).to_owned(),
            })
            .collect::<Vec<_>>(),
    )
}

#[derive(Tabled)]
struct BrokerRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Port")]
    port: i32,
}

/// Render the broker set in the order given.
pub fn broker_table(brokers: &[MetadataBroker]) -> String {
    render(
        brokers
            .iter()
            .map(|broker| BrokerRow {
                id: broker.id,
                host: broker.host.clone(),
                port: broker.port,
            })
            .collect::<Vec<_>>(),
    )
}

#[derive(Tabled)]
struct ConfigEntryRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Read Only")]
    read_only: String,
    #[tabled(rename = "Sensitive")]
    sensitive: String,
}

/// Render broker configuration entries: name and value truncated to the
/// policy widths, `-` for an absent value, and the two flags as presence
/// markers rather than raw booleans.
pub fn config_entry_table(entries: &[ConfigEntry], policy: &FetchPolicy) -> String {
    render(
        entries
            .iter()
            .map(|entry| ConfigEntryRow {
                name: truncate(&entry.name, policy.name_width),
                value: entry
                    .value
                    .as_deref()
                    .map_or_else(|| "-".to_owned(), |value| truncate(value, policy.value_width)),
                source: entry.source.clone(),
                read_only: marker(entry.is_read_only),
                sensitive: marker(entry.is_sensitive),
            })
            .collect::<Vec<_>>(),
    )
}

fn marker(flag: bool) -> String {
    if flag { "Yes".to_owned() } else { String::new() }
}

/// Truncate to at most `max` characters to keep tables scannable.
fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn render<R: Tabled>(rows: Vec<R>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}
