//! Output formatting for CLI commands.

use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::Serialize;

/// Output format selection.
#[derive(Clone, Copy)]
pub enum Format {
    Table,
    Json,
}

impl From<crate::OutputFormat> for Format {
    fn from(f: crate::OutputFormat) -> Self {
        match f {
            crate::OutputFormat::Table => Format::Table,
            crate::OutputFormat::Json => Format::Json,
        }
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(data: &T, quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("{}", serde_json::to_string_pretty(data)?);
    }
    Ok(())
}

/// Create a styled table with consistent formatting.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    table
}

/// Add a header row to a table.
pub fn add_header(table: &mut Table, headers: &[&str]) {
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
}

/// Print a key-value table (for inspect and compress summaries).
pub fn print_key_value_table(items: &[(&str, String)], quiet: bool) {
    if quiet {
        return;
    }

    let mut table = create_table();
    add_header(&mut table, &["Property", "Value"]);
    for (key, value) in items {
        table.add_row(vec![Cell::new(key).fg(Color::Green), Cell::new(value)]);
    }
    println!("{table}");
}

/// Print a success message.
pub fn success(msg: &str, quiet: bool) {
    if !quiet {
        println!("✓ {msg}");
    }
}

/// Format bytes as human-readable string.
pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}
