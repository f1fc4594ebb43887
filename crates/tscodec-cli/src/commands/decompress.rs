//! Buffer-to-text decompression command.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tscodec::{ColumnCompressor, ColumnValues};

use crate::output;

/// Renders a column as one value per line.
pub(crate) fn render_column(values: &ColumnValues) -> String {
    let mut text = String::new();
    match values {
        ColumnValues::Int64(v) => {
            for value in v {
                let _ = writeln!(text, "{value}");
            }
        }
        ColumnValues::Float64(v) => {
            for value in v {
                let _ = writeln!(text, "{value}");
            }
        }
    }
    text
}

/// Run the decompress command.
pub fn run(input: &Path, output_path: Option<&Path>, quiet: bool) -> Result<()> {
    let data =
        std::fs::read(input).with_context(|| format!("failed to read {}", input.display()))?;
    let values = ColumnCompressor::decompress(&data)
        .with_context(|| format!("failed to decode {}", input.display()))?;
    let text = render_column(&values);

    match output_path {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            output::success(
                &format!("Wrote {} values to {}", values.len(), path.display()),
                quiet,
            );
        }
        None => print!("{text}"),
    }

    Ok(())
}
