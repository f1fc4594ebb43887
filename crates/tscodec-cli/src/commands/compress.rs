//! Text-to-buffer compression command.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tscodec::{ColumnCompressor, ColumnValues, CompressionStats};

use crate::output::{self, Format};
use crate::{OutputFormat, ValueKind};

#[derive(Serialize)]
struct CompressOutput {
    output: String,
    #[serde(flatten)]
    stats: CompressionStats,
    compress_rate: f64,
}

/// Parses one value per line, skipping blank lines.
pub(crate) fn parse_column(text: &str, kind: ValueKind) -> Result<ColumnValues> {
    let lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let column = match kind {
        ValueKind::Int64 => {
            let mut values = Vec::new();
            for (line_no, line) in lines {
                let value = line
                    .parse::<i64>()
                    .with_context(|| format!("line {line_no}: invalid int64 {line:?}"))?;
                values.push(value);
            }
            ColumnValues::Int64(values)
        }
        ValueKind::Float64 => {
            let mut values = Vec::new();
            for (line_no, line) in lines {
                let value = line
                    .parse::<f64>()
                    .with_context(|| format!("line {line_no}: invalid float64 {line:?}"))?;
                values.push(value);
            }
            ColumnValues::Float64(values)
        }
    };

    if u32::try_from(column.len()).is_err() {
        bail!("column has {} values, the format holds at most {}", column.len(), u32::MAX);
    }
    Ok(column)
}

/// Run the compress command.
pub fn run(
    input: &Path,
    output_path: &Path,
    kind: ValueKind,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let column = parse_column(&text, kind)?;
    tracing::info!(count = column.len(), kind = column.column_type().name(), "compressing column");

    let data = ColumnCompressor::compress(&column);
    std::fs::write(output_path, &data)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    let stats = CompressionStats::from_buffer(&data)?;
    let summary = CompressOutput {
        output: output_path.display().to_string(),
        stats,
        compress_rate: stats.compress_rate(),
    };

    match Format::from(format) {
        Format::Json => output::print_json(&summary, quiet)?,
        Format::Table => {
            output::success(
                &format!("Wrote {} values to {}", stats.count, summary.output),
                quiet,
            );
            let items = vec![
                ("Encoding", stats.encoding.to_string()),
                ("Compressed", output::format_bytes(stats.compressed_bytes)),
                ("Rate", format!("{:.4}", summary.compress_rate)),
            ];
            output::print_key_value_table(&items, quiet);
        }
    }

    Ok(())
}
