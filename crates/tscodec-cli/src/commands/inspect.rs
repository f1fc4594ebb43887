//! Buffer inspection command.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tscodec::{ColumnCompressor, ColumnType, CompressionStats};

use crate::OutputFormat;
use crate::output::{self, Format};

/// Inspection summary of one buffer.
#[derive(Serialize)]
struct InspectOutput {
    #[serde(flatten)]
    stats: CompressionStats,
    value_type: ColumnType,
    compression_ratio: f64,
}

/// Run the inspect command.
pub fn run(path: &Path, format: OutputFormat, quiet: bool) -> Result<()> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let stats = CompressionStats::from_buffer(&data)
        .with_context(|| format!("{} is not a codec buffer", path.display()))?;

    // Decode fully so a damaged body is reported, not just the header
    let values = ColumnCompressor::decompress(&data)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    tracing::debug!(count = values.len(), encoding = %stats.encoding, "decoded buffer");

    let output = InspectOutput {
        stats,
        value_type: values.column_type(),
        compression_ratio: stats.compression_ratio(),
    };

    match Format::from(format) {
        Format::Json => output::print_json(&output, quiet)?,
        Format::Table => {
            let items = vec![
                ("Encoding", output.stats.encoding.to_string()),
                ("Value Type", output.value_type.name().to_string()),
                ("Values", output.stats.count.to_string()),
                ("Compressed", output::format_bytes(output.stats.compressed_bytes)),
                ("Uncompressed", output::format_bytes(output.stats.uncompressed_bytes)),
                ("Ratio", format!("{:.2}x", output.compression_ratio)),
            ];
            output::print_key_value_table(&items, quiet);
        }
    }

    Ok(())
}
