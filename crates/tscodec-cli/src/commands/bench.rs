//! Randomized round-trip benchmark grid.
//!
//! Each case draws `count` samples as `base + uniform(0..range)` and checks
//! that the codec reproduces them exactly before reporting size and timing.

use std::time::{Duration, Instant};

use anyhow::{Result, ensure};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tscodec::{
    CompressionStats, EncodingType, compress_float64, compress_int64, decompress_float64,
    decompress_int64,
};

use crate::OutputFormat;
use crate::output::{self, Format};

const INT_COUNTS: [usize; 4] = [1_000, 10_000, 100_000, 100_000];
const INT_BASES: [i64; 5] = [1, 100, 10_000, 1_000_000, 10_000_000];
const FLOAT_COUNTS: [usize; 4] = [100, 10_000, 100_000, 5_000_000];
const FLOAT_BASES: [f64; 5] = [1.12213, 100.242, 10000.23354, 1000000.098343, 10000000.23254];
const RANGES: [i64; 5] = [1, 10, 1_000, 100_000, 1_000_000];

/// Result of one benchmark case.
#[derive(Debug, Serialize)]
struct CaseResult {
    case: usize,
    kind: &'static str,
    count: usize,
    base: String,
    range: i64,
    encoding: EncodingType,
    compress_rate: f64,
    compress_us: u128,
    decompress_us: u128,
}

/// Run the bench command.
pub fn run(max_count: usize, seed: u64, format: OutputFormat, quiet: bool) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut results = Vec::new();

    for count in INT_COUNTS.into_iter().filter(|&c| c <= max_count) {
        for base_limit in INT_BASES {
            for range in RANGES {
                let case = results.len() + 1;
                results.push(int_case(&mut rng, case, count, base_limit, range)?);
            }
        }
    }

    for count in FLOAT_COUNTS.into_iter().filter(|&c| c <= max_count) {
        for base in FLOAT_BASES {
            for range in RANGES {
                let case = results.len() + 1;
                results.push(float_case(&mut rng, case, count, base, range)?);
            }
        }
    }

    tracing::info!(cases = results.len(), "benchmark grid finished");

    match Format::from(format) {
        Format::Json => output::print_json(&results, quiet)?,
        Format::Table => print_table(&results, quiet),
    }
    Ok(())
}

fn int_case(
    rng: &mut StdRng,
    case: usize,
    count: usize,
    base_limit: i64,
    range: i64,
) -> Result<CaseResult> {
    let base = rng.gen_range(0..base_limit);
    let values: Vec<i64> = (0..count).map(|_| base + rng.gen_range(0..range)).collect();

    let start = Instant::now();
    let compressed = compress_int64(&values);
    let compress_time = start.elapsed();

    let start = Instant::now();
    let decoded = decompress_int64(&compressed)?;
    let decompress_time = start.elapsed();

    ensure!(decoded == values, "case {case}: int64 round trip mismatch");
    finish_case(case, "int64", base.to_string(), range, &compressed, compress_time, decompress_time)
}

fn float_case(
    rng: &mut StdRng,
    case: usize,
    count: usize,
    base: f64,
    range: i64,
) -> Result<CaseResult> {
    let values: Vec<f64> = (0..count)
        .map(|_| base + rng.gen_range(0..range) as f64)
        .collect();

    let start = Instant::now();
    let compressed = compress_float64(&values);
    let compress_time = start.elapsed();

    let start = Instant::now();
    let decoded = decompress_float64(&compressed)?;
    let decompress_time = start.elapsed();

    let exact = decoded.len() == values.len()
        && decoded
            .iter()
            .zip(&values)
            .all(|(d, v)| d.to_bits() == v.to_bits());
    ensure!(exact, "case {case}: float64 round trip mismatch");
    finish_case(case, "float64", base.to_string(), range, &compressed, compress_time, decompress_time)
}

fn finish_case(
    case: usize,
    kind: &'static str,
    base: String,
    range: i64,
    compressed: &[u8],
    compress_time: Duration,
    decompress_time: Duration,
) -> Result<CaseResult> {
    let stats = CompressionStats::from_buffer(compressed)?;
    tracing::debug!(
        case,
        kind,
        count = stats.count,
        encoding = %stats.encoding,
        rate = stats.compress_rate(),
        "case done"
    );
    Ok(CaseResult {
        case,
        kind,
        count: stats.count,
        base,
        range,
        encoding: stats.encoding,
        compress_rate: stats.compress_rate(),
        compress_us: compress_time.as_micros(),
        decompress_us: decompress_time.as_micros(),
    })
}

fn print_table(results: &[CaseResult], quiet: bool) {
    if quiet {
        return;
    }

    let mut table = output::create_table();
    output::add_header(
        &mut table,
        &[
            "Case",
            "Type",
            "Count",
            "Base",
            "Range",
            "Encoding",
            "Rate",
            "Compress (µs)",
            "Decompress (µs)",
        ],
    );
    for r in results {
        table.add_row(vec![
            r.case.to_string(),
            r.kind.to_string(),
            r.count.to_string(),
            r.base.clone(),
            r.range.to_string(),
            r.encoding.to_string(),
            format!("{:.4}", r.compress_rate),
            r.compress_us.to_string(),
            r.decompress_us.to_string(),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_grid_round_trips() {
        let mut rng = StdRng::seed_from_u64(5);
        for range in RANGES {
            let result = int_case(&mut rng, 1, 500, 10_000, range).unwrap();
            assert_eq!(result.count, 500);
            assert_eq!(result.encoding, EncodingType::PackedInt64);
            assert!(result.compress_rate < 1.0);

            let result = float_case(&mut rng, 2, 101, 100.242, range).unwrap();
            assert_eq!(result.count, 101);
        }
    }

    #[test]
    fn test_run_respects_max_count() {
        run(100, 1, OutputFormat::Json, true).unwrap();
    }
}
