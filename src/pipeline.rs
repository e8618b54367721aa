//! Top-level offset-resolution pipeline.
//!
//! Two passes over the input stream with one blocking batch query at a time
//! in between: scan (collect requests), resolve (query Horizons, correlate,
//! abandon), rewrite (emit the augmented stream). The `COM` banner and
//! trailer lines are part of the output record stream; everything else
//! diagnostic goes through `log`.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::time::Instant;

use camino::Utf8Path;
use hifitime::Epoch;

use crate::correlate::{abandon_unresolved, apply_batch};
use crate::errors::OffsetError;
use crate::horizons::{client::EphemerisSource, query::build_batch, response::parse_vectors};
use crate::rewrite::rewrite_stream;
use crate::scan::{scan_stream, OffsetRequest};
use crate::spacecraft::horizons_id;

/// Aggregate outcome of one run, reported in the trailer line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Requests resolved with a state vector.
    pub positions_set: usize,
    /// Requests abandoned: unknown code, failed batch, or unanswered epoch.
    pub positions_failed: usize,
}

/// Run the full pipeline over `path`, writing the rewritten stream to
/// `writer`.
///
/// Only a missing or unreadable input file fails the run. Per-observation
/// failures are counted, logged, and reported in the trailer; the run
/// always completes.
pub fn process_file<W: Write>(
    path: &Utf8Path,
    source: &dyn EphemerisSource,
    writer: &mut W,
) -> Result<RunStats, OffsetError> {
    let scan_pass = BufReader::new(File::open(path)?);
    let rewrite_pass = BufReader::new(File::open(path)?);
    run(scan_pass, rewrite_pass, source, writer)
}

/// Reader-level entry point: one reader per pass over the same stream.
pub fn run<R1, R2, W>(
    scan_pass: R1,
    rewrite_pass: R2,
    source: &dyn EphemerisSource,
    writer: &mut W,
) -> Result<RunStats, OffsetError>
where
    R1: BufRead,
    R2: BufRead,
    W: Write,
{
    let started = Instant::now();
    writeln!(
        writer,
        "COM sat-offsets ver {}, run {}",
        env!("CARGO_PKG_VERSION"),
        run_timestamp()
    )?;

    let mut requests = scan_stream(scan_pass)?;
    log::info!("{} spacecraft observations need offsets", requests.len());

    let mut stats = RunStats::default();
    resolve_offsets(&mut requests, source, &mut stats);

    rewrite_stream(rewrite_pass, &requests, writer)?;
    writeln!(
        writer,
        "COM {} positions set by sat-offsets; {} failed in {:.2} seconds",
        stats.positions_set,
        stats.positions_failed,
        started.elapsed().as_secs_f64()
    )?;
    Ok(stats)
}

/// Walk the request list in discovery order, issuing one blocking batch at
/// a time.
///
/// An unknown site code abandons its whole group before any call is made.
/// Transport failures and unusable responses abandon only the in-flight
/// batch; either way the walk continues with the next pending request.
pub fn resolve_offsets(
    requests: &mut [OffsetRequest],
    source: &dyn EphemerisSource,
    stats: &mut RunStats,
) {
    for start in 0..requests.len() {
        if !requests[start].is_pending() {
            continue;
        }
        let site_code = requests[start].site_code.clone();
        let Some(horizons_idx) = horizons_id(&site_code) else {
            log::error!(
                "MPC code '{site_code}' is either not an MPC code or not a spacecraft this \
                 tool knows about; the cross-reference table in src/spacecraft.rs is the \
                 place to add it"
            );
            for request in requests.iter_mut() {
                if request.is_pending() && request.site_code == site_code {
                    request.abandon();
                    stats.positions_failed += 1;
                }
            }
            continue;
        };
        let batch = build_batch(horizons_idx, requests, start);
        log::debug!(
            "querying {} epochs for '{site_code}' (object {horizons_idx})",
            batch.included.len()
        );
        match source.fetch(&batch.url).and_then(|text| parse_vectors(&text)) {
            Ok(vectors) => apply_batch(requests, &batch.included, &vectors, stats),
            Err(err) => log::error!("batch for '{site_code}' failed: {err}"),
        }
        abandon_unresolved(requests, &batch.included, stats);
    }
}

/// Wall-clock timestamp for the banner line.
fn run_timestamp() -> String {
    Epoch::now().map_or_else(|_| "time unavailable".to_string(), |now| now.to_string())
}
