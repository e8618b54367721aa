//! Augment 80-column MPC astrometry with spacecraft offset records, using
//! geocentric state vectors fetched in batches from JPL Horizons.

pub mod constants;
mod correlate;
pub mod encode;
pub mod errors;
pub mod horizons;
pub mod pipeline;
pub mod rewrite;
pub mod scan;
pub mod spacecraft;
pub mod time;

pub use errors::OffsetError;
pub use horizons::{EphemerisSource, HorizonsClient};
pub use pipeline::{process_file, run, RunStats};
