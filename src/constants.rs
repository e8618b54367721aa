//! # Constants and type definitions for sat-offsets
//!
//! This module centralizes the **physical constants**, **format thresholds**, and **common type
//! definitions** used throughout the crate.
//!
//! ## Overview
//!
//! - Astronomical constants (AU ↔ km)
//! - Fixed thresholds of the 80-column offset encoding
//! - Query-size budget of the Horizons batch interface
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

// -------------------------------------------------------------------------------------------------
// Format thresholds
// -------------------------------------------------------------------------------------------------

/// Epochs closer than this many days count as the same observation time.
pub const EPOCH_MATCH_TOLERANCE: f64 = 1e-5;

/// Julian date (UTC) of 1990 April 24, the HST launch. No observation can
/// have been taken from a spacecraft before this date; an earlier epoch on a
/// line carrying the spacecraft marker is a malformed line, not an
/// observation.
pub const SPACECRAFT_ERA_START_JD: JulianDate = 2_448_005.5;

/// Largest |component| an offset record can store in kilometer mode.
/// Any component beyond this switches the whole triple to astronomical
/// units.
pub const MAX_KM_OFFSET: Kilometer = 9_999_999.0;

// -------------------------------------------------------------------------------------------------
// Query budget
// -------------------------------------------------------------------------------------------------

/// The Horizons batch interface starts rejecting URLs much beyond this
/// size, so a batch query must stay within it.
pub const MAX_QUERY_BYTES: usize = 8_000;

/// Bytes held back for the fixed query trailer while epochs are appended.
pub const QUERY_TRAILER_RESERVE: usize = 60;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Julian date (days)
pub type JulianDate = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// MPC code identifying an observing site or spacecraft (3 characters)
pub type MpcCode = String;
