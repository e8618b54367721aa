use hifitime::{Epoch, TimeScale};
use std::str::FromStr;

use crate::errors::OffsetError;

/// Parse an MPC fractional date field (`YYYY MM DD.dddddd`, UTC) into an
/// [`Epoch`].
///
/// The returned epoch carries the full time-scale machinery, so callers can
/// read it as a UTC Julian date (for era checks) or as a TT Julian date
/// (what the ephemeris service expects) from the same parse.
///
/// Argument
/// --------
/// * `date_str`: the date field with surrounding blanks trimmed, e.g.
///   `"2020 12 25.695728"`
///
/// Return
/// ------
/// * The parsed [`Epoch`], or [`OffsetError::InvalidDate`] when the field
///   does not hold a calendar date.
pub fn frac_date_to_epoch(date_str: &str) -> Result<Epoch, OffsetError> {
    let parts: Vec<&str> = date_str.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(OffsetError::InvalidDate(format!(
            "expected YYYY MM DD.dddddd, got {date_str:?}"
        )));
    }

    let year = i32::from_str(parts[0])
        .map_err(|_| OffsetError::InvalidDate(date_str.to_string()))?;
    let month = u8::from_str(parts[1])
        .map_err(|_| OffsetError::InvalidDate(date_str.to_string()))?;
    let day_fraction = f64::from_str(parts[2])
        .map_err(|_| OffsetError::InvalidDate(date_str.to_string()))?;

    // Separation of day and fraction day
    let day = day_fraction.trunc() as u8;
    let fraction = day_fraction - day as f64;

    let hour = (fraction * 24.0).trunc() as u8;
    let minute = ((fraction * 24.0 - hour as f64) * 60.0).trunc() as u8;
    let second = (((fraction * 24.0 - hour as f64) * 60.0 - minute as f64) * 60.0) as u8;
    let nano = ((((fraction * 24.0 - hour as f64) * 60.0 - minute as f64) * 60.0 - second as f64)
        * 1e9) as u32;

    Epoch::maybe_from_gregorian(year, month, day, hour, minute, second, nano, TimeScale::UTC)
        .map_err(|e| OffsetError::InvalidDate(format!("{date_str}: {e}")))
}
