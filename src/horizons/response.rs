//! # Vector-table response parsing
//!
//! Horizons answers a batch query with free-form text. Only the response
//! frames matter: an epoch header line such as
//!
//! ```text
//! 2458843.421181000 = A.D. 2019-Dec-25 22:06:29.8000 TDB
//! ```
//!
//! followed by the position line and the velocity line (three
//! whitespace-separated components each, km and km/s). Everything else
//! (preamble, `$$SOE`/`$$EOE` fences, trailer) is skipped.
//!
//! A frame whose vector lines are missing or unparseable fails the whole
//! batch with [`OffsetError::MalformedEphemeris`]; service output is
//! network text and gets no benefit of the doubt. A line starting with the
//! literal `No ephemeris` marker means the service has nothing for this
//! object over the requested span, which also fails the batch.

use std::sync::LazyLock;

use nalgebra::Vector3;
use regex::Regex;

use crate::constants::JulianDate;
use crate::errors::OffsetError;

/// Matches an epoch header such as
/// `2458843.421181000 = A.D. 2019-Dec-25 22:06:29.8000 TDB`.
static EPOCH_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+\.?\d*) = A\.D\. .* TDB").unwrap());

/// Marker of a whole-batch failure for the queried object.
const NO_EPHEMERIS: &str = "No ephemeris";

/// One (epoch, position, velocity) tuple parsed from a response frame.
/// The epoch is a TDB Julian date; position is km, velocity km/s.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    pub epoch: JulianDate,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// Parse every response frame out of the raw Horizons text.
pub fn parse_vectors(response: &str) -> Result<Vec<StateVector>, OffsetError> {
    let mut vectors = Vec::new();
    let mut lines = response.lines();
    while let Some(line) = lines.next() {
        if line.starts_with(NO_EPHEMERIS) {
            return Err(OffsetError::NoEphemeris(line.trim_end().to_string()));
        }
        let Some(caps) = EPOCH_HEADER.captures(line) else {
            continue;
        };
        let epoch = caps[1].parse::<JulianDate>().map_err(|_| {
            OffsetError::MalformedEphemeris(format!("bad epoch header: {line:?}"))
        })?;
        let position = next_vector(&mut lines)?;
        let velocity = next_vector(&mut lines)?;
        vectors.push(StateVector {
            epoch,
            position,
            velocity,
        });
    }
    Ok(vectors)
}

/// Pull the next non-empty line and read three components out of it.
fn next_vector<'a, I>(lines: &mut I) -> Result<Vector3<f64>, OffsetError>
where
    I: Iterator<Item = &'a str>,
{
    let line = lines.find(|l| !l.trim().is_empty()).ok_or_else(|| {
        OffsetError::MalformedEphemeris("response ends inside a vector frame".to_string())
    })?;
    let components = line
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| OffsetError::MalformedEphemeris(format!("bad vector line: {line:?}")))?;
    if components.len() != 3 {
        return Err(OffsetError::MalformedEphemeris(format!(
            "expected 3 components, found {}: {line:?}",
            components.len()
        )));
    }
    Ok(Vector3::new(components[0], components[1], components[2]))
}
