//! # First pass: finding spacecraft observations that need offsets
//!
//! A spacecraft observation is an 80-column line with `'S'` in column 14
//! (0-indexed). Each one discovered opens an [`OffsetRequest`] that the rest
//! of the pipeline drives from `Pending` to either `Resolved` (a geocentric
//! state vector was obtained) or `Abandoned` (terminal; never retried).
//!
//! Companion `'s'` offset lines are *not* scanned: the rewrite pass
//! regenerates them from the raw observations, so whatever offsets the input
//! already carries are irrelevant here.
//!
//! The scan is streaming and keeps nothing but the request list in memory,
//! so arbitrarily long files are fine.

use std::io::BufRead;

use nalgebra::Vector3;

use crate::{
    constants::{JulianDate, MpcCode, SPACECRAFT_ERA_START_JD},
    errors::OffsetError,
    time::frac_date_to_epoch,
};

/// Resolution state of one spacecraft observation.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    /// Waiting for the ephemeris service.
    Pending,
    /// Geocentric state vector obtained, in km and km/s.
    Resolved {
        position: Vector3<f64>,
        velocity: Vector3<f64>,
    },
    /// Terminal failure. An abandoned request is never queried again,
    /// which keeps the pipeline from repeating requests the service has
    /// already failed to answer once.
    Abandoned,
}

/// One spacecraft observation waiting for its offset record.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetRequest {
    /// Observation epoch as a Julian date in the TT scale.
    pub epoch: JulianDate,
    /// Site code copied from columns 77..80 of the observation line.
    pub site_code: MpcCode,
    pub state: RequestState,
}

impl OffsetRequest {
    pub fn is_pending(&self) -> bool {
        self.state == RequestState::Pending
    }

    pub(crate) fn resolve(&mut self, position: Vector3<f64>, velocity: Vector3<f64>) {
        self.state = RequestState::Resolved { position, velocity };
    }

    pub(crate) fn abandon(&mut self) {
        self.state = RequestState::Abandoned;
    }
}

/// Derive the TT epoch of a spacecraft observation or offset line.
///
/// Returns `None` when the line is not one: shorter than 80 columns, wrong
/// marker in column 14, an unparseable date field, or a date before any
/// observing spacecraft existed (the era guard rejects malformed lines that
/// happen to carry the marker).
pub(crate) fn sat_obs_epoch(line: &str) -> Option<JulianDate> {
    if line.len() < 80 {
        return None;
    }
    if !matches!(line.as_bytes()[14], b'S' | b's') {
        return None;
    }
    let epoch = frac_date_to_epoch(line.get(15..32)?.trim()).ok()?;
    if epoch.to_jde_utc_days() < SPACECRAFT_ERA_START_JD {
        return None;
    }
    Some(epoch.to_jde_tt_days())
}

/// Scan the record stream and collect one [`OffsetRequest`] per spacecraft
/// observation, in order of appearance. Only raw `'S'` observation lines
/// open a request.
pub fn scan_stream<R: BufRead>(reader: R) -> Result<Vec<OffsetRequest>, OffsetError> {
    let mut requests = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.as_bytes().get(14) != Some(&b'S') {
            continue;
        }
        let Some(epoch) = sat_obs_epoch(&line) else {
            continue;
        };
        let Some(site_code) = line.get(77..80) else {
            continue;
        };
        log::debug!("sat obs at JD {epoch:.5} from '{site_code}'");
        requests.push(OffsetRequest {
            epoch,
            site_code: site_code.to_string(),
            state: RequestState::Pending,
        });
    }
    Ok(requests)
}

#[cfg(test)]
mod scan_test {
    use super::*;

    const C54_LINE: &str =
        "     K20K42H  S2020 12 25.69572814 45 21.50 +04 41 41.2                V~5zHCC54";
    const C49_LINE: &str =
        "    CK10Y100 GS2010 12 18.42987 00 15 39.65 -05 26 23.0                 84456C49";

    #[test]
    fn test_sat_obs_epoch_valid_line() {
        let expected = frac_date_to_epoch("2020 12 25.695728")
            .unwrap()
            .to_jde_tt_days();
        let epoch = sat_obs_epoch(C54_LINE).unwrap();
        assert_eq!(epoch, expected);
        // TT runs ahead of the recorded UTC time.
        assert!(epoch > 2_459_209.195728);
    }

    #[test]
    fn test_sat_obs_epoch_rejections() {
        // Too short.
        assert_eq!(sat_obs_epoch("short line"), None);
        // Ground-based observation (no marker in column 14).
        let ground =
            "     K09R05F  C2009 09 15.23433 22 52 22.62 -14 47 03.2          20.8 Vr~097wG96";
        assert_eq!(sat_obs_epoch(ground), None);
        // Marker present but the date predates any spacecraft.
        let pre_era =
            "    CK06O040 3S1988 07 20.52922 07 47 36.9  +19 21 41                   57549249";
        assert_eq!(sat_obs_epoch(pre_era), None);
        // Marker present but the date field is garbage.
        let bad_date =
            "     K20K42H  S20xx 12 25.69572814 45 21.50 +04 41 41.2                V~5zHCC54";
        assert_eq!(sat_obs_epoch(bad_date), None);
    }

    #[test]
    fn test_scan_collects_spacecraft_observations_in_order() {
        let ground =
            "     K09R05F  C2009 09 15.23433 22 52 22.62 -14 47 03.2          20.8 Vr~097wG96";
        let input = format!("COM some comment line\n{C54_LINE}\n{C49_LINE}\n{ground}\n");
        let requests = scan_stream(input.as_bytes()).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].site_code, "C54");
        assert_eq!(requests[1].site_code, "C49");
        assert!(requests.iter().all(OffsetRequest::is_pending));
    }

    #[test]
    fn test_scan_skips_existing_offset_lines() {
        let offset_line =
            "     K20K42H  s2020 12 25.6957282 +14.3990440 -44.6299726 -17.5109273   ~5zHCC54";
        let requests = scan_stream(offset_line.as_bytes()).unwrap();
        assert!(requests.is_empty());
        // The rewriter still recognizes it, so it can drop and regenerate it.
        assert!(sat_obs_epoch(offset_line).is_some());
    }
}
