//! Second pass over the record stream.
//!
//! Everything that is not a spacecraft line passes through untouched.
//! Recognized `'s'` offset lines are dropped: offsets are regenerated from
//! the raw observations, never trusted from the input. Each observation
//! with a resolved request becomes three lines: a `COM vel` comment, the
//! original observation, and the freshly encoded offset.

use std::io::{BufRead, Write};

use nalgebra::Vector3;

use crate::constants::EPOCH_MATCH_TOLERANCE;
use crate::encode::encode_offset_line;
use crate::errors::OffsetError;
use crate::scan::{sat_obs_epoch, OffsetRequest, RequestState};

/// Emit the rewritten stream.
///
/// Observations without a resolved request (never matched, or abandoned)
/// pass through unchanged; they only show up in the run's aggregate
/// counters.
pub fn rewrite_stream<R: BufRead, W: Write>(
    reader: R,
    requests: &[OffsetRequest],
    writer: &mut W,
) -> Result<(), OffsetError> {
    for line in reader.lines() {
        let line = line?;
        let Some(epoch) = sat_obs_epoch(&line) else {
            writeln!(writer, "{line}")?;
            continue;
        };
        if line.as_bytes()[14] == b's' {
            continue;
        }
        match resolved_match(requests, &line, epoch) {
            Some((position, velocity, site_code)) => {
                writeln!(writer, "{}", velocity_comment(&line, velocity, site_code))?;
                writeln!(writer, "{line}")?;
                writeln!(writer, "{}", encode_offset_line(&line, position))?;
            }
            None => writeln!(writer, "{line}")?,
        }
    }
    Ok(())
}

/// Find the first resolved request for this observation's site code within
/// the epoch tolerance.
fn resolved_match<'a>(
    requests: &'a [OffsetRequest],
    line: &str,
    epoch: f64,
) -> Option<(&'a Vector3<f64>, &'a Vector3<f64>, &'a str)> {
    let site_code = line.get(77..80)?;
    requests.iter().find_map(|request| match &request.state {
        RequestState::Resolved { position, velocity }
            if request.site_code == site_code
                && (request.epoch - epoch).abs() < EPOCH_MATCH_TOLERANCE =>
        {
            Some((position, velocity, request.site_code.as_str()))
        }
        _ => None,
    })
}

/// Comment line carrying the velocity the service returned alongside the
/// position: fixed prefix, the 16-character date field, three signed
/// components, the site code.
fn velocity_comment(line: &str, velocity: &Vector3<f64>, site_code: &str) -> String {
    format!(
        "COM vel (km/s) {}{:+13.7}{:+13.7}{:+13.7} {}",
        &line[15..31],
        velocity.x,
        velocity.y,
        velocity.z,
        site_code
    )
}

#[cfg(test)]
mod rewrite_test {
    use super::*;
    use crate::scan::RequestState;
    use crate::time::frac_date_to_epoch;

    const C51_LINE: &str =
        "    CK05L030  S2010 05 24.27985 11 45 53.84 +41 53 18.8                w70582C51";

    fn resolved_request(epoch: f64) -> OffsetRequest {
        OffsetRequest {
            epoch,
            site_code: "C51".to_string(),
            state: RequestState::Resolved {
                position: Vector3::new(-3522.9048, 2925.0063, 5163.4745),
                velocity: Vector3::new(-1.2345678, 0.23456789, -0.03456789),
            },
        }
    }

    #[test]
    fn test_velocity_comment_layout() {
        let velocity = Vector3::new(-1.2345678, 0.23456789, -0.03456789);
        assert_eq!(
            velocity_comment(C51_LINE, &velocity, "C51"),
            "COM vel (km/s) 2010 05 24.27985   -1.2345678   +0.2345679   -0.0345679 C51"
        );
    }

    #[test]
    fn test_matched_observation_becomes_three_lines() {
        let epoch = frac_date_to_epoch("2010 05 24.27985")
            .unwrap()
            .to_jde_tt_days();
        let requests = vec![resolved_request(epoch)];
        let mut output = Vec::new();
        rewrite_stream(C51_LINE.as_bytes(), &requests, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("COM vel (km/s) "));
        assert_eq!(lines[1], C51_LINE);
        assert_eq!(
            lines[2],
            "    CK05L030  s2010 05 24.27985 1 - 3522.9048 + 2925.0063 + 5163.4745   70582C51"
        );
    }

    #[test]
    fn test_unmatched_observation_passes_through() {
        // Same site code, epoch a full day away.
        let epoch = frac_date_to_epoch("2010 05 25.27985")
            .unwrap()
            .to_jde_tt_days();
        let requests = vec![resolved_request(epoch)];
        let mut output = Vec::new();
        rewrite_stream(C51_LINE.as_bytes(), &requests, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), format!("{C51_LINE}\n"));
    }

    #[test]
    fn test_stale_offset_lines_are_dropped() {
        let stale =
            "    CK05L030  s2010 05 24.27985 1 - 9999.9999 + 9999.9999 + 9999.9999   70582C51";
        let input = format!("COM header\n{stale}\n");
        let mut output = Vec::new();
        rewrite_stream(input.as_bytes(), &[], &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "COM header\n");
    }
}
