//! Matching returned state vectors back to waiting requests.
//!
//! A frame answers a request when their epochs agree to within
//! [`EPOCH_MATCH_TOLERANCE`] days; the site code already agrees because a
//! batch only ever carries one code. Colliding epochs are allowed: one
//! frame resolves every pending request it matches.
//!
//! After a batch, whatever it asked about and did not resolve is abandoned
//! for good; the terminal state keeps the pipeline from repeating requests
//! the service has already failed to answer once.

use crate::constants::EPOCH_MATCH_TOLERANCE;
use crate::horizons::StateVector;
use crate::pipeline::RunStats;
use crate::scan::OffsetRequest;

/// Resolve every pending request of the batch that lies within tolerance of
/// a returned state vector.
pub(crate) fn apply_batch(
    requests: &mut [OffsetRequest],
    included: &[usize],
    vectors: &[StateVector],
    stats: &mut RunStats,
) {
    for vector in vectors {
        for &idx in included {
            let request = &mut requests[idx];
            if request.is_pending()
                && (request.epoch - vector.epoch).abs() < EPOCH_MATCH_TOLERANCE
            {
                request.resolve(vector.position, vector.velocity);
                stats.positions_set += 1;
            }
        }
    }
}

/// Abandon every request of the batch that is still pending.
pub(crate) fn abandon_unresolved(
    requests: &mut [OffsetRequest],
    included: &[usize],
    stats: &mut RunStats,
) {
    for &idx in included {
        if requests[idx].is_pending() {
            log::debug!(
                "abandoning unanswered request at JD {:.5} ('{}')",
                requests[idx].epoch,
                requests[idx].site_code
            );
            requests[idx].abandon();
            stats.positions_failed += 1;
        }
    }
}

#[cfg(test)]
mod correlate_test {
    use nalgebra::Vector3;

    use super::*;
    use crate::scan::RequestState;

    fn pending(epoch: f64) -> OffsetRequest {
        OffsetRequest {
            epoch,
            site_code: "C51".to_string(),
            state: RequestState::Pending,
        }
    }

    fn frame(epoch: f64) -> StateVector {
        StateVector {
            epoch,
            position: Vector3::new(1.0, 2.0, 3.0),
            velocity: Vector3::new(0.1, 0.2, 0.3),
        }
    }

    #[test]
    fn test_resolves_within_tolerance_only() {
        let mut requests = vec![
            pending(2_458_843.42118),
            pending(2_458_843.42120), // 2e-5 days away: outside tolerance
        ];
        let mut stats = RunStats::default();
        apply_batch(&mut requests, &[0, 1], &[frame(2_458_843.421181)], &mut stats);
        assert_eq!(stats.positions_set, 1);
        assert_eq!(
            requests[0].state,
            RequestState::Resolved {
                position: Vector3::new(1.0, 2.0, 3.0),
                velocity: Vector3::new(0.1, 0.2, 0.3),
            }
        );
        assert!(requests[1].is_pending());
    }

    #[test]
    fn test_one_frame_resolves_every_colliding_request() {
        let mut requests = vec![
            pending(2_458_843.421181),
            pending(2_458_843.421185),
            pending(2_458_843.421179),
        ];
        let mut stats = RunStats::default();
        apply_batch(
            &mut requests,
            &[0, 1, 2],
            &[frame(2_458_843.421181)],
            &mut stats,
        );
        assert_eq!(stats.positions_set, 3);
        assert!(requests.iter().all(|r| !r.is_pending()));
    }

    #[test]
    fn test_resolved_requests_are_not_overwritten() {
        let mut requests = vec![pending(2_458_843.421181)];
        let mut stats = RunStats::default();
        apply_batch(&mut requests, &[0], &[frame(2_458_843.421181)], &mut stats);

        let mut second = frame(2_458_843.421182);
        second.position = Vector3::new(9.0, 9.0, 9.0);
        apply_batch(&mut requests, &[0], &[second], &mut stats);

        assert_eq!(stats.positions_set, 1);
        match &requests[0].state {
            RequestState::Resolved { position, .. } => {
                assert_eq!(*position, Vector3::new(1.0, 2.0, 3.0));
            }
            other => panic!("expected Resolved, got {other:?}"),
        }
    }

    #[test]
    fn test_unanswered_requests_are_terminally_abandoned() {
        let mut requests = vec![pending(2_458_843.1), pending(2_458_843.2)];
        let mut stats = RunStats::default();
        apply_batch(&mut requests, &[0, 1], &[frame(2_458_843.1)], &mut stats);
        abandon_unresolved(&mut requests, &[0, 1], &mut stats);
        assert_eq!(stats.positions_set, 1);
        assert_eq!(stats.positions_failed, 1);
        assert_eq!(requests[1].state, RequestState::Abandoned);

        // A later frame that would match must not revive it.
        apply_batch(&mut requests, &[0, 1], &[frame(2_458_843.2)], &mut stats);
        assert_eq!(requests[1].state, RequestState::Abandoned);
        assert_eq!(stats.positions_set, 1);
    }
}
