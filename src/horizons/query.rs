//! # Batch query construction
//!
//! One query asks Horizons for position-and-velocity state vectors of a
//! single object at a list of epochs. Serialized, it looks like (split over
//! lines here; the real URL has none):
//!
//! ```text
//! https://ssd.jpl.nasa.gov/horizons_batch.cgi?batch=1&COMMAND='-163'
//! &REF_PLANE='FRAME'&OBJ_DATA='NO'&TABLE_TYPE='V'&TLIST=
//! '2458843.421181','2458843.486631','2458843.551951'
//! &VEC_TABLE='2'&VEC_LABELS='N'
//! ```
//!
//! `REF_PLANE='FRAME'` selects J2000 equatorial coordinates,
//! `TABLE_TYPE='V'` vectors, `VEC_TABLE='2'` positions and velocities.
//!
//! Every epoch costs 17 bytes of URL (`'2458843.421181',`). The service
//! accepts roughly [`MAX_QUERY_BYTES`](crate::constants::MAX_QUERY_BYTES)
//! of URL before erroring out, so a group of pending epochs larger than the
//! budget is split: epochs are appended until the budget line is crossed,
//! and the rest stays pending for a later batch in the same run.

use crate::constants::{MAX_QUERY_BYTES, QUERY_TRAILER_RESERVE};
use crate::scan::OffsetRequest;

const QUERY_TRAILER: &str = "&VEC_TABLE='2'&VEC_LABELS='N'";

/// One serialized Horizons request and the requests it asks about.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchQuery {
    /// Full request URL, within [`MAX_QUERY_BYTES`].
    pub url: String,
    /// Indices into the request list of every epoch in the query, in order
    /// of first appearance.
    pub included: Vec<usize>,
}

/// Build one batch query for the site-code group anchored at `start`.
///
/// Collects every still-pending request sharing `requests[start]`'s site
/// code, in discovery order, until the serialized query would no longer
/// leave room for the trailer. The epoch that crosses the budget line is
/// still sent; everything after it waits for a later batch.
pub fn build_batch(horizons_idx: i32, requests: &[OffsetRequest], start: usize) -> BatchQuery {
    let site_code = &requests[start].site_code;
    let mut url = format!(
        "https://ssd.jpl.nasa.gov/horizons_batch.cgi?batch=1\
         &COMMAND='{horizons_idx}'\
         &REF_PLANE='FRAME'\
         &OBJ_DATA='NO'\
         &TABLE_TYPE='V'\
         &TLIST="
    );
    let mut included = Vec::new();
    for (idx, request) in requests.iter().enumerate().skip(start) {
        if !request.is_pending() || &request.site_code != site_code {
            continue;
        }
        if !included.is_empty() {
            url.push(',');
        }
        url.push_str(&format!("'{:.6}'", request.epoch));
        included.push(idx);
        if url.len() + QUERY_TRAILER_RESERVE > MAX_QUERY_BYTES {
            break;
        }
    }
    url.push_str(QUERY_TRAILER);
    BatchQuery { url, included }
}
