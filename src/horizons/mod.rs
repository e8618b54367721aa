//! Batched state-vector queries against the JPL Horizons service.
//!
//! Split the way requests flow: [`query`] serializes one batch,
//! [`client`] carries it over HTTP, [`response`] turns the raw text back
//! into state vectors.

pub mod client;
pub mod query;
pub mod response;

pub use client::{EphemerisSource, HorizonsClient};
pub use query::BatchQuery;
pub use response::StateVector;
