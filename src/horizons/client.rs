use std::time::Duration;

use ureq::Agent;

use crate::errors::OffsetError;

/// Blocking fetch capability for ephemeris queries.
///
/// The pipeline consumes this trait instead of a concrete HTTP client, so
/// batching and correlation can be driven from canned response text in
/// tests, with no network in sight.
pub trait EphemerisSource {
    /// Issue one serialized query and return the raw textual response.
    fn fetch(&self, url: &str) -> Result<String, OffsetError>;
}

/// HTTP client for the Horizons batch interface.
///
/// One [`Agent`] is built up front and reused across batches; queries are
/// issued one at a time and block until the service answers or the global
/// timeout fires.
#[derive(Debug, Clone)]
pub struct HorizonsClient {
    http_client: Agent,
}

impl HorizonsClient {
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(60)))
            .build();
        HorizonsClient {
            http_client: config.into(),
        }
    }
}

impl Default for HorizonsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EphemerisSource for HorizonsClient {
    fn fetch(&self, url: &str) -> Result<String, OffsetError> {
        Ok(self
            .http_client
            .get(url)
            .call()?
            .body_mut()
            .read_to_string()?)
    }
}
