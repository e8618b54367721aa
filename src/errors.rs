use thiserror::Error;

/// Crate-wide error type.
///
/// Per-observation failures (unknown site codes, unanswered epochs) are not
/// errors: they are counted and reported by the pipeline. This type covers
/// the conditions that fail a parse, a batch, or the run itself.
#[derive(Error, Debug)]
pub enum OffsetError {
    #[error("Unable to perform file operation: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP ureq error: {0}")]
    Transport(#[from] ureq::Error),

    #[error("Invalid date field: {0}")]
    InvalidDate(String),

    #[error("Malformed ephemeris response: {0}")]
    MalformedEphemeris(String),

    #[error("Service reported no ephemeris: {0}")]
    NoEphemeris(String),
}
