use thiserror::Error;

/// Why a single user action did not produce a fare.
///
/// Every variant is terminal for the action that produced it; nothing is
/// retried automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("cannot connect to any API server ({attempted} endpoint(s) tried)")]
    DiscoveryExhausted { attempted: usize },

    #[error("connection to the server timed out")]
    Timeout,

    #[error("could not connect to the server")]
    ConnectionError,

    #[error("API request failed with status code {0}")]
    BadStatus(u16),

    #[error("fare value not found in server response")]
    MissingFareField,

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl PredictionError {
    /// Short machine-friendly name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::DiscoveryExhausted { .. } => "discovery_exhausted",
            PredictionError::Timeout => "timeout",
            PredictionError::ConnectionError => "connection_error",
            PredictionError::BadStatus(_) => "bad_status",
            PredictionError::MissingFareField => "missing_fare_field",
            PredictionError::Unexpected(_) => "unexpected",
        }
    }
}

/// Invalid trip input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripError {
    #[error("passenger count must be between 1 and 8, got {0}")]
    PassengerCount(i64),

    #[error("'{0}' is not a whole number")]
    InvalidNumber(String),

    #[error("'{0}' is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("'{0}' is not a valid time, expected HH:MM or HH:MM:SS")]
    InvalidTime(String),
}
