//! Core library for the `taxifare` CLI.
//!
//! This crate defines:
//! - Trip input types and their query-string encoding
//! - Configuration of candidate endpoints and timeouts
//! - Endpoint discovery and the fare prediction request
//! - The per-action session state machine tying them together
//!
//! It is used by `taxifare-cli`, but can also be reused by other front ends.

pub mod config;
pub mod discovery;
pub mod error;
pub mod model;
pub mod prediction;
pub mod session;
pub mod transport;

pub use config::Config;
pub use discovery::{Discovery, ProbeAttempt, ProbeOutcome, discover};
pub use error::{PredictionError, TripError};
pub use model::{Coordinates, PassengerCount, Prediction, TripRequest};
pub use prediction::{PredictionResult, predict};
pub use session::{FareSession, Phase, SessionOutcome};
pub use transport::{FareTransport, HttpTransport, RawResponse, TransportError};
