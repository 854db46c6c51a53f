//! Finding the first reachable prediction endpoint.
//!
//! Candidates are probed one at a time, in configuration order, with the real
//! trip parameters. The first one answering `200 OK` wins and nothing after it
//! is contacted. Every other outcome is recorded and the loop moves on.

use std::{fmt, time::Duration};

use tracing::{debug, info, warn};

use crate::{
    error::PredictionError,
    model::TripRequest,
    transport::{FareTransport, TransportError},
};

/// What happened when one candidate was probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    BadStatus(u16),
    Timeout,
    Connection(String),
    Other(String),
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Reachable => f.write_str("reachable"),
            ProbeOutcome::BadStatus(code) => write!(f, "status {code}"),
            ProbeOutcome::Timeout => f.write_str("timed out"),
            ProbeOutcome::Connection(msg) => write!(f, "connection failed: {msg}"),
            ProbeOutcome::Other(msg) => write!(f, "error: {msg}"),
        }
    }
}

impl From<TransportError> for ProbeOutcome {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => ProbeOutcome::Timeout,
            TransportError::Connection(msg) => ProbeOutcome::Connection(msg),
            TransportError::Other(msg) => ProbeOutcome::Other(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeAttempt {
    pub url: String,
    pub outcome: ProbeOutcome,
}

/// Result of one pass over the candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Discovery {
    pub endpoint: Option<String>,
    /// Every candidate contacted, in order. The selected one, if any, is last.
    pub attempts: Vec<ProbeAttempt>,
}

impl Discovery {
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn into_endpoint(self) -> Result<String, PredictionError> {
        let attempted = self.attempts.len();
        self.endpoint
            .ok_or(PredictionError::DiscoveryExhausted { attempted })
    }
}

/// Probe `candidates` in order and select the first one answering 200.
///
/// Never fails: an exhausted list is reported through
/// [`Discovery::endpoint`] being `None`.
pub async fn discover<T>(
    transport: &T,
    candidates: &[String],
    trip: &TripRequest,
    probe_timeout: Duration,
) -> Discovery
where
    T: FareTransport + ?Sized,
{
    let query = trip.query_pairs();
    let mut discovery = Discovery::default();

    for url in candidates {
        let outcome = match transport.get(url, &query, probe_timeout).await {
            Ok(res) if res.is_ok() => ProbeOutcome::Reachable,
            Ok(res) => ProbeOutcome::BadStatus(res.status),
            Err(err) => err.into(),
        };

        debug!(url = %url, outcome = %outcome, "probed endpoint");

        let reachable = outcome.is_reachable();
        discovery.attempts.push(ProbeAttempt { url: url.clone(), outcome });

        if reachable {
            info!(url = %url, "connected to endpoint");
            discovery.endpoint = Some(url.clone());
            return discovery;
        }
    }

    warn!(attempted = discovery.attempts.len(), "no reachable endpoint");
    discovery
}
