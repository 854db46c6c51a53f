//! One user action, from trip entry to a rendered outcome.
//!
//! ```text
//! Idle -> Discovering -> DiscoveryFailed
//!                     -> Discovered -> Requesting -> Succeeded | Failed
//! ```
//!
//! Each action runs to completion; a new action starts again from `Idle`.

use tracing::debug;

use crate::{
    config::Config,
    discovery::{Discovery, discover},
    error::PredictionError,
    model::TripRequest,
    prediction::{PredictionResult, predict},
    transport::FareTransport,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Discovering,
    DiscoveryFailed,
    Discovered(String),
    Requesting,
    Succeeded,
    Failed(PredictionError),
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::DiscoveryFailed | Phase::Succeeded | Phase::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub discovery: Discovery,
    /// `Err(DiscoveryExhausted)` when no endpoint was found; no prediction
    /// request is made in that case.
    pub result: PredictionResult,
}

#[derive(Debug)]
pub struct FareSession<T> {
    transport: T,
    config: Config,
}

impl<T: FareTransport> FareSession<T> {
    pub fn new(transport: T, config: Config) -> Self {
        Self { transport, config }
    }

    /// Discovery only, without the prediction call.
    pub async fn probe(&self, trip: &TripRequest) -> Discovery {
        discover(
            &self.transport,
            &self.config.endpoints,
            trip,
            self.config.probe_timeout(),
        )
        .await
    }

    /// Run one action to a terminal phase, reporting every transition.
    pub async fn run<F>(&self, trip: &TripRequest, mut on_phase: F) -> SessionOutcome
    where
        F: FnMut(&Phase),
    {
        let mut enter = |phase: Phase| {
            debug!(?phase, "session phase");
            on_phase(&phase);
        };

        enter(Phase::Idle);
        enter(Phase::Discovering);

        let discovery = self.probe(trip).await;

        let endpoint = match discovery.clone().into_endpoint() {
            Ok(endpoint) => endpoint,
            Err(err) => {
                enter(Phase::DiscoveryFailed);
                return SessionOutcome { discovery, result: Err(err) };
            }
        };

        enter(Phase::Discovered(endpoint.clone()));
        enter(Phase::Requesting);

        let result = predict(
            &self.transport,
            &endpoint,
            trip,
            self.config.request_timeout(),
        )
        .await;

        match &result {
            Ok(_) => enter(Phase::Succeeded),
            Err(err) => enter(Phase::Failed(err.clone())),
        }

        SessionOutcome { discovery, result }
    }
}
