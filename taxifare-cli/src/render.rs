//! Plain-text rendering of results. Nothing here talks to the network.

use std::fmt::Write;

use taxifare_core::{Discovery, Prediction, PredictionError, TripRequest};

pub fn prediction(prediction: &Prediction, trip: &TripRequest, json: bool) -> anyhow::Result<String> {
    let mut out = String::new();

    writeln!(out, "Predicted fare: ${:.2}", prediction.fare)?;
    writeln!(out, "Approximate distance: {:.2} km", trip.approx_distance_km())?;
    writeln!(out)?;
    out.push_str(&trip_summary(trip));

    if json {
        writeln!(out)?;
        writeln!(out, "Response details:")?;
        writeln!(out, "{}", serde_json::to_string_pretty(&prediction.details)?)?;
    }

    Ok(out)
}

fn trip_summary(trip: &TripRequest) -> String {
    let (p, d) = (trip.pickup(), trip.dropoff());
    format!(
        "Trip input:\n  Date & time: {}\n  Pickup:      {:.4}, {:.4}\n  Dropoff:     {:.4}, {:.4}\n  Passengers:  {}\n",
        trip.pickup_datetime_param(),
        p.latitude,
        p.longitude,
        d.latitude,
        d.longitude,
        trip.passenger_count(),
    )
}

/// Error message plus a hint, when there is a useful one.
pub fn failure(err: &PredictionError, endpoint: Option<&str>) -> String {
    let hint = match err {
        PredictionError::DiscoveryExhausted { .. } => {
            Some("Try running the API locally or use the ready link.".to_string())
        }
        PredictionError::BadStatus(_) => {
            Some("Server might be unavailable or the link incorrect.".to_string())
        }
        PredictionError::ConnectionError => {
            endpoint.map(|url| format!("Make sure the API is running at: {url}"))
        }
        _ => None,
    };

    match hint {
        Some(hint) => format!("{err}\nHint: {hint}"),
        None => err.to_string(),
    }
}

pub fn discovery(discovery: &Discovery) -> anyhow::Result<String> {
    let mut out = String::new();

    for attempt in &discovery.attempts {
        let mark = if attempt.outcome.is_reachable() { "ok  " } else { "fail" };
        writeln!(out, "[{mark}] {} ({})", attempt.url, attempt.outcome)?;
    }

    match discovery.endpoint() {
        Some(url) => writeln!(out, "Connected to: {url}")?,
        None => writeln!(out, "Cannot connect to any API server")?,
    }

    Ok(out)
}

/// Machine-readable failure, printed instead of response details.
pub fn failure_json(err: &PredictionError) -> anyhow::Result<String> {
    let value = serde_json::json!({
        "error": err.kind(),
        "message": err.to_string(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn map(trip: &TripRequest) -> String {
    let (p, d) = (trip.pickup(), trip.dropoff());
    format!(
        "\nLocations:\n  Pickup:  lat {:.6}, lon {:.6}\n  Dropoff: lat {:.6}, lon {:.6}\n  Map: {}\n",
        p.latitude,
        p.longitude,
        d.latitude,
        d.longitude,
        osm_directions_url(trip),
    )
}

fn osm_directions_url(trip: &TripRequest) -> String {
    let (p, d) = (trip.pickup(), trip.dropoff());
    format!(
        "https://www.openstreetmap.org/directions?route={:.6}%2C{:.6}%3B{:.6}%2C{:.6}",
        p.latitude, p.longitude, d.latitude, d.longitude
    )
}
