use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::PredictionError,
    model::{Prediction, TripRequest},
    transport::{FareTransport, TransportError, http::truncate_body},
};

pub type PredictionResult = Result<Prediction, PredictionError>;

/// Ask `endpoint` for the fare of `trip`. Issued once, never retried.
pub async fn predict<T>(
    transport: &T,
    endpoint: &str,
    trip: &TripRequest,
    request_timeout: Duration,
) -> PredictionResult
where
    T: FareTransport + ?Sized,
{
    let res = transport
        .get(endpoint, &trip.query_pairs(), request_timeout)
        .await
        .map_err(|err| {
            warn!(endpoint, error = %err, "prediction request failed");
            match err {
                TransportError::Timeout => PredictionError::Timeout,
                TransportError::Connection(_) => PredictionError::ConnectionError,
                TransportError::Other(msg) => PredictionError::Unexpected(msg),
            }
        })?;

    if !res.is_ok() {
        warn!(endpoint, status = res.status, body = %truncate_body(&res.body), "bad status");
        return Err(PredictionError::BadStatus(res.status));
    }

    let prediction = parse_prediction(&res.body)?;
    info!(endpoint, fare = prediction.fare, "fare predicted");
    Ok(prediction)
}

/// Extract the fare from a `200 OK` body.
pub fn parse_prediction(body: &str) -> PredictionResult {
    let value: Value = serde_json::from_str(body).map_err(|err| {
        PredictionError::Unexpected(format!(
            "invalid JSON in server response: {err} (body: {})",
            truncate_body(body)
        ))
    })?;

    let Value::Object(details) = value else {
        return Err(PredictionError::Unexpected(format!(
            "response is not a JSON object: {}",
            truncate_body(body)
        )));
    };

    let fare = match details.get("fare") {
        None | Some(Value::Null) => return Err(PredictionError::MissingFareField),
        Some(fare) => fare.as_f64().ok_or_else(|| {
            PredictionError::Unexpected(format!("fare is not a number: {fare}"))
        })?,
    };

    Ok(Prediction { fare, details })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpTransport, fake::ScriptedTransport};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const URL: &str = "http://api/predict";

    async fn predict_with(transport: &ScriptedTransport) -> PredictionResult {
        predict(transport, URL, &TripRequest::default(), Duration::from_secs(10)).await
    }

    #[test]
    fn fare_is_kept_exactly() {
        let prediction = parse_prediction(r#"{"fare": 12.5}"#).unwrap();
        assert_eq!(prediction.fare, 12.5);
    }

    #[test]
    fn extra_fields_are_passed_through() {
        let prediction = parse_prediction(r#"{"fare": 7, "currency": "USD"}"#).unwrap();
        assert_eq!(prediction.fare, 7.0);
        assert_eq!(prediction.details["currency"], "USD");
        assert_eq!(prediction.details.len(), 2);
    }

    #[test]
    fn null_or_missing_fare() {
        assert_eq!(
            parse_prediction(r#"{"fare": null}"#),
            Err(PredictionError::MissingFareField)
        );
        assert_eq!(
            parse_prediction(r#"{"price": 3}"#),
            Err(PredictionError::MissingFareField)
        );
    }

    #[test]
    fn non_object_bodies_are_unexpected() {
        for body in ["[1, 2]", "null", "\"abc\"", "3"] {
            assert!(
                matches!(
                    parse_prediction(body),
                    Err(PredictionError::Unexpected(ref msg)) if msg.contains("not a JSON object")
                ),
                "body {body}"
            );
        }
    }

    #[test]
    fn malformed_bodies_are_unexpected() {
        assert!(matches!(
            parse_prediction("<html>"),
            Err(PredictionError::Unexpected(msg)) if msg.contains("invalid JSON")
        ));
        assert!(matches!(
            parse_prediction(r#"{"fare": "cheap"}"#),
            Err(PredictionError::Unexpected(msg)) if msg.contains("not a number")
        ));
    }

    #[tokio::test]
    async fn transport_failures_map_to_kinds() {
        let t = ScriptedTransport::new().fail(URL, TransportError::Timeout);
        assert_eq!(predict_with(&t).await, Err(PredictionError::Timeout));

        let t = ScriptedTransport::new().fail(URL, TransportError::Connection("refused".into()));
        assert_eq!(predict_with(&t).await, Err(PredictionError::ConnectionError));

        let t = ScriptedTransport::new().fail(URL, TransportError::Other("tls".into()));
        assert_eq!(
            predict_with(&t).await,
            Err(PredictionError::Unexpected("tls".into()))
        );
    }

    #[tokio::test]
    async fn uses_the_request_timeout_once() {
        let t = ScriptedTransport::new().reply(URL, 200, r#"{"fare": 1.5}"#);
        predict_with(&t).await.unwrap();
        assert_eq!(t.timeouts(), vec![Duration::from_secs(10)]);
    }

    #[tokio::test]
    async fn server_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/predict"))
            .and(query_param("pickup_datetime", "2014-07-06 19:18:00"))
            .and(query_param("passenger_count", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"fare": 12.5}"#))
            .expect(1)
            .mount(&server)
            .await;

        let result = predict(
            &HttpTransport::new(),
            &format!("{}/predict", server.uri()),
            &TripRequest::default(),
            Duration::from_secs(10),
        )
        .await;

        assert_eq!(result.unwrap().fare, 12.5);
    }

    #[tokio::test]
    async fn server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let result = predict(
            &HttpTransport::new(),
            &server.uri(),
            &TripRequest::default(),
            Duration::from_secs(10),
        )
        .await;

        assert_eq!(result, Err(PredictionError::BadStatus(500)));
    }

    #[tokio::test]
    async fn server_too_slow() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"fare": 12.5}"#)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let result = predict(
            &HttpTransport::new(),
            &server.uri(),
            &TripRequest::default(),
            Duration::from_millis(50),
        )
        .await;

        assert_eq!(result, Err(PredictionError::Timeout));
    }

    #[tokio::test]
    async fn server_missing_fare() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"fare": null}"#))
            .mount(&server)
            .await;

        let result = predict(
            &HttpTransport::new(),
            &server.uri(),
            &TripRequest::default(),
            Duration::from_secs(10),
        )
        .await;

        assert_eq!(result, Err(PredictionError::MissingFareField));
    }
}
