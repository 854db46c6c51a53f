use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::TripError;

/// Wire format of `pickup_datetime`.
pub const PICKUP_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Kilometres per degree used by the planar distance approximation.
const KM_PER_DEGREE: f64 = 111.0;

/// A point in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }

    /// Rough straight-line distance, treating degrees as a flat grid.
    ///
    /// Only meant for display next to a fare; it ignores the earth's
    /// curvature and the shrinking of longitude degrees away from the equator.
    pub fn approx_distance_km(&self, other: &Coordinates) -> f64 {
        let dlat = other.latitude - self.latitude;
        let dlon = other.longitude - self.longitude;
        (dlat * dlat + dlon * dlon).sqrt() * KM_PER_DEGREE
    }
}

/// Number of passengers, always within `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassengerCount(u8);

impl PassengerCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for PassengerCount {
    type Error = TripError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TripError::PassengerCount(value.into()))
        }
    }
}

impl FromStr for PassengerCount {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i64 = s
            .trim()
            .parse()
            .map_err(|_| TripError::InvalidNumber(s.to_string()))?;
        let n = u8::try_from(n).map_err(|_| TripError::PassengerCount(n))?;
        Self::try_from(n)
    }
}

impl fmt::Display for PassengerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the prediction service needs to price one trip.
///
/// Built fresh for every user action and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pickup_datetime: NaiveDateTime,
    pickup: Coordinates,
    dropoff: Coordinates,
    passenger_count: PassengerCount,
}

impl TripRequest {
    pub fn new(
        pickup_datetime: NaiveDateTime,
        pickup: Coordinates,
        dropoff: Coordinates,
        passenger_count: PassengerCount,
    ) -> Self {
        Self {
            // the service only understands whole seconds
            pickup_datetime: pickup_datetime.with_nanosecond(0).unwrap_or(pickup_datetime),
            pickup,
            dropoff,
            passenger_count,
        }
    }

    /// Combine a separately entered date and time into a request.
    pub fn from_date_time(
        date: NaiveDate,
        time: NaiveTime,
        pickup: Coordinates,
        dropoff: Coordinates,
        passenger_count: PassengerCount,
    ) -> Self {
        Self::new(date.and_time(time), pickup, dropoff, passenger_count)
    }

    pub fn pickup_datetime(&self) -> NaiveDateTime {
        self.pickup_datetime
    }

    pub fn pickup(&self) -> Coordinates {
        self.pickup
    }

    pub fn dropoff(&self) -> Coordinates {
        self.dropoff
    }

    pub fn passenger_count(&self) -> PassengerCount {
        self.passenger_count
    }

    pub fn pickup_datetime_param(&self) -> String {
        self.pickup_datetime.format(PICKUP_DATETIME_FORMAT).to_string()
    }

    pub fn approx_distance_km(&self) -> f64 {
        self.pickup.approx_distance_km(&self.dropoff)
    }

    /// Query string parameters, in the order the service documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("pickup_datetime", self.pickup_datetime_param()),
            ("pickup_longitude", self.pickup.longitude.to_string()),
            ("pickup_latitude", self.pickup.latitude.to_string()),
            ("dropoff_longitude", self.dropoff.longitude.to_string()),
            ("dropoff_latitude", self.dropoff.latitude.to_string()),
            ("passenger_count", self.passenger_count.to_string()),
        ]
    }
}

impl Default for TripRequest {
    /// Central Park to Times Square on a July evening.
    fn default() -> Self {
        let date = NaiveDate::from_ymd_opt(2014, 7, 6).unwrap_or_default();
        let time = NaiveTime::from_hms_opt(19, 18, 0).unwrap_or_default();

        Self::from_date_time(
            date,
            time,
            Coordinates::new(-73.950655, 40.783282),
            Coordinates::new(-73.984365, 40.769802),
            PassengerCount(2),
        )
    }
}

/// Parse a `YYYY-MM-DD` date as typed by a user.
pub fn parse_date(input: &str) -> Result<NaiveDate, TripError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| TripError::InvalidDate(input.to_string()))
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time(input: &str) -> Result<NaiveTime, TripError> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .map_err(|_| TripError::InvalidTime(input.to_string()))
}

/// A successful answer from the prediction service.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub fare: f64,
    /// The whole response object, `fare` included.
    pub details: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip_at(date: &str, time: &str) -> TripRequest {
        TripRequest::from_date_time(
            parse_date(date).unwrap(),
            parse_time(time).unwrap(),
            Coordinates::new(-73.950655, 40.783282),
            Coordinates::new(-73.984365, 40.769802),
            PassengerCount::try_from(2).unwrap(),
        )
    }

    #[test]
    fn pickup_datetime_is_serialized_with_seconds() {
        let trip = trip_at("2014-07-06", "19:18:00");
        assert_eq!(trip.pickup_datetime_param(), "2014-07-06 19:18:00");

        let trip = trip_at("2014-07-06", "19:18");
        assert_eq!(trip.pickup_datetime_param(), "2014-07-06 19:18:00");
    }

    #[test]
    fn sub_second_precision_is_dropped() {
        let dt = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 678)
            .unwrap();
        let trip = TripRequest::new(
            dt,
            Coordinates::new(0.0, 0.0),
            Coordinates::new(0.0, 0.0),
            PassengerCount::try_from(1).unwrap(),
        );
        assert_eq!(trip.pickup_datetime_param(), "2020-01-02 03:04:05");
    }

    #[test]
    fn query_pairs_cover_all_six_fields_in_order() {
        let trip = TripRequest::default();
        let pairs = trip.query_pairs();

        let names: Vec<_> = pairs.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            [
                "pickup_datetime",
                "pickup_longitude",
                "pickup_latitude",
                "dropoff_longitude",
                "dropoff_latitude",
                "passenger_count",
            ]
        );
        assert_eq!(pairs[0].1, "2014-07-06 19:18:00");
        assert_eq!(pairs[1].1, "-73.950655");
        assert_eq!(pairs[4].1, "40.769802");
        assert_eq!(pairs[5].1, "2");
    }

    #[test]
    fn passenger_count_bounds() {
        assert!(PassengerCount::try_from(0).is_err());
        assert!(PassengerCount::try_from(1).is_ok());
        assert!(PassengerCount::try_from(8).is_ok());
        assert!(matches!(
            PassengerCount::try_from(9),
            Err(TripError::PassengerCount(9))
        ));
    }

    #[test]
    fn passenger_count_from_str() {
        assert_eq!("3".parse::<PassengerCount>().unwrap().get(), 3);
        assert!(matches!(
            "300".parse::<PassengerCount>(),
            Err(TripError::PassengerCount(300))
        ));
        assert!(matches!(
            "-1".parse::<PassengerCount>(),
            Err(TripError::PassengerCount(-1))
        ));
        assert!(matches!(
            "two".parse::<PassengerCount>(),
            Err(TripError::InvalidNumber(_))
        ));
    }

    #[test]
    fn bad_date_and_time_are_rejected() {
        assert!(matches!(parse_date("06/07/2014"), Err(TripError::InvalidDate(_))));
        assert!(matches!(parse_time("7pm"), Err(TripError::InvalidTime(_))));
    }

    #[test]
    fn approximate_distance() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(3.0, 4.0);
        assert!((a.approx_distance_km(&b) - 555.0).abs() < 1e-9);

        let trip = TripRequest::default();
        let km = trip.approx_distance_km();
        assert!(km > 3.9 && km < 4.1, "got {km}");
    }
}
