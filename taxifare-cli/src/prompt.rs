use anyhow::Context;
use inquire::{CustomType, DateSelect, Text, validator::Validation};
use taxifare_core::{
    Config, Coordinates, PassengerCount, TripRequest,
    model::parse_time,
};

/// Ask for every trip field, prefilled from `defaults`.
pub fn trip(defaults: &TripRequest) -> anyhow::Result<TripRequest> {
    println!("Pickup location");
    let pickup = coordinates(defaults.pickup())?;

    println!("Dropoff location");
    let dropoff = coordinates(defaults.dropoff())?;

    let default_dt = defaults.pickup_datetime();

    let date = DateSelect::new("Pickup date:")
        .with_default(default_dt.date())
        .prompt()
        .context("Failed to read pickup date")?;

    let time_input = Text::new("Pickup time (HH:MM[:SS]):")
        .with_default(&default_dt.format("%H:%M:%S").to_string())
        .with_validator(|s: &str| {
            Ok(match parse_time(s) {
                Ok(_) => Validation::Valid,
                Err(err) => Validation::Invalid(err.to_string().into()),
            })
        })
        .prompt()
        .context("Failed to read pickup time")?;
    let time = parse_time(&time_input)?;

    let passengers = CustomType::<u8>::new("Passenger count (1-8):")
        .with_default(defaults.passenger_count().get())
        .with_validator(|n: &u8| {
            Ok(match PassengerCount::try_from(*n) {
                Ok(_) => Validation::Valid,
                Err(err) => Validation::Invalid(err.to_string().into()),
            })
        })
        .prompt()
        .context("Failed to read passenger count")?;

    let trip = TripRequest::from_date_time(
        date,
        time,
        pickup,
        dropoff,
        PassengerCount::try_from(passengers)?,
    );

    tracing::debug!(pickup_datetime = %trip.pickup_datetime_param(), "trip entered");

    Ok(trip)
}

fn coordinates(defaults: Coordinates) -> anyhow::Result<Coordinates> {
    let longitude = CustomType::<f64>::new("  Longitude:")
        .with_default(defaults.longitude)
        .with_formatter(&|v: f64| format!("{v:.6}"))
        .prompt()
        .context("Failed to read longitude")?;

    let latitude = CustomType::<f64>::new("  Latitude:")
        .with_default(defaults.latitude)
        .with_formatter(&|v: f64| format!("{v:.6}"))
        .prompt()
        .context("Failed to read latitude")?;

    Ok(Coordinates::new(longitude, latitude))
}

/// Interactively edit candidate endpoints and timeouts in place.
pub fn configure(cfg: &mut Config) -> anyhow::Result<()> {
    let endpoints = Text::new("Endpoints, in probing order (comma-separated):")
        .with_default(&cfg.endpoints.join(", "))
        .with_validator(|s: &str| {
            Ok(if split_endpoints(s).is_empty() {
                Validation::Invalid("at least one endpoint is required".into())
            } else {
                Validation::Valid
            })
        })
        .prompt()
        .context("Failed to read endpoints")?;
    cfg.endpoints = split_endpoints(&endpoints);

    cfg.probe_timeout_ms = timeout("Probe timeout (ms):", cfg.probe_timeout_ms)?;
    cfg.request_timeout_ms = timeout("Request timeout (ms):", cfg.request_timeout_ms)?;

    cfg.validate()
}

fn timeout(message: &str, default: u64) -> anyhow::Result<u64> {
    CustomType::<u64>::new(message)
        .with_default(default)
        .with_validator(|n: &u64| {
            Ok(if *n == 0 {
                Validation::Invalid("must be greater than zero".into())
            } else {
                Validation::Valid
            })
        })
        .prompt()
        .with_context(|| format!("Failed to read {message}"))
}

fn split_endpoints(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
