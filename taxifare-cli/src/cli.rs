use anyhow::{Context, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use taxifare_core::{
    Config, Coordinates, FareSession, HttpTransport, PassengerCount, Phase, TripRequest,
    model::{parse_date, parse_time},
};

use crate::{prompt, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "taxifare", version, about = "Taxi fare prediction client")]
pub struct Cli {
    /// Candidate endpoint, may be repeated. Replaces the configured list for this run.
    #[arg(long = "endpoint", global = true, value_name = "URL")]
    pub endpoints: Vec<String>,

    /// Log discovery and request details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

const USAGE_TIPS: &str = "\
Tips:
  Default coordinates run from Central Park to Times Square, New York.
  Any value can be changed to get a different price.
  The approximate distance is for comparison only.

Coordinate examples (longitude, latitude):
  Manhattan:          -73.9662, 40.7831
  JFK Airport:        -73.7781, 40.6413
  Statue of Liberty:  -74.0445, 40.6892";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict the fare for a trip given on the command line.
    #[command(after_help = USAGE_TIPS)]
    Predict {
        #[command(flatten)]
        trip: TripArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Enter the trip interactively, then predict its fare.
    #[command(after_help = USAGE_TIPS)]
    Interactive {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Probe the candidate endpoints and show which one would be used.
    Endpoints {
        #[command(flatten)]
        trip: TripArgs,
    },

    /// Edit the candidate endpoints and timeouts.
    Configure,
}

/// Trip fields; each defaults to the sample New York trip.
#[derive(Debug, Clone, Default, Args)]
pub struct TripArgs {
    /// Pickup date, YYYY-MM-DD.
    #[arg(long)]
    pub date: Option<String>,

    /// Pickup time, HH:MM or HH:MM:SS.
    #[arg(long)]
    pub time: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub pickup_lon: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub pickup_lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub dropoff_lon: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub dropoff_lat: Option<f64>,

    /// Number of passengers, 1 to 8.
    #[arg(long)]
    pub passengers: Option<String>,
}

impl TripArgs {
    pub fn to_trip(&self) -> anyhow::Result<TripRequest> {
        let sample = TripRequest::default();

        let date = match &self.date {
            Some(s) => parse_date(s)?,
            None => sample.pickup_datetime().date(),
        };
        let time = match &self.time {
            Some(s) => parse_time(s)?,
            None => sample.pickup_datetime().time(),
        };
        let passengers = match &self.passengers {
            Some(s) => s.parse::<PassengerCount>()?,
            None => sample.passenger_count(),
        };

        let pickup = Coordinates::new(
            self.pickup_lon.unwrap_or(sample.pickup().longitude),
            self.pickup_lat.unwrap_or(sample.pickup().latitude),
        );
        let dropoff = Coordinates::new(
            self.dropoff_lon.unwrap_or(sample.dropoff().longitude),
            self.dropoff_lat.unwrap_or(sample.dropoff().latitude),
        );

        Ok(TripRequest::from_date_time(date, time, pickup, dropoff, passengers))
    }
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct OutputArgs {
    /// Also show pickup and dropoff locations.
    #[arg(long)]
    pub map: bool,

    /// Also print the full server response, or the failure kind as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => {
                let mut cfg = Config::load()?;
                prompt::configure(&mut cfg)?;
                cfg.save()?;
                println!(
                    "Configuration saved to {}",
                    Config::config_file_path()?.display()
                );
            }
            Command::Predict { trip, output } => {
                let config = effective_config(self.endpoints)?;
                predict(config, trip.to_trip()?, output).await?;
            }
            Command::Interactive { output } => {
                let config = effective_config(self.endpoints)?;
                let trip = prompt::trip(&TripRequest::default())?;
                predict(config, trip, output).await?;
            }
            Command::Endpoints { trip } => {
                let config = effective_config(self.endpoints)?;
                let session = FareSession::new(HttpTransport::new(), config);
                let discovery = session.probe(&trip.to_trip()?).await;

                print!("{}", render::discovery(&discovery)?);
                if discovery.endpoint().is_none() {
                    bail!("no reachable endpoint");
                }
            }
        }

        Ok(())
    }
}

fn effective_config(endpoints: Vec<String>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if !endpoints.is_empty() {
        config = config.with_endpoints(endpoints);
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn predict(config: Config, trip: TripRequest, output: OutputArgs) -> anyhow::Result<()> {
    let session = FareSession::new(HttpTransport::new(), config);

    let outcome = session
        .run(&trip, |phase| match phase {
            Phase::Discovered(url) => println!("Connected to: {url}"),
            Phase::Requesting => println!("Connecting to server..."),
            _ => {}
        })
        .await;

    let result = match outcome.result {
        Ok(prediction) => {
            print!("{}", render::prediction(&prediction, &trip, output.json)?);
            Ok(())
        }
        Err(err) => {
            if output.json {
                println!("{}", render::failure_json(&err)?);
            }
            Err(anyhow!(render::failure(&err, outcome.discovery.endpoint())))
        }
    };

    if output.map {
        print!("{}", render::map(&trip));
    }

    result
}
