mod card;
mod gpsd;
mod location;

use std::{result::Result as StdResult, sync::Arc};

use anyhow::{Context, anyhow, bail};
use clap::Parser;
use log::{LevelFilter, debug};
use serde::Serialize;
use tokio::{sync::mpsc, task::JoinHandle};
use whereami_geocoding::{DEFAULT_ENDPOINT, GeocoderConfig, GoogleGeocoder, MapView};
use whereami_logic::{
    Geocoder, LocationService, Locator, LocatorState, LocatorStep, StateUpdateSender,
};

use crate::{
    card::MapSummary,
    gpsd::GpsdLocation,
    location::{FixedLocation, HostLocation},
};

type Result<T = (), E = anyhow::Error> = StdResult<T, E>;

const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Parser)]
#[command(version, about = "Find out where you are, as coordinates and a street address")]
struct Cli {
    /// Google Maps API key used for the address lookup
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Reverse geocoding endpoint
    #[arg(long, env = "WHEREAMI_GEOCODE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Use this position instead of asking a receiver
    #[arg(
        long,
        value_name = "LAT,LNG[,ACCURACY]",
        allow_hyphen_values = true
    )]
    at: Option<FixedLocation>,

    /// gpsd daemon to get the position from, used unless --at is given
    #[arg(
        long,
        value_name = "HOST:PORT",
        num_args = 0..=1,
        default_missing_value = gpsd::DEFAULT_ADDR,
        conflicts_with = "at"
    )]
    gpsd: Option<String>,

    /// Ignore any proxy configured in the environment
    #[arg(long)]
    no_proxy: bool,

    /// Print the final state as JSON instead of a location card
    #[arg(long)]
    json: bool,

    /// Also print an HTML snippet embedding the map
    #[arg(long)]
    embed: bool,

    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn location_service(&self) -> HostLocation {
        match self.at {
            Some(fixed) => HostLocation::Fixed(fixed),
            None => HostLocation::Gpsd(GpsdLocation::new(
                self.gpsd.as_deref().unwrap_or(gpsd::DEFAULT_ADDR),
            )),
        }
    }
}

struct UpdateSender(mpsc::UnboundedSender<()>);

impl StateUpdateSender for UpdateSender {
    fn send_update(&self) {
        self.0.send(()).ok();
    }
}

fn progress_message(step: LocatorStep) -> Option<&'static str> {
    match step {
        LocatorStep::AcquiringPosition => Some("ACQUIRING GPS..."),
        LocatorStep::ResolvingAddress => Some("RESOLVING ADDRESS..."),
        _ => None,
    }
}

/// Print progress for each new step until the run reaches a terminal state.
/// `task` is the run itself, if it dies without finishing this errors instead of waiting forever.
async fn follow_run<L, G, S>(
    locator: &Locator<L, G, S>,
    updates: &mut mpsc::UnboundedReceiver<()>,
    mut task: JoinHandle<()>,
    quiet: bool,
) -> Result<LocatorState>
where
    L: LocationService,
    G: Geocoder,
    S: StateUpdateSender,
{
    let mut last_step = LocatorStep::Idle;
    let mut finished = false;
    loop {
        tokio::select! {
            update = updates.recv() => {
                update.context("Locator stopped sending updates")?;
            }
            res = &mut task, if !finished => {
                res.context("Locator run stopped unexpectedly")?;
                finished = true;
            }
        }

        let state = locator.get_state().await;
        if state.step() != last_step {
            last_step = state.step();
            if let (Some(msg), false) = (progress_message(last_step), quiet) {
                eprintln!("{msg}");
            }
        }
        if state.step().is_terminal() {
            return Ok(state);
        }
        if finished {
            bail!("Locator run ended without a result");
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    state: &'a LocatorState,
    #[serde(skip_serializing_if = "Option::is_none")]
    map: Option<MapSummary>,
}

#[tokio::main]
async fn main() -> Result {
    let cli = Cli::parse();

    colog::default_builder()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .init();

    let Some(api_key) = cli.api_key.clone().filter(|key| !key.trim().is_empty()) else {
        bail!(
            "{API_KEY_ENV} is not set. Pass --api-key or set it in the environment, e.g. {API_KEY_ENV}=AIzaSy..."
        );
    };

    let geocoder = GoogleGeocoder::new(GeocoderConfig {
        endpoint: cli.endpoint.clone(),
        system_proxy: !cli.no_proxy,
        ..Default::default()
    })?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let locator = Arc::new(Locator::new(
        cli.location_service(),
        geocoder,
        api_key.clone(),
        UpdateSender(tx),
    ));

    let (run, task) = locator.start().await;
    debug!("Started run {run}");

    let state = follow_run(&locator, &mut rx, task, cli.json).await?;

    let map = match (state.location(), state.address()) {
        (Some(location), Some(_)) => Some(MapView::new(*location, &api_key)),
        _ => None,
    };

    if cli.json {
        let output = JsonOutput {
            state: &state,
            map: map.as_ref().map(MapSummary::new).transpose()?,
        };
        let out = serde_json::to_string_pretty(&output).context("Failed to serialize result")?;
        println!("{out}");
    }

    match (state.location(), state.address(), map) {
        (Some(location), Some(address), Some(map)) => {
            if !cli.json {
                println!("{}", card::render(address, location, &map)?);
            }
            if cli.embed {
                println!("{}", map.iframe_html()?);
            }
            Ok(())
        }
        (location, _, _) => {
            if let (Some(location), false) = (location, cli.json) {
                eprintln!("{}", card::render_coords(location));
            }
            let error = state
                .error()
                .ok_or_else(|| anyhow!("Run ended without a result"))?;
            bail!("Could not determine your location: {}", error.message())
        }
    }
}
