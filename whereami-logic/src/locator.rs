use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::{sync::RwLock, task::JoinHandle};
use uuid::Uuid;

use crate::{
    address::Address,
    error::LocateError,
    geocode::{Geocoder, resolve_address},
    location::{Location, LocationService, acquire_position},
};

/// Identifies a single run of the pipeline
pub type RunId = Uuid;

pub trait StateUpdateSender {
    fn send_update(&self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocatorStep {
    #[default]
    Idle,
    AcquiringPosition,
    ResolvingAddress,
    Completed,
    Failed,
}

impl LocatorStep {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::AcquiringPosition | Self::ResolvingAddress)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Snapshot of the pipeline, this is everything the UI gets to see.
///
/// `Completed` always has a location and an address, `Failed` always has an error and may still
/// have the location if resolving the address was what failed.
pub struct LocatorState {
    run: Option<RunId>,
    step: LocatorStep,
    location: Option<Location>,
    address: Option<Address>,
    error: Option<LocateError>,
}

impl LocatorState {
    fn begin(run: RunId) -> Self {
        Self {
            run: Some(run),
            step: LocatorStep::AcquiringPosition,
            ..Default::default()
        }
    }

    fn set_location(&mut self, location: Location) {
        self.location = Some(location);
        self.step = LocatorStep::ResolvingAddress;
    }

    fn complete(&mut self, address: Address) {
        self.address = Some(address);
        self.error = None;
        self.step = LocatorStep::Completed;
    }

    fn fail(&mut self, error: LocateError) {
        self.address = None;
        self.error = Some(error);
        self.step = LocatorStep::Failed;
    }

    pub fn run(&self) -> Option<RunId> {
        self.run
    }

    pub fn step(&self) -> LocatorStep {
        self.step
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn error(&self) -> Option<&LocateError> {
        self.error.as_ref()
    }
}

/// Resolves "where am I" in one shot: gets a fix from [LocationService], then looks up the
/// address with [Geocoder].
///
/// Every transition is applied under one write lock and followed by a
/// [StateUpdateSender::send_update], readers use [Locator::get_state] to get the new snapshot.
/// Starting a run replaces the previous one; anything the old run finishes afterwards is
/// dropped instead of being applied.
pub struct Locator<L: LocationService, G: Geocoder, S: StateUpdateSender> {
    state: RwLock<LocatorState>,
    location: L,
    geocoder: G,
    api_key: Arc<str>,
    state_update_sender: S,
}

impl<L: LocationService, G: Geocoder, S: StateUpdateSender> Locator<L, G, S> {
    pub fn new(
        location: L,
        geocoder: G,
        api_key: impl Into<Arc<str>>,
        state_update_sender: S,
    ) -> Self {
        Self {
            state: RwLock::new(LocatorState::default()),
            location,
            geocoder,
            api_key: api_key.into(),
            state_update_sender,
        }
    }

    pub async fn get_state(&self) -> LocatorState {
        self.state.read().await.clone()
    }

    async fn begin_run(&self) -> RunId {
        let run = Uuid::new_v4();
        let mut state = self.state.write().await;
        if let (Some(prev), true) = (state.run, state.step.is_busy()) {
            info!("Run {prev} superseded by {run}");
        } else {
            info!("Starting run {run}");
        }
        *state = LocatorState::begin(run);
        drop(state);
        self.state_update_sender.send_update();
        run
    }

    /// Apply `f` only if `run` is still the current run.
    /// Returns whether it was applied.
    async fn update_run(&self, run: RunId, f: impl FnOnce(&mut LocatorState)) -> bool {
        let mut state = self.state.write().await;
        if state.run != Some(run) {
            debug!("Discarding outcome of superseded run {run}");
            return false;
        }
        f(&mut state);
        drop(state);
        self.state_update_sender.send_update();
        true
    }

    async fn drive(&self, run: RunId) {
        let location = match acquire_position(&self.location).await {
            Ok(location) => location,
            Err(why) => {
                warn!("Could not get position: {why}");
                self.update_run(run, |state| state.fail(why.into())).await;
                return;
            }
        };

        if !self
            .update_run(run, |state| state.set_location(location))
            .await
        {
            return;
        }

        match resolve_address(&self.geocoder, &location, &self.api_key).await {
            Ok(address) => {
                info!("Run {run} resolved to {}", address.full_address);
                self.update_run(run, |state| state.complete(address)).await;
            }
            Err(why) => {
                warn!("Could not resolve address: {why}");
                self.update_run(run, |state| state.fail(why.into())).await;
            }
        }
    }

    /// Run the whole pipeline in place and return the final snapshot
    pub async fn locate(&self) -> LocatorState {
        let run = self.begin_run().await;
        self.drive(run).await;
        self.get_state().await
    }
}

impl<L, G, S> Locator<L, G, S>
where
    L: LocationService + 'static,
    G: Geocoder + 'static,
    S: StateUpdateSender + Send + Sync + 'static,
{
    /// Start a fresh run in the background, superseding any run in progress.
    /// The handle resolves once the run has applied (or dropped) its outcome.
    pub async fn start(self: &Arc<Self>) -> (RunId, JoinHandle<()>) {
        let run = self.begin_run().await;
        let locator = self.clone();
        let handle = tokio::spawn(async move {
            locator.drive(run).await;
        });
        (run, handle)
    }
}
