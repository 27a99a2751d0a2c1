use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use chrono::{TimeDelta, Utc};
use tokio::sync::oneshot;

use crate::{
    AddressComponent, Candidate, GeocodeError, GeocodeResponse, Geocoder, Location,
    LocationService, PositionError, PositionOptions, StateUpdateSender,
};

pub struct MockLocation {
    available: bool,
    stale: bool,
    reading: Result<(f64, f64, f64), PositionError>,
}

impl MockLocation {
    pub fn at(lat: f64, long: f64, accuracy: f64) -> Self {
        Self {
            available: true,
            stale: false,
            reading: Ok((lat, long, accuracy)),
        }
    }

    /// Hands back a fix taken a minute ago
    pub fn cached(lat: f64, long: f64, accuracy: f64) -> Self {
        Self {
            stale: true,
            ..Self::at(lat, long, accuracy)
        }
    }

    pub fn failing(err: PositionError) -> Self {
        Self {
            available: true,
            stale: false,
            reading: Err(err),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::failing(PositionError::unknown())
        }
    }
}

impl LocationService for MockLocation {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn current_position(&self, _options: PositionOptions) -> Result<Location, PositionError> {
        let (lat, long, accuracy) = self.reading.clone()?;
        let mut location = Location::new(lat, long, accuracy);
        if self.stale {
            location.timestamp = Utc::now() - TimeDelta::minutes(1);
        }
        Ok(location)
    }
}

/// Never produces a fix
pub struct PendingLocation;

impl LocationService for PendingLocation {
    async fn current_position(&self, _options: PositionOptions) -> Result<Location, PositionError> {
        std::future::pending().await
    }
}

/// Holds its first request until released, later requests get a fix straight away
pub struct GatedLocation {
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    reading: (f64, f64, f64),
    calls: AtomicUsize,
}

impl GatedLocation {
    pub fn new(lat: f64, long: f64, accuracy: f64) -> (Self, oneshot::Sender<()>) {
        let (release, gate) = oneshot::channel();
        let location = Self {
            gate: Mutex::new(Some(gate)),
            reading: (lat, long, accuracy),
            calls: AtomicUsize::new(0),
        };
        (location, release)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LocationService for GatedLocation {
    async fn current_position(&self, _options: PositionOptions) -> Result<Location, PositionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.await.ok();
        }
        let (lat, long, accuracy) = self.reading;
        Ok(Location::new(lat, long, accuracy))
    }
}

type Reply = (Option<oneshot::Receiver<()>>, Result<GeocodeResponse, GeocodeError>);

/// Answers lookups from a queue of canned replies, optionally holding a reply until released
#[derive(Default)]
pub struct MockGeocoder {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, res: Result<GeocodeResponse, GeocodeError>) {
        self.replies.lock().unwrap().push_back((None, res));
    }

    pub fn reply_gated(
        &self,
        res: Result<GeocodeResponse, GeocodeError>,
        gate: oneshot::Receiver<()>,
    ) {
        self.replies.lock().unwrap().push_back((Some(gate), res));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for MockGeocoder {
    async fn lookup(
        &self,
        _location: &Location,
        _api_key: &str,
    ) -> Result<GeocodeResponse, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.replies.lock().unwrap().pop_front();
        let Some((gate, res)) = reply else {
            return Err(GeocodeError::unknown());
        };
        if let Some(gate) = gate {
            gate.await.ok();
        }
        res
    }
}

pub struct DummySender;

impl StateUpdateSender for DummySender {
    fn send_update(&self) {}
}

#[derive(Clone, Default)]
pub struct CountingSender(Arc<AtomicUsize>);

impl CountingSender {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl StateUpdateSender for CountingSender {
    fn send_update(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn component(types: &[&str], long_name: &str) -> AddressComponent {
    AddressComponent {
        types: types.iter().map(|t| t.to_string()).collect(),
        long_name: long_name.to_string(),
        short_name: long_name.to_string(),
    }
}

pub fn response_with_status(status: &str) -> GeocodeResponse {
    GeocodeResponse {
        status: status.to_string(),
        ..Default::default()
    }
}

/// A single OK candidate with only a formatted address
pub fn address_response(formatted_address: &str) -> GeocodeResponse {
    GeocodeResponse {
        status: "OK".to_string(),
        results: vec![Candidate {
            formatted_address: formatted_address.to_string(),
            ..Default::default()
        }],
        error_message: None,
    }
}

pub fn mountain_view_response() -> GeocodeResponse {
    GeocodeResponse {
        status: "OK".to_string(),
        results: vec![Candidate {
            formatted_address: "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA".to_string(),
            address_components: vec![
                component(&["locality", "political"], "Mountain View"),
                component(&["country", "political"], "USA"),
                component(&["postal_code"], "94043"),
            ],
            place_id: "ChIJj61dQgK6j4AR4GeTYWZsKWw".to_string(),
        }],
        error_message: None,
    }
}
