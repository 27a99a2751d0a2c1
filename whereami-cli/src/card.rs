use serde::Serialize;
use whereami_geocoding::MapView;
use whereami_logic::{Address, Location};

use crate::Result;

const BLANK: &str = "—";

fn or_blank(value: String) -> String {
    if value.is_empty() {
        BLANK.to_string()
    } else {
        value
    }
}

/// One line with the coordinates and accuracy of a fix
pub fn render_coords(location: &Location) -> String {
    format!(
        "LAT {:.6}°  LNG {:.6}°  ±ACCURACY {} m",
        location.lat,
        location.long,
        location.accuracy.round() as i64
    )
}

/// Location card for a completed run
pub fn render(address: &Address, location: &Location, map: &MapView) -> Result<String> {
    let lines = [
        "LOCATION RESOLVED".to_string(),
        address.full_address.clone(),
        String::new(),
        format!("{:<16}{}", "STREET", or_blank(address.street())),
        format!("{:<16}{}", "CITY / COUNTRY", or_blank(address.city_country())),
        String::new(),
        render_coords(location),
        format!(
            "{:<16}{} (zoom {}, {} m circle)",
            "MAP",
            map.link_url()?,
            map.zoom(),
            map.accuracy_radius()
        ),
    ];
    Ok(lines.join("\n"))
}

/// The map in JSON output. Leaves out the API key, use `--embed` for a keyed URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSummary {
    pub lat: f64,
    pub long: f64,
    pub zoom: u8,
    pub marker_title: &'static str,
    /// Meters
    pub accuracy_radius: f64,
    pub link: String,
}

impl MapSummary {
    pub fn new(map: &MapView) -> Result<Self> {
        let center = map.center();
        Ok(Self {
            lat: center.lat,
            long: center.long,
            zoom: map.zoom(),
            marker_title: map.marker_title(),
            accuracy_radius: map.accuracy_radius(),
            link: map.link_url()?.to_string(),
        })
    }
}
