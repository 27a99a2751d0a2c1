use reqwest::Url;

use whereami_logic::{Location, prelude::*};

const EMBED_URL: &str = "https://www.google.com/maps/embed/v1/place";
const SEARCH_URL: &str = "https://www.google.com/maps/search/";

const ZOOM: u8 = 16;
const ACCURACY_RADIUS_METERS: f64 = 40.0;

/// What the map needs to show a resolved location: a marker at the fix and a circle around it
pub struct MapView {
    center: Location,
    api_key: String,
}

impl MapView {
    pub fn new(center: Location, api_key: &str) -> Self {
        Self {
            center,
            api_key: api_key.to_string(),
        }
    }

    pub fn center(&self) -> &Location {
        &self.center
    }

    pub fn zoom(&self) -> u8 {
        ZOOM
    }

    pub fn marker_title(&self) -> &'static str {
        "You are here"
    }

    pub fn accuracy_radius(&self) -> f64 {
        ACCURACY_RADIUS_METERS
    }

    fn query(&self) -> String {
        format!("{:.6},{:.6}", self.center.lat, self.center.long)
    }

    /// Embeddable map URL, includes the API key
    pub fn embed_url(&self) -> Result<Url> {
        Url::parse_with_params(
            EMBED_URL,
            &[
                ("key", self.api_key.as_str()),
                ("q", self.query().as_str()),
                ("zoom", ZOOM.to_string().as_str()),
            ],
        )
        .context("Failed to build map embed URL")
    }

    /// Plain link to the location, safe to show since it has no key
    pub fn link_url(&self) -> Result<Url> {
        Url::parse_with_params(SEARCH_URL, &[("api", "1"), ("query", self.query().as_str())])
            .context("Failed to build map link")
    }

    /// An `<iframe>` snippet showing the map
    pub fn iframe_html(&self) -> Result<String> {
        let url = self.embed_url()?;
        Ok(format!(
            r#"<iframe title="{}" width="600" height="450" style="border:0" loading="lazy" allowfullscreen src="{url}"></iframe>"#,
            self.marker_title()
        ))
    }
}
