use serde::{Deserialize, Serialize};

use crate::geocode::{AddressComponent, Candidate};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// A human-readable address built from the best geocoding candidate. Any component the provider
/// didn't report is left empty.
pub struct Address {
    pub full_address: String,
    pub street_number: String,
    pub street_name: String,
    pub neighborhood: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub postal_code: String,
    /// Provider specific ID for this place
    pub place_id: String,
}

const STREET_NUMBER: &[&str] = &["street_number"];
const STREET_NAME: &[&str] = &["route"];
const NEIGHBORHOOD: &[&str] = &["neighborhood", "sublocality_level_1"];
const CITY: &[&str] = &["locality", "administrative_area_level_2"];
const REGION: &[&str] = &["administrative_area_level_1"];
const COUNTRY: &[&str] = &["country"];
const POSTAL_CODE: &[&str] = &["postal_code"];

/// Long name of the first component tagged with a type from `priority`, earlier types win
/// regardless of where their component sits in the list.
fn extract_component(components: &[AddressComponent], priority: &[&str]) -> String {
    priority
        .iter()
        .find_map(|ty| components.iter().find(|comp| comp.has_type(ty)))
        .map(|comp| comp.long_name.clone())
        .unwrap_or_default()
}

impl From<&Candidate> for Address {
    fn from(candidate: &Candidate) -> Self {
        let comps = candidate.address_components.as_slice();
        Self {
            full_address: candidate.formatted_address.clone(),
            street_number: extract_component(comps, STREET_NUMBER),
            street_name: extract_component(comps, STREET_NAME),
            neighborhood: extract_component(comps, NEIGHBORHOOD),
            city: extract_component(comps, CITY),
            region: extract_component(comps, REGION),
            country: extract_component(comps, COUNTRY),
            postal_code: extract_component(comps, POSTAL_CODE),
            place_id: candidate.place_id.clone(),
        }
    }
}

impl Address {
    /// Street number and name, whichever are known
    pub fn street(&self) -> String {
        join_present(&[&self.street_number, &self.street_name], " ")
    }

    pub fn city_country(&self) -> String {
        join_present(&[&self.city, &self.country], ", ")
    }
}

fn join_present(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(types: &[&str], long_name: &str) -> AddressComponent {
        AddressComponent {
            types: types.iter().map(|t| t.to_string()).collect(),
            long_name: long_name.to_string(),
            short_name: long_name.chars().take(2).collect(),
        }
    }

    fn candidate(components: Vec<AddressComponent>) -> Candidate {
        Candidate {
            formatted_address: "Somewhere".to_string(),
            address_components: components,
            place_id: "place-1".to_string(),
        }
    }

    #[test]
    fn test_extraction_order_independent() {
        let country = comp(&["country", "political"], "Wonderland");
        let city = comp(&["locality", "political"], "Oz");

        for comps in [
            vec![country.clone(), city.clone()],
            vec![city.clone(), country.clone()],
        ] {
            let addr = Address::from(&candidate(comps));
            assert_eq!(addr.country, "Wonderland");
            assert_eq!(addr.city, "Oz");
        }
    }

    #[test]
    fn test_city_falls_back_to_admin_area() {
        let addr = Address::from(&candidate(vec![comp(
            &["administrative_area_level_2"],
            "Santa Clara County",
        )]));
        assert_eq!(addr.city, "Santa Clara County");
    }

    #[test]
    fn test_locality_beats_admin_area_even_when_later() {
        let addr = Address::from(&candidate(vec![
            comp(&["administrative_area_level_2"], "Santa Clara County"),
            comp(&["locality"], "Mountain View"),
        ]));
        assert_eq!(addr.city, "Mountain View");
    }

    #[test]
    fn test_neighborhood_falls_back_to_sublocality() {
        let addr = Address::from(&candidate(vec![comp(
            &["sublocality_level_1", "sublocality"],
            "Brooklyn",
        )]));
        assert_eq!(addr.neighborhood, "Brooklyn");
    }

    #[test]
    fn test_partial_address_leaves_blanks() {
        let addr = Address::from(&candidate(vec![comp(&["country"], "Iceland")]));
        assert_eq!(addr.country, "Iceland");
        assert_eq!(addr.street_number, "");
        assert_eq!(addr.street_name, "");
        assert_eq!(addr.city, "");
        assert_eq!(addr.place_id, "place-1");
        assert_eq!(addr.street(), "");
        assert_eq!(addr.city_country(), "Iceland");
    }

    #[test]
    fn test_uses_long_name() {
        let addr = Address::from(&candidate(vec![comp(
            &["administrative_area_level_1", "political"],
            "California",
        )]));
        assert_eq!(addr.region, "California");
    }

    #[test]
    fn test_street_joins_number_and_name() {
        let addr = Address::from(&candidate(vec![
            comp(&["route"], "Amphitheatre Parkway"),
            comp(&["street_number"], "1600"),
        ]));
        assert_eq!(addr.street(), "1600 Amphitheatre Parkway");
    }
}
