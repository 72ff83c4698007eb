use serde::Deserialize;

use crate::{Location, PlaceNames};

#[derive(Copy, Clone, Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct StreetViewMetadata {
    pub status: Box<str>,
    pub location: Option<LatLng>,
}

impl StreetViewMetadata {
    /// The panorama location if imagery is available.
    pub fn panorama(&self, heading: u16) -> Option<Location> {
        if !self.status.eq_ignore_ascii_case("ok") {
            return None;
        }

        self.location
            .map(|LatLng { lat, lng }| Location::new(lat, lng).with_heading(heading))
    }
}

#[derive(Debug, Deserialize)]
pub struct ReverseGeocode {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
pub struct AddressComponent {
    pub long_name: Box<str>,
    pub types: Vec<Box<str>>,
}

impl ReverseGeocode {
    pub fn place_names(&self) -> PlaceNames {
        let components = self
            .results
            .first()
            .map_or(&[][..], |result| result.address_components.as_slice());

        let find = |kind: &str| {
            components
                .iter()
                .find(|component| component.types.iter().any(|ty| ty.as_ref() == kind))
                .map(|component| component.long_name.clone())
        };

        PlaceNames {
            country: find("country"),
            area: find("administrative_area_level_1"),
            sub_area: find("political"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_names_from_components() {
        let json = r#"{
            "results": [{
                "address_components": [
                    { "long_name": "4", "types": ["street_number"] },
                    { "long_name": "Shibuya", "types": ["locality", "political"] },
                    { "long_name": "Tokyo", "types": ["administrative_area_level_1", "political"] },
                    { "long_name": "Japan", "types": ["country", "political"] }
                ]
            }]
        }"#;

        let geocode: ReverseGeocode = serde_json::from_str(json).unwrap();
        let names = geocode.place_names();

        assert_eq!(names.sub_area.as_deref(), Some("Shibuya"));
        assert_eq!(names.area.as_deref(), Some("Tokyo"));
        assert_eq!(names.country.as_deref(), Some("Japan"));
    }

    #[test]
    fn missing_components_stay_unset() {
        let geocode: ReverseGeocode = serde_json::from_str(r#"{"results":[]}"#).unwrap();

        assert_eq!(geocode.place_names(), PlaceNames::default());
    }

    #[test]
    fn metadata_without_imagery() {
        let json = r#"{"status":"ZERO_RESULTS"}"#;
        let metadata: StreetViewMetadata = serde_json::from_str(json).unwrap();
        assert!(metadata.panorama(0).is_none());

        let json = r#"{"status":"OK","location":{"lat":1.5,"lng":2.5}}"#;
        let metadata: StreetViewMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(
            metadata.panorama(180),
            Some(Location::new(1.5, 2.5).with_heading(180))
        );
    }
}
