use bytes::Bytes;
use eyre::{Result, WrapErr};
use jeffbot_model::{Location, PlaceNames, ReverseGeocode, StreetViewMetadata};

use crate::{Client, Site};

const STREET_VIEW_URL: &str = "https://maps.googleapis.com/maps/api/streetview";
const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

impl Client {
    fn street_view_params(&self, location: &Location) -> String {
        format!(
            "size=640x640&location={lat},{lng}&fov=100&heading={heading}&pitch=0&key={key}",
            lat = location.lat,
            lng = location.lng,
            heading = location.heading,
            key = self.google_token,
        )
    }

    /// Snapped panorama location if street view has imagery near `location`.
    pub async fn street_view_metadata(&self, location: &Location) -> Result<Option<Location>> {
        let url = format!(
            "{STREET_VIEW_URL}/metadata?{}",
            self.street_view_params(location)
        );

        let bytes = self
            .make_get_request(url, Site::StreetView)
            .await
            .wrap_err_with(|| format!("Failed to get street view metadata for {location}"))?;

        let metadata: StreetViewMetadata = serde_json::from_slice(&bytes).wrap_err_with(|| {
            let body = String::from_utf8_lossy(&bytes);

            format!("Failed to deserialize street view metadata: {body}")
        })?;

        Ok(metadata.panorama(location.heading))
    }

    pub async fn street_view_image(&self, location: &Location) -> Result<Bytes> {
        let url = format!("{STREET_VIEW_URL}?{}", self.street_view_params(location));

        self.make_get_request(url, Site::StreetView)
            .await
            .wrap_err_with(|| format!("Failed to get street view image for {location}"))
    }

    pub async fn reverse_geocode(&self, location: &Location) -> Result<PlaceNames> {
        let url = format!(
            "{GEOCODE_URL}?latlng={lat},{lng}&key={key}",
            lat = location.lat,
            lng = location.lng,
            key = self.google_token,
        );

        let bytes = self.make_get_request(url, Site::Geocode).await?;

        let geocode: ReverseGeocode = serde_json::from_slice(&bytes).wrap_err_with(|| {
            let body = String::from_utf8_lossy(&bytes);

            format!("Failed to deserialize reverse geocode: {body}")
        })?;

        Ok(geocode.place_names())
    }
}
