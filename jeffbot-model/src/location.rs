use std::{
    f64::consts::PI,
    fmt::{Display, Formatter, Result as FmtResult},
};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Mean earth radius used for great-circle distances.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Equatorial earth radius used when offsetting coordinates.
const EARTH_RADIUS_OFFSET_KM: f64 = 6378.0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub heading: u16,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            heading: 0,
        }
    }

    /// Same coordinates, looking into the given direction.
    pub fn with_heading(self, heading: u16) -> Self {
        Self {
            heading: heading % 360,
            ..self
        }
    }

    /// Great-circle distance in kilometers through the haversine formula.
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat_a = self.lat.to_radians();
        let lat_b = other.lat.to_radians();
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// A uniformly distributed random point within `radius_km` around `self`.
    ///
    /// The heading is kept.
    pub fn random_within<R: Rng>(&self, radius_km: f64, rng: &mut R) -> Self {
        let angle = rng.gen::<f64>() * 2.0 * PI;
        let distance = radius_km * rng.gen::<f64>().sqrt();

        let dx = distance * angle.cos();
        let dy = distance * angle.sin();

        let lat = self.lat + (dx / EARTH_RADIUS_OFFSET_KM) * (180.0 / PI);
        let lng = self.lng
            + (dy / EARTH_RADIUS_OFFSET_KM) * (180.0 / PI) / (self.lat * PI / 180.0).cos();

        Self {
            lat,
            lng,
            heading: self.heading,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// Administrative names of a place, each of them optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaceNames {
    pub country: Option<Box<str>>,
    pub area: Option<Box<str>>,
    pub sub_area: Option<Box<str>>,
}

impl PlaceNames {
    /// Names from most to least specific, skipping unknown ones.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [&self.sub_area, &self.area, &self.country]
            .into_iter()
            .filter_map(Option::as_deref)
    }
}

impl Display for PlaceNames {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut names = self.iter();

        match names.next() {
            Some(name) => f.write_str(name)?,
            None => return f.write_str("Somewhere unknown"),
        }

        for name in names {
            write!(f, ", {name}")?;
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Place {
    pub location: Location,
    pub names: PlaceNames,
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn tokyo_to_osaka() {
        let tokyo = Location::new(35.6762, 139.6503);
        let osaka = Location::new(34.6937, 135.5023);

        let distance = tokyo.distance_km(&osaka);
        assert!((390.0..405.0).contains(&distance), "distance={distance}");
        assert!((osaka.distance_km(&tokyo) - distance).abs() < 1e-9);
        assert!(tokyo.distance_km(&tokyo) < 1e-9);
    }

    #[test]
    fn random_points_stay_within_radius() {
        let mut rng = StdRng::seed_from_u64(42);
        let origin = Location::new(48.8566, 2.3522).with_heading(90);

        for _ in 0..1000 {
            let point = origin.random_within(3.0, &mut rng);

            assert!(origin.distance_km(&point) <= 3.0 * 1.01);
            assert_eq!(point.heading, 90);
        }
    }

    #[test]
    fn heading_wraps() {
        assert_eq!(Location::new(0.0, 0.0).with_heading(450).heading, 90);
        assert_eq!(Location::new(0.0, 0.0).with_heading(360).heading, 0);
    }

    #[test]
    fn place_names_display() {
        let names = PlaceNames {
            country: Some("Japan".into()),
            area: Some("Tokyo".into()),
            sub_area: Some("Shibuya".into()),
        };

        assert_eq!(names.to_string(), "Shibuya, Tokyo, Japan");

        let partial = PlaceNames {
            country: Some("Japan".into()),
            ..Default::default()
        };

        assert_eq!(partial.to_string(), "Japan");
        assert_eq!(PlaceNames::default().to_string(), "Somewhere unknown");
    }
}
