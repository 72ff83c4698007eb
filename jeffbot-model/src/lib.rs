mod creature;
mod geosniff;
mod google;
mod location;

pub use self::{
    creature::CreatureEntry,
    geosniff::{CityCenter, GameId, GuessRecord, LeaderboardEntry, NewGame},
    google::{AddressComponent, GeocodeResult, LatLng, ReverseGeocode, StreetViewMetadata},
    location::{Location, Place, PlaceNames},
};
