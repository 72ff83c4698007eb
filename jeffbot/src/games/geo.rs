use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use futures::future::try_join_all;
use jeffbot_client::Client;
use jeffbot_model::{GameId, GuessRecord, Location, NewGame, Place};
use rand::Rng;
use twilight_model::{
    http::attachment::Attachment,
    id::{marker::UserMarker, Id},
};

use super::{Clue, GameAnswer, GameConfig, GameVariant};

/// Random probes per radius before the radius grows.
const PROBES_PER_RADIUS: usize = 50;
const RADIUS_GROWTHS: usize = 5;
const RADIUS_GROWTH_FACTOR: f64 = 3.0;
const MAX_CITIES: usize = 5;

/// Radius around the answer for the first clue; later clues get closer.
const CLUE_RADIUS_KM: f64 = 5.0;

/// Amount of street view images per round, evenly spread around.
const VIEWS: u16 = 4;

impl GameAnswer for Place {
    fn acceptable_guesses(&self) -> Vec<&str> {
        self.names.iter().collect()
    }
}

/// Guess the region of a random street view location.
pub struct GeoSniff {
    config: GameConfig,
    client: Arc<Client>,
}

impl GeoSniff {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            config: GameConfig::GEOSNIFF,
            client,
        }
    }

    /// Probes random points around `origin` until one has street view coverage.
    async fn find_coverage(
        &self,
        origin: &Location,
        mut radius: f64,
        growths: usize,
    ) -> Result<Option<Location>> {
        for probe in 1..=PROBES_PER_RADIUS * (growths + 1) {
            let candidate = origin.random_within(radius, &mut rand::thread_rng());

            if let Some(location) = self.client.street_view_metadata(&candidate).await? {
                debug!(%origin, %location, probe, "Found street view coverage");

                return Ok(Some(location));
            }

            if probe % PROBES_PER_RADIUS == 0 {
                radius *= RADIUS_GROWTH_FACTOR;
                trace!(%origin, radius, "Growing search radius");
            }
        }

        Ok(None)
    }

    async fn view(&self, location: Location, filename: String) -> Result<Attachment> {
        let bytes = self
            .client
            .street_view_image(&location)
            .await
            .wrap_err("Failed to get street view image")?;

        Ok(Attachment::from_bytes(filename, bytes.to_vec(), 0))
    }
}

#[async_trait]
impl GameVariant for GeoSniff {
    type Answer = Place;

    const NAME: &'static str = "geosniff";
    const TITLE: &'static str = "**Where is Jeff?**";
    const PREPARING: Option<&'static str> = Some("Jeff is sniffing out a location...");

    fn config(&self) -> &GameConfig {
        &self.config
    }

    async fn fetch_answer(&self) -> Result<Place> {
        for _ in 0..MAX_CITIES {
            let city = self
                .client
                .geosniff_random_city()
                .await
                .wrap_err("Failed to get random city")?;

            let heading = rand::thread_rng().gen_range(0..360);
            let origin = city.location().with_heading(heading);

            let coverage = self
                .find_coverage(&origin, city.radius, RADIUS_GROWTHS)
                .await?;

            let Some(location) = coverage else {
                info!(%origin, "No street view coverage around city, trying another one");

                continue;
            };

            let names = self
                .client
                .reverse_geocode(&location)
                .await
                .wrap_err("Failed to reverse geocode location")?;

            // Nothing to guess on, e.g. in the middle of nowhere
            if names.iter().next().is_none() {
                info!(%location, "Location has no names, trying another city");

                continue;
            }

            info!(%location, %names, "Jeff found a location");

            return Ok(Place { location, names });
        }

        bail!("No street view coverage in {MAX_CITIES} random cities")
    }

    async fn render(&self, place: &Place, reveal: bool) -> Result<Vec<Attachment>> {
        // The reveal is textual only
        if reveal {
            return Ok(Vec::new());
        }

        let step = 360 / VIEWS;

        let views = (0..VIEWS).map(|i| {
            let location = place.location.with_heading(place.location.heading + i * step);

            self.view(location, format!("where-is-jeff-{i}.jpg"))
        });

        try_join_all(views).await
    }

    fn summary(&self, place: &Place) -> String {
        format!("Jeff was in **{}**", place.names)
    }

    async fn clue(&self, place: &Place, number: u8) -> Result<Option<Clue>> {
        let radius = CLUE_RADIUS_KM / f64::from(number.max(1));
        let heading = rand::thread_rng().gen_range(0..360);
        let origin = place.location.with_heading(heading);

        let Some(spot) = self.find_coverage(&origin, radius, 0).await? else {
            let clue = Clue::text("Jeff sniffed around but couldn't find another view nearby");

            return Ok(Some(clue));
        };

        let distance = place.location.distance_km(&spot);
        let view = self.view(spot, "jeff-wandered-off.jpg".to_owned()).await?;

        let clue = Clue {
            content: format!(
                "Jeff wandered off, this is **{distance:.2} km** away from where he was"
            ),
            attachments: vec![view],
        };

        Ok(Some(clue))
    }

    async fn record_start(&self, user: Id<UserMarker>, place: &Place) -> Result<Option<GameId>> {
        let correct_answer = place.names.to_string();

        let game = NewGame {
            game_name: Self::NAME,
            discord_id: user.get(),
            correct_answer: &correct_answer,
        };

        let id = self
            .client
            .geosniff_create_game(&game)
            .await
            .wrap_err("Failed to create game")?;

        Ok(Some(id))
    }

    async fn record_attempt(
        &self,
        game: &GameId,
        user: Id<UserMarker>,
        guess: &str,
        correct: bool,
    ) -> Result<()> {
        let record = GuessRecord {
            game_id: game,
            discord_id: user.get(),
            attempt: guess,
            correct,
        };

        self.client
            .geosniff_record_guess(&record)
            .await
            .wrap_err("Failed to record guess")
    }

    async fn record_end(&self, game: &GameId) -> Result<()> {
        self.client
            .geosniff_end_game(game)
            .await
            .wrap_err("Failed to end game")
    }
}
