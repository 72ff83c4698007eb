use eyre::{Result, WrapErr};
use hyper::Method;
use jeffbot_model::{CityCenter, GameId, GuessRecord, LeaderboardEntry, NewGame};

use crate::{Client, Site};

impl Client {
    /// Random city center including a search radius in kilometers.
    pub async fn geosniff_random_city(&self) -> Result<CityCenter> {
        let bytes = self
            .make_get_request(&*self.geosniff_url, Site::GeoSniff)
            .await?;

        serde_json::from_slice(&bytes).wrap_err_with(|| {
            let body = String::from_utf8_lossy(&bytes);

            format!("Failed to deserialize random city: {body}")
        })
    }

    pub async fn geosniff_create_game(&self, game: &NewGame<'_>) -> Result<GameId> {
        let json = serde_json::to_vec(game).wrap_err("Failed to serialize new game")?;

        let bytes = self
            .make_json_request(Method::POST, &*self.geosniff_url, Site::GeoSniff, json)
            .await?;

        serde_json::from_slice(&bytes).wrap_err_with(|| {
            let body = String::from_utf8_lossy(&bytes);

            format!("Failed to deserialize game id: {body}")
        })
    }

    pub async fn geosniff_record_guess(&self, guess: &GuessRecord<'_>) -> Result<()> {
        let url = format!("{}/guess", self.geosniff_url);
        let json = serde_json::to_vec(guess).wrap_err("Failed to serialize guess")?;

        self.make_json_request(Method::POST, url, Site::GeoSniff, json)
            .await?;

        Ok(())
    }

    pub async fn geosniff_end_game(&self, game_id: &GameId) -> Result<()> {
        let url = format!("{}/{game_id}", self.geosniff_url);

        self.make_json_request(Method::PUT, url, Site::GeoSniff, Vec::new())
            .await?;

        Ok(())
    }

    pub async fn geosniff_leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let url = format!("{}/leaderboard", self.geosniff_url);
        let bytes = self.make_get_request(url, Site::GeoSniff).await?;

        serde_json::from_slice(&bytes).wrap_err_with(|| {
            let body = String::from_utf8_lossy(&bytes);

            format!("Failed to deserialize leaderboard: {body}")
        })
    }
}
