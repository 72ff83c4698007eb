use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::Location;

/// Random starting area handed out by the GeoSniff API.
#[derive(Copy, Clone, Debug, Deserialize)]
pub struct CityCenter {
    pub lat: f64,
    #[serde(rename = "long")]
    pub lng: f64,
    pub radius: f64,
}

impl CityCenter {
    pub fn location(&self) -> Location {
        Location::new(self.lat, self.lng)
    }
}

/// Identifier of a recorded game; the API hands out numbers or strings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GameId {
    Number(u64),
    Text(Box<str>),
}

impl Display for GameId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Number(id) => Display::fmt(id, f),
            Self::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame<'a> {
    pub game_name: &'a str,
    pub discord_id: u64,
    pub correct_answer: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessRecord<'a> {
    pub game_id: &'a GameId,
    pub discord_id: u64,
    pub attempt: &'a str,
    pub correct: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LeaderboardEntry {
    pub name: Box<str>,
    pub played: u32,
    pub won: u32,
    pub points: i64,
}
