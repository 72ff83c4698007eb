use std::time::Duration;

pub use self::{
    clock::SessionClock,
    dispatch::Dispatch,
    hub::{GameHub, StartError},
    registry::{AlreadyActive, RoundRegistry},
    round::{
        AttemptOutcome, ClueGrant, ClueRejection, Round, RoundError, RoundState, SharedRound,
    },
    variant::{normalize_guess, Clue, GameAnswer, GameVariant},
};

pub mod geo;
pub mod wtp;

mod clock;
mod dispatch;
mod hub;
mod registry;
mod round;
mod variant;

/// Timing rules of a game variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Base round duration before any clue extensions.
    pub duration: Duration,
    /// Time added to the round for each clue.
    pub clue_duration: Duration,
    pub max_clues: u8,
    /// Clues are refused once no more than this much time remains.
    pub clue_window: Duration,
}

impl GameConfig {
    pub const GEOSNIFF: Self = Self {
        duration: Duration::from_secs(90),
        clue_duration: Duration::from_secs(30),
        max_clues: 3,
        clue_window: Duration::from_secs(10),
    };

    pub const WTP: Self = Self {
        duration: Duration::from_secs(30),
        clue_duration: Duration::from_secs(10),
        max_clues: 3,
        clue_window: Duration::from_secs(10),
    };
}
