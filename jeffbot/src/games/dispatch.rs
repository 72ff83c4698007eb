use super::SharedRound;

/// What a start-or-guess command should do.
pub enum Dispatch<'g, A> {
    /// Starting was requested but a round is running.
    AlreadyRunning,
    /// A guess was given but no round is running.
    NothingToGuess,
    Guess {
        round: SharedRound<A>,
        guess: &'g str,
    },
    Start,
}

impl<'g, A> Dispatch<'g, A> {
    /// Blank guesses count as no guess at all.
    pub fn route(active: Option<SharedRound<A>>, guess: Option<&'g str>) -> Self {
        let guess = guess.map(str::trim).filter(|guess| !guess.is_empty());

        match (active, guess) {
            (Some(_), None) => Self::AlreadyRunning,
            (None, Some(_)) => Self::NothingToGuess,
            (Some(round), Some(guess)) => Self::Guess { round, guess },
            (None, None) => Self::Start,
        }
    }
}
