use std::borrow::Cow;

use async_trait::async_trait;
use eyre::Result;
use jeffbot_model::GameId;
use jeffbot_util::CowUtils;
use twilight_model::{
    http::attachment::Attachment,
    id::{marker::UserMarker, Id},
};

use super::GameConfig;

/// Placeholder some data sources use for a missing name.
const MISSING: &str = "none";

/// Trims and lowercases a guess.
///
/// Returns `None` for guesses that can never be correct, i.e. empty ones
/// and the literal placeholder `none`.
pub fn normalize_guess(raw: &str) -> Option<Cow<'_, str>> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return None;
    }

    let lowered = trimmed.cow_to_lowercase();

    (lowered != MISSING).then_some(lowered)
}

/// The solution of a round.
pub trait GameAnswer: Send + Sync + 'static {
    /// Every name that counts as a correct guess.
    fn acceptable_guesses(&self) -> Vec<&str>;

    /// Whether an already normalized guess matches any acceptable name.
    fn matches(&self, guess: &str) -> bool {
        self.acceptable_guesses()
            .into_iter()
            .filter_map(normalize_guess)
            .any(|accepted| accepted == guess)
    }
}

/// A hint handed out on request.
pub struct Clue {
    pub content: String,
    pub attachments: Vec<Attachment>,
}

impl Clue {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            attachments: Vec::new(),
        }
    }
}

/// Everything that differs between two guessing games.
///
/// The round lifecycle itself is shared, see [`GameHub`](super::GameHub).
#[async_trait]
pub trait GameVariant: Send + Sync + 'static {
    type Answer: GameAnswer;

    /// Used for logging and as game name in external records.
    const NAME: &'static str;

    /// Content of the message that announces a new round.
    const TITLE: &'static str;

    /// Sent while the answer is being fetched.
    const PREPARING: Option<&'static str> = None;

    const ALREADY_RUNNING: &'static str = "There is already a game in progress!";
    const NOTHING_TO_GUESS: &'static str = "There is no game to guess on!";

    fn config(&self) -> &GameConfig;

    async fn fetch_answer(&self) -> Result<Self::Answer>;

    /// Attachments for the start of a round or, with `reveal`, its end.
    async fn render(&self, answer: &Self::Answer, reveal: bool) -> Result<Vec<Attachment>>;

    /// Announcement text once the round is over.
    fn summary(&self, answer: &Self::Answer) -> String;

    /// The `number`-th clue of a round, starting at 1.
    async fn clue(&self, _answer: &Self::Answer, _number: u8) -> Result<Option<Clue>> {
        Ok(None)
    }

    async fn record_start(
        &self,
        _user: Id<UserMarker>,
        _answer: &Self::Answer,
    ) -> Result<Option<GameId>> {
        Ok(None)
    }

    async fn record_attempt(
        &self,
        _game: &GameId,
        _user: Id<UserMarker>,
        _guess: &str,
        _correct: bool,
    ) -> Result<()> {
        Ok(())
    }

    async fn record_end(&self, _game: &GameId) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Names(&'static [&'static str]);

    impl GameAnswer for Names {
        fn acceptable_guesses(&self) -> Vec<&str> {
            self.0.to_vec()
        }
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_guess("  Tokyo ").as_deref(), Some("tokyo"));
        assert_eq!(normalize_guess("ÖSTERREICH").as_deref(), Some("österreich"));
        assert_eq!(normalize_guess("   "), None);
    }

    #[test]
    fn placeholder_never_matches() {
        assert_eq!(normalize_guess("None"), None);
        assert_eq!(normalize_guess("none"), None);

        let answer = Names(&["None", "japan"]);
        assert!(!answer.matches("none"));
        assert!(answer.matches("japan"));
    }

    #[test]
    fn matches_any_acceptable_name() {
        let answer = Names(&["Tokyo", "Kanto", "Japan"]);

        for guess in ["tokyo", "kanto", "japan"] {
            assert!(answer.matches(guess), "{guess}");
        }

        assert!(!answer.matches("osaka"));
    }
}
