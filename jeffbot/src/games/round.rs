use std::{future::Future, sync::Arc, time::Duration};

use jeffbot_model::GameId;
use parking_lot::Mutex;
use thiserror::Error;
use time::OffsetDateTime;
use twilight_model::id::{
    marker::{ChannelMarker, GuildMarker},
    Id,
};

use super::{normalize_guess, GameAnswer, GameConfig, SessionClock};

pub type SharedRound<A> = Arc<Mutex<Round<A>>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundState {
    /// Registered but the clock is not running yet.
    Pending,
    Active,
    Finished,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    Correct,
    Incorrect,
    /// The round is not accepting guesses.
    Rejected,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    #[error("round is no longer pending")]
    NotPending,
    #[error("round has no answer")]
    MissingAnswer,
}

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum ClueRejection {
    #[error("There is no game running")]
    NotActive,
    #[error("You already got all {max} clues, no more help from Jeff")]
    Exhausted { max: u8 },
    #[error("Too close to the end for a clue, the game is over in less than {} seconds", .window.as_secs())]
    TooLate { window: Duration },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClueGrant {
    /// Starts at 1.
    pub number: u8,
    pub extra: Duration,
    /// Time left after the extension.
    pub remaining: Duration,
}

/// A single round of a guessing game in one guild.
pub struct Round<A> {
    guild: Id<GuildMarker>,
    channel: Id<ChannelMarker>,
    config: GameConfig,
    state: RoundState,
    answer: Option<Arc<A>>,
    clock: Option<SessionClock>,
    started_at: Option<OffsetDateTime>,
    extra_duration: Duration,
    clue_count: u8,
    external_id: Option<GameId>,
}

impl<A: GameAnswer> Round<A> {
    pub fn new(guild: Id<GuildMarker>, channel: Id<ChannelMarker>, config: GameConfig) -> Self {
        Self {
            guild,
            channel,
            config,
            state: RoundState::Pending,
            answer: None,
            clock: None,
            started_at: None,
            extra_duration: Duration::ZERO,
            clue_count: 0,
            external_id: None,
        }
    }

    pub fn assign_answer(&mut self, answer: A) -> Result<Arc<A>, RoundError> {
        if self.state != RoundState::Pending {
            return Err(RoundError::NotPending);
        }

        let answer = Arc::new(answer);
        self.answer = Some(Arc::clone(&answer));

        Ok(answer)
    }

    /// Starts the clock; `on_timeout` is awaited once the round's time is up.
    pub fn start<F, Fut>(&mut self, on_timeout: F) -> Result<(), RoundError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.state != RoundState::Pending {
            return Err(RoundError::NotPending);
        } else if self.answer.is_none() {
            return Err(RoundError::MissingAnswer);
        }

        self.clock = Some(SessionClock::schedule(self.config.duration, on_timeout));
        self.started_at = Some(OffsetDateTime::now_utc());
        self.state = RoundState::Active;

        Ok(())
    }

    pub fn attempt(&mut self, guess: &str) -> AttemptOutcome {
        if self.state != RoundState::Active {
            return AttemptOutcome::Rejected;
        }

        let Some(guess) = normalize_guess(guess) else {
            return AttemptOutcome::Incorrect;
        };

        let correct = self
            .answer
            .as_deref()
            .map_or(false, |answer| answer.matches(&guess));

        if !correct {
            return AttemptOutcome::Incorrect;
        }

        self.finish();

        AttemptOutcome::Correct
    }

    /// Finishes an active round without a winner.
    ///
    /// Returns `false` if the round was already over.
    pub fn time_out(&mut self) -> bool {
        if self.state != RoundState::Active {
            return false;
        }

        self.finish();

        true
    }

    /// Finishes the round no matter its state, e.g. when preparing it failed.
    pub fn abandon(&mut self) {
        self.finish();
    }

    pub fn request_clue(&mut self) -> Result<ClueGrant, ClueRejection> {
        let clock = match (self.state, self.clock.as_ref()) {
            (RoundState::Active, Some(clock)) => clock,
            _ => return Err(ClueRejection::NotActive),
        };

        let GameConfig {
            clue_duration,
            max_clues,
            clue_window,
            ..
        } = self.config;

        if self.clue_count >= max_clues {
            return Err(ClueRejection::Exhausted { max: max_clues });
        } else if clock.remaining() <= clue_window {
            return Err(ClueRejection::TooLate {
                window: clue_window,
            });
        } else if !clock.extend(clue_duration) {
            return Err(ClueRejection::NotActive);
        }

        self.clue_count += 1;
        self.extra_duration += clue_duration;

        Ok(ClueGrant {
            number: self.clue_count,
            extra: clue_duration,
            remaining: clock.remaining(),
        })
    }

    fn finish(&mut self) {
        if let Some(ref clock) = self.clock {
            clock.cancel();
        }

        self.state = RoundState::Finished;
    }

    pub fn guild(&self) -> Id<GuildMarker> {
        self.guild
    }

    pub fn channel(&self) -> Id<ChannelMarker> {
        self.channel
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == RoundState::Finished
    }

    pub fn answer(&self) -> Option<Arc<A>> {
        self.answer.clone()
    }

    pub fn started_at(&self) -> Option<OffsetDateTime> {
        self.started_at
    }

    pub fn clue_count(&self) -> u8 {
        self.clue_count
    }

    /// Base duration plus every clue extension.
    pub fn total_duration(&self) -> Duration {
        self.config.duration + self.extra_duration
    }

    pub fn remaining(&self) -> Duration {
        self.clock
            .as_ref()
            .map_or(Duration::ZERO, SessionClock::remaining)
    }

    pub fn external_id(&self) -> Option<&GameId> {
        self.external_id.as_ref()
    }

    pub fn set_external_id(&mut self, id: GameId) {
        self.external_id = Some(id);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};

    use tokio::time::sleep;

    use super::*;
    use crate::games::clock::tests::assert_about;

    #[derive(Debug)]
    pub(crate) struct TestAnswer(pub &'static [&'static str]);

    impl GameAnswer for TestAnswer {
        fn acceptable_guesses(&self) -> Vec<&str> {
            self.0.to_vec()
        }
    }

    pub(crate) const TOKYO: &[&str] = &["tokyo", "kanto", "japan"];

    pub(crate) fn config() -> GameConfig {
        GameConfig {
            duration: Duration::from_secs(30),
            clue_duration: Duration::from_secs(30),
            max_clues: 3,
            clue_window: Duration::from_secs(10),
        }
    }

    pub(crate) fn pending_round(config: GameConfig) -> Round<TestAnswer> {
        Round::new(Id::new(1), Id::new(2), config)
    }

    fn active_round(config: GameConfig) -> Round<TestAnswer> {
        let mut round = pending_round(config);
        round.assign_answer(TestAnswer(TOKYO)).unwrap();
        round.start(|| async {}).unwrap();

        round
    }

    /// A round whose timeout finishes it, counting how often that happened.
    fn shared_active_round(config: GameConfig) -> (SharedRound<TestAnswer>, Arc<AtomicUsize>) {
        let timeouts = Arc::new(AtomicUsize::new(0));
        let round = Arc::new(Mutex::new(pending_round(config)));
        round.lock().assign_answer(TestAnswer(TOKYO)).unwrap();

        let on_timeout = {
            let round = Arc::clone(&round);
            let timeouts = Arc::clone(&timeouts);

            move || async move {
                if round.lock().time_out() {
                    timeouts.fetch_add(1, SeqCst);
                }
            }
        };

        round.lock().start(on_timeout).unwrap();

        (round, timeouts)
    }

    #[tokio::test(start_paused = true)]
    async fn pending_round_rejects_attempts() {
        let mut round = pending_round(config());

        assert_eq!(round.state(), RoundState::Pending);
        assert_eq!(round.attempt("tokyo"), AttemptOutcome::Rejected);
        assert_eq!(round.request_clue(), Err(ClueRejection::NotActive));
    }

    #[tokio::test(start_paused = true)]
    async fn start_requires_answer() {
        let mut round = pending_round(config());

        assert_eq!(round.start(|| async {}), Err(RoundError::MissingAnswer));
        assert_eq!(round.state(), RoundState::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn answer_only_assignable_while_pending() {
        let mut round = active_round(config());

        assert!(round.started_at().is_some());
        assert_eq!(
            round.assign_answer(TestAnswer(&["osaka"])).unwrap_err(),
            RoundError::NotPending
        );
        assert_eq!(round.start(|| async {}), Err(RoundError::NotPending));
    }

    #[tokio::test(start_paused = true)]
    async fn correct_guess_finishes_round() {
        let (round, timeouts) = shared_active_round(config());

        assert_eq!(round.lock().attempt("Japan"), AttemptOutcome::Correct);
        assert!(round.lock().is_finished());

        sleep(Duration::from_secs(60)).await;
        assert_eq!(timeouts.load(SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn incorrect_guess_keeps_round_active() {
        let mut round = active_round(config());

        assert_eq!(round.attempt("osaka"), AttemptOutcome::Incorrect);
        assert_eq!(round.attempt("   "), AttemptOutcome::Incorrect);
        assert_eq!(round.state(), RoundState::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn placeholder_guesses_never_win() {
        let mut round = pending_round(config());
        round.assign_answer(TestAnswer(&["None", "nowhere"])).unwrap();
        round.start(|| async {}).unwrap();

        assert_eq!(round.attempt("None"), AttemptOutcome::Incorrect);
        assert_eq!(round.attempt("none"), AttemptOutcome::Incorrect);
        assert_eq!(round.state(), RoundState::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn finished_round_rejects_everything() {
        let mut round = active_round(config());

        assert_eq!(round.attempt("kanto"), AttemptOutcome::Correct);

        for guess in ["kanto", "tokyo", "osaka"] {
            assert_eq!(round.attempt(guess), AttemptOutcome::Rejected);
        }

        assert_eq!(round.request_clue(), Err(ClueRejection::NotActive));
        assert_eq!(round.clue_count(), 0);
        assert!(!round.time_out());
        assert!(round.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_finishes_without_winner() {
        let (round, timeouts) = shared_active_round(config());

        sleep(Duration::from_secs(31)).await;

        assert_eq!(timeouts.load(SeqCst), 1);
        assert!(round.lock().is_finished());
        assert_eq!(round.lock().attempt("japan"), AttemptOutcome::Rejected);
        assert!(!round.lock().time_out());
    }

    #[tokio::test(start_paused = true)]
    async fn clue_extends_remaining_time() {
        let config = GameConfig {
            duration: Duration::from_secs(40),
            ..config()
        };
        let mut round = active_round(config);

        sleep(Duration::from_secs(28)).await;
        assert_about(round.remaining(), 12);

        let grant = round.request_clue().unwrap();

        assert_eq!(grant.number, 1);
        assert_eq!(round.clue_count(), 1);
        assert_about(grant.remaining, 42);
        assert_about(round.remaining(), 42);
        assert_eq!(round.total_duration(), Duration::from_secs(70));
    }

    #[tokio::test(start_paused = true)]
    async fn first_clue_doubles_fresh_round() {
        let mut round = active_round(config());

        assert_about(round.remaining(), 30);

        let grant = round.request_clue().unwrap();

        assert_eq!(round.clue_count(), 1);
        assert_about(grant.remaining, 60);
    }

    #[tokio::test(start_paused = true)]
    async fn clue_rejected_near_the_end() {
        let mut round = active_round(config());

        sleep(Duration::from_secs(22)).await;
        assert_about(round.remaining(), 8);

        let window = Duration::from_secs(10);
        let rejection = round.request_clue().unwrap_err();
        assert_eq!(rejection, ClueRejection::TooLate { window });
        assert_eq!(
            rejection.to_string(),
            "Too close to the end for a clue, the game is over in less than 10 seconds"
        );
        assert_eq!(round.clue_count(), 0);
        assert_about(round.remaining(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn clues_are_capped() {
        let mut round = active_round(config());

        for number in 1..=3 {
            assert_eq!(round.request_clue().unwrap().number, number);
        }

        assert_eq!(
            round.request_clue(),
            Err(ClueRejection::Exhausted { max: 3 })
        );
        assert_eq!(round.clue_count(), 3);
        assert_about(round.remaining(), 120);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_attempts_finish_once() {
        for _ in 0..50 {
            let (round, _) = shared_active_round(config());

            let tasks = ["japan", "osaka", "tokyo"].map(|guess| {
                let round = Arc::clone(&round);

                tokio::spawn(async move { round.lock().attempt(guess) })
            });

            let mut correct = 0;

            for task in tasks {
                if task.await.unwrap() == AttemptOutcome::Correct {
                    correct += 1;
                }
            }

            assert_eq!(correct, 1);
            assert!(round.lock().is_finished());
        }
    }
}
