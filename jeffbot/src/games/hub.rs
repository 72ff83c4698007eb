use std::{future::Future, sync::Arc};

use eyre::{Report, Result, WrapErr};
use parking_lot::Mutex;
use thiserror::Error;
use twilight_model::id::{
    marker::{ChannelMarker, GuildMarker},
    Id,
};

use super::{
    AlreadyActive, AttemptOutcome, Clue, ClueGrant, ClueRejection, Dispatch, GameVariant, Round,
    RoundError, RoundRegistry, SharedRound,
};

#[derive(Debug, Error)]
pub enum StartError {
    #[error("a round is already running")]
    AlreadyRunning,
    #[error("failed to fetch an answer")]
    Fetch(Report),
    #[error(transparent)]
    Round(#[from] RoundError),
}

impl StartError {
    /// Keeps the cause of a failed fetch.
    pub fn into_report(self) -> Report {
        match self {
            Self::Fetch(report) => report.wrap_err("failed to fetch an answer"),
            other => Report::new(other),
        }
    }
}

/// A game variant together with the rounds currently played with it.
///
/// Every round transition that affects the registry goes through here so a
/// finished round is unregistered exactly once.
pub struct GameHub<V: GameVariant> {
    variant: V,
    rounds: RoundRegistry<V::Answer>,
}

impl<V: GameVariant> GameHub<V> {
    pub fn new(variant: V) -> Self {
        Self {
            variant,
            rounds: RoundRegistry::new(),
        }
    }

    pub fn variant(&self) -> &V {
        &self.variant
    }

    pub fn rounds(&self) -> &RoundRegistry<V::Answer> {
        &self.rounds
    }

    pub fn route<'g>(
        &self,
        guild: Id<GuildMarker>,
        guess: Option<&'g str>,
    ) -> Dispatch<'g, V::Answer> {
        Dispatch::route(self.rounds.get_active(guild), guess)
    }

    /// Registers a pending round so no other round can start in the guild.
    pub fn reserve(
        &self,
        guild: Id<GuildMarker>,
        channel: Id<ChannelMarker>,
    ) -> Result<SharedRound<V::Answer>, StartError> {
        let round = Round::new(guild, channel, *self.variant.config());
        let round = Arc::new(Mutex::new(round));

        self.rounds
            .register(&round)
            .map_err(|AlreadyActive(guild)| {
                debug!(game = V::NAME, %guild, "Guild already has a round");

                StartError::AlreadyRunning
            })?;

        Ok(round)
    }

    /// Fetches the answer of a reserved round.
    ///
    /// On failure the reservation is released.
    pub async fn prepare(
        &self,
        round: &SharedRound<V::Answer>,
    ) -> Result<Arc<V::Answer>, StartError> {
        let answer = match self.variant.fetch_answer().await {
            Ok(answer) => answer,
            Err(err) => {
                self.abandon(round);

                return Err(StartError::Fetch(err));
            }
        };

        let res = round.lock().assign_answer(answer);

        res.map_err(|err| {
            self.abandon(round);

            StartError::Round(err)
        })
    }

    pub fn start<F, Fut>(
        &self,
        round: &SharedRound<V::Answer>,
        on_timeout: F,
    ) -> Result<(), RoundError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        round.lock().start(on_timeout)
    }

    /// Drops a round that never got started.
    pub fn abandon(&self, round: &SharedRound<V::Answer>) {
        let guild = {
            let mut round = round.lock();
            round.abandon();

            round.guild()
        };

        self.rounds.unregister(guild, round);
    }

    pub fn attempt(&self, round: &SharedRound<V::Answer>, guess: &str) -> AttemptOutcome {
        let (outcome, guild) = {
            let mut round = round.lock();

            (round.attempt(guess), round.guild())
        };

        if outcome == AttemptOutcome::Correct {
            self.rounds.unregister(guild, round);
        }

        outcome
    }

    /// Returns `true` if the round was still running and is now over.
    pub fn time_out(&self, round: &SharedRound<V::Answer>) -> bool {
        let (timed_out, guild) = {
            let mut round = round.lock();

            (round.time_out(), round.guild())
        };

        if timed_out {
            self.rounds.unregister(guild, round);
        }

        timed_out
    }

    /// `None` if the guild has no running round.
    pub fn request_clue(
        &self,
        guild: Id<GuildMarker>,
    ) -> Option<Result<(SharedRound<V::Answer>, ClueGrant), ClueRejection>> {
        let round = self.rounds.get_active(guild)?;
        let res = round.lock().request_clue();

        Some(res.map(|grant| (round, grant)))
    }

    /// Produces the clue for a granted request.
    ///
    /// `None` if the round ended while the clue was being produced.
    pub async fn produce_clue(
        &self,
        round: &SharedRound<V::Answer>,
        grant: &ClueGrant,
    ) -> Result<Option<Clue>> {
        let Some(answer) = round.lock().answer() else {
            return Ok(None);
        };

        let clue = self
            .variant
            .clue(&answer, grant.number)
            .await
            .wrap_err("failed to produce clue")?
            .unwrap_or_else(|| Clue::text("Jeff has no clue for you"));

        if round.lock().is_finished() {
            debug!(game = V::NAME, number = grant.number, "Dropping clue of finished round");

            return Ok(None);
        }

        Ok(Some(clue))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicBool, AtomicUsize, Ordering::SeqCst},
        time::Duration,
    };

    use async_trait::async_trait;
    use eyre::Result;
    use tokio::time::sleep;
    use twilight_model::http::attachment::Attachment;

    use super::*;
    use crate::games::{
        round::tests::{config, TestAnswer, TOKYO},
        GameConfig, RoundState,
    };

    struct Tokyo {
        config: GameConfig,
        fail: AtomicBool,
        fetches: AtomicUsize,
    }

    impl Tokyo {
        fn new() -> Self {
            Self {
                config: config(),
                fail: AtomicBool::new(false),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GameVariant for Tokyo {
        type Answer = TestAnswer;

        const NAME: &'static str = "tokyo";
        const TITLE: &'static str = "Where?";

        fn config(&self) -> &GameConfig {
            &self.config
        }

        async fn fetch_answer(&self) -> Result<TestAnswer> {
            self.fetches.fetch_add(1, SeqCst);

            if self.fail.load(SeqCst) {
                bail!("no coverage");
            }

            Ok(TestAnswer(TOKYO))
        }

        async fn render(&self, _: &TestAnswer, _: bool) -> Result<Vec<Attachment>> {
            Ok(Vec::new())
        }

        fn summary(&self, _: &TestAnswer) -> String {
            "Tokyo".to_owned()
        }

        async fn clue(&self, _: &TestAnswer, number: u8) -> Result<Option<Clue>> {
            // Stands in for street view probing
            sleep(Duration::from_secs(5)).await;

            Ok(Some(Clue::text(format!("big city #{number}"))))
        }
    }

    fn guild() -> Id<GuildMarker> {
        Id::new(1)
    }

    async fn started(hub: &Arc<GameHub<Tokyo>>) -> SharedRound<TestAnswer> {
        let round = hub.reserve(guild(), Id::new(2)).unwrap();
        hub.prepare(&round).await.unwrap();

        let on_timeout = {
            let hub = Arc::clone(hub);
            let round = Arc::clone(&round);

            move || async move {
                hub.time_out(&round);
            }
        };

        hub.start(&round, on_timeout).unwrap();

        round
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_registers_nothing() {
        let hub = GameHub::new(Tokyo::new());
        hub.variant().fail.store(true, SeqCst);

        let round = hub.reserve(guild(), Id::new(2)).unwrap();
        assert!(matches!(hub.route(guild(), None), Dispatch::AlreadyRunning));

        let err = hub.prepare(&round).await.unwrap_err();

        assert!(matches!(err, StartError::Fetch(_)));
        assert_eq!(hub.rounds().len(), 0);
        assert!(matches!(hub.route(guild(), None), Dispatch::Start));
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_is_rejected_without_touching_the_first() {
        let hub = Arc::new(GameHub::new(Tokyo::new()));
        let round = started(&hub).await;

        assert!(matches!(
            hub.reserve(guild(), Id::new(3)),
            Err(StartError::AlreadyRunning)
        ));
        assert!(matches!(hub.route(guild(), None), Dispatch::AlreadyRunning));
        assert_eq!(round.lock().state(), RoundState::Active);
        assert_eq!(hub.variant().fetches.load(SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn correct_guess_frees_the_guild() {
        let hub = Arc::new(GameHub::new(Tokyo::new()));
        let round = started(&hub).await;

        assert_eq!(hub.attempt(&round, "osaka"), AttemptOutcome::Incorrect);
        assert_eq!(hub.rounds().len(), 1);

        assert_eq!(hub.attempt(&round, "TOKYO"), AttemptOutcome::Correct);
        assert_eq!(hub.rounds().len(), 0);
        assert!(matches!(
            hub.route(guild(), Some("tokyo")),
            Dispatch::NothingToGuess
        ));

        assert_eq!(hub.attempt(&round, "tokyo"), AttemptOutcome::Rejected);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_frees_the_guild() {
        let hub = Arc::new(GameHub::new(Tokyo::new()));
        let round = started(&hub).await;

        sleep(Duration::from_secs(31)).await;

        assert!(round.lock().is_finished());
        assert_eq!(hub.rounds().len(), 0);
        assert!(!hub.time_out(&round));
        assert!(matches!(hub.route(guild(), None), Dispatch::Start));
    }

    #[tokio::test(start_paused = true)]
    async fn clues_need_a_running_round() {
        let hub = Arc::new(GameHub::new(Tokyo::new()));
        assert!(hub.request_clue(guild()).is_none());

        let round = started(&hub).await;
        let (clued, grant) = hub.request_clue(guild()).unwrap().unwrap();

        assert!(Arc::ptr_eq(&round, &clued));
        assert_eq!(grant.number, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn guesses_count_as_soon_as_the_round_is_started() {
        let hub = Arc::new(GameHub::new(Tokyo::new()));

        // Started but nothing recorded externally yet
        let round = started(&hub).await;
        assert!(round.lock().external_id().is_none());

        let Dispatch::Guess { round: routed, guess } = hub.route(guild(), Some(" tokyo ")) else {
            panic!("guess was not routed to the running round");
        };

        assert!(Arc::ptr_eq(&round, &routed));
        assert_eq!(hub.attempt(&routed, guess), AttemptOutcome::Correct);
        assert_eq!(hub.rounds().len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_announcement_abandons_a_started_round() {
        let hub = Arc::new(GameHub::new(Tokyo::new()));
        let round = started(&hub).await;

        hub.abandon(&round);

        assert!(round.lock().is_finished());
        assert!(matches!(hub.route(guild(), None), Dispatch::Start));

        // The cancelled clock never times the round out
        sleep(Duration::from_secs(60)).await;
        assert!(!hub.time_out(&round));
    }

    #[tokio::test(start_paused = true)]
    async fn clue_is_produced_for_a_running_round() {
        let hub = Arc::new(GameHub::new(Tokyo::new()));
        let round = started(&hub).await;

        let (_, grant) = hub.request_clue(guild()).unwrap().unwrap();
        let clue = hub.produce_clue(&round, &grant).await.unwrap().unwrap();

        assert_eq!(clue.content, "big city #1");
    }

    #[tokio::test(start_paused = true)]
    async fn clue_of_a_round_won_meanwhile_is_dropped() {
        let hub = Arc::new(GameHub::new(Tokyo::new()));
        let round = started(&hub).await;

        let (_, grant) = hub.request_clue(guild()).unwrap().unwrap();

        let producing = {
            let hub = Arc::clone(&hub);
            let round = Arc::clone(&round);

            tokio::spawn(async move { hub.produce_clue(&round, &grant).await.unwrap() })
        };

        sleep(Duration::from_secs(1)).await;
        assert_eq!(hub.attempt(&round, "tokyo"), AttemptOutcome::Correct);

        assert!(producing.await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_starts_reserve_once() {
        let hub = Arc::new(GameHub::new(Tokyo::new()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let hub = Arc::clone(&hub);

                tokio::spawn(async move { hub.reserve(guild(), Id::new(2)).is_ok() })
            })
            .collect();

        let mut reserved = 0;

        for task in tasks {
            if task.await.unwrap() {
                reserved += 1;
            }
        }

        assert_eq!(reserved, 1);
        assert_eq!(hub.rounds().len(), 1);
    }
}
