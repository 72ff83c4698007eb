use std::sync::Arc;

use hashbrown::{hash_map::Entry, HashMap};
use jeffbot_util::IntHasher;
use parking_lot::Mutex;
use thiserror::Error;
use twilight_model::id::{marker::GuildMarker, Id};

use super::{GameAnswer, SharedRound};

#[derive(Debug, Error)]
#[error("a round is already running in guild {0}")]
pub struct AlreadyActive(pub Id<GuildMarker>);

/// At most one unfinished round per guild.
///
/// Lock order is registry before round; a round's lock is never held while
/// locking the registry.
pub struct RoundRegistry<A> {
    rounds: Mutex<HashMap<Id<GuildMarker>, SharedRound<A>, IntHasher>>,
}

impl<A: GameAnswer> RoundRegistry<A> {
    pub fn new() -> Self {
        Self {
            rounds: Mutex::new(HashMap::with_hasher(IntHasher)),
        }
    }

    /// The guild's round, unless there is none or it already finished.
    pub fn get_active(&self, guild: Id<GuildMarker>) -> Option<SharedRound<A>> {
        self.rounds
            .lock()
            .get(&guild)
            .filter(|round| !round.lock().is_finished())
            .map(Arc::clone)
    }

    pub fn register(&self, round: &SharedRound<A>) -> Result<(), AlreadyActive> {
        let guild = round.lock().guild();
        let mut rounds = self.rounds.lock();

        match rounds.entry(guild) {
            Entry::Occupied(mut entry) => {
                // A finished round that was not unregistered yet does not block
                if !entry.get().lock().is_finished() {
                    return Err(AlreadyActive(guild));
                }

                entry.insert(Arc::clone(round));
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(round));
            }
        }

        Ok(())
    }

    /// Removes the guild's entry only if it still is `round`.
    pub fn unregister(&self, guild: Id<GuildMarker>, round: &SharedRound<A>) -> bool {
        let mut rounds = self.rounds.lock();

        match rounds.entry(guild) {
            Entry::Occupied(entry) if Arc::ptr_eq(entry.get(), round) => {
                entry.remove();

                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rounds.lock().len()
    }
}

impl<A: GameAnswer> Default for RoundRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::games::round::tests::{config, pending_round, TestAnswer, TOKYO};

    fn shared() -> SharedRound<TestAnswer> {
        Arc::new(Mutex::new(pending_round(config())))
    }

    #[test]
    fn one_round_per_guild() {
        let registry = RoundRegistry::new();
        let first = shared();
        let second = shared();

        registry.register(&first).unwrap();
        assert!(registry.register(&second).is_err());
        assert_eq!(registry.len(), 1);

        let active = registry.get_active(Id::new(1)).unwrap();
        assert!(Arc::ptr_eq(&active, &first));
        assert!(registry.get_active(Id::new(3)).is_none());
    }

    #[test]
    fn unregister_only_removes_same_round() {
        let registry = RoundRegistry::new();
        let first = shared();
        let other = shared();

        registry.register(&first).unwrap();

        assert!(!registry.unregister(Id::new(1), &other));
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister(Id::new(1), &first));
        assert!(!registry.unregister(Id::new(1), &first));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn finished_rounds_are_not_active() {
        let registry = RoundRegistry::new();
        let stale = shared();
        let fresh = shared();

        registry.register(&stale).unwrap();
        stale.lock().assign_answer(TestAnswer(TOKYO)).unwrap();
        stale.lock().abandon();

        assert!(registry.get_active(Id::new(1)).is_none());

        registry.register(&fresh).unwrap();
        let active = registry.get_active(Id::new(1)).unwrap();
        assert!(Arc::ptr_eq(&active, &fresh));
    }
}
