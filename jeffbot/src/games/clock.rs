use std::{
    future::Future,
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use tokio::{
    sync::Notify,
    time::{sleep_until, Duration, Instant},
};

const ARMED: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

/// One-shot deadline that runs a callback once it elapses.
///
/// The deadline can be pushed back while the clock is armed. Whichever of
/// firing and cancelling happens first wins, the other becomes a no-op.
pub struct SessionClock {
    shared: Arc<Shared>,
}

struct Shared {
    state: AtomicU8,
    deadline: Mutex<Instant>,
    cancelled: Notify,
}

impl SessionClock {
    /// Spawns a task that awaits `on_fire` after `duration` unless the clock
    /// is cancelled beforehand.
    pub fn schedule<F, Fut>(duration: Duration, on_fire: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let shared = Arc::new(Shared {
            state: AtomicU8::new(ARMED),
            deadline: Mutex::new(Instant::now() + duration),
            cancelled: Notify::new(),
        });

        tokio::spawn(Self::run(Arc::clone(&shared), on_fire));

        Self { shared }
    }

    async fn run<F, Fut>(shared: Arc<Shared>, on_fire: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            let deadline = *shared.deadline.lock();

            tokio::select! {
                _ = sleep_until(deadline) => {}
                _ = shared.cancelled.notified() => return,
            }

            // Extensions and the decision to fire both happen under the deadline lock
            let fire = {
                let current = shared.deadline.lock();

                if *current > deadline {
                    continue;
                }

                shared
                    .state
                    .compare_exchange(ARMED, FIRED, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
            };

            if fire {
                on_fire().await;
            }

            return;
        }
    }

    /// Pushes the deadline back by `extra` on top of whatever time is left.
    ///
    /// Returns `false` if the clock already fired or was cancelled.
    pub fn extend(&self, extra: Duration) -> bool {
        let mut deadline = self.shared.deadline.lock();

        if self.shared.state.load(Ordering::Acquire) != ARMED {
            return false;
        }

        *deadline += extra;

        true
    }

    /// Returns `true` only for the call that actually disarmed the clock.
    pub fn cancel(&self) -> bool {
        let cancelled = self
            .shared
            .state
            .compare_exchange(ARMED, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();

        if cancelled {
            self.shared.cancelled.notify_one();
        }

        cancelled
    }

    pub fn remaining(&self) -> Duration {
        if !self.is_armed() {
            return Duration::ZERO;
        }

        self.shared
            .deadline
            .lock()
            .saturating_duration_since(Instant::now())
    }

    pub fn is_armed(&self) -> bool {
        self.shared.state.load(Ordering::Acquire) == ARMED
    }

    pub fn has_fired(&self) -> bool {
        self.shared.state.load(Ordering::Acquire) == FIRED
    }
}
