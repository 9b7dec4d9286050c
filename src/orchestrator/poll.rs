//! Periodic refresh driver. At most one timer is active per store.

use crate::store::StateStore;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// One scheduled invocation of the refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PollTick {
    pub seq: u64,
}

/// Handle of a running timer task. Dropping it stops the timer.
#[derive(Debug)]
pub struct PollTimer {
    handle: JoinHandle<()>,
    interval: Duration,
}

impl PollTimer {
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PollLoop {
    interval: Duration,
}

impl PollLoop {
    pub fn new(interval: Duration) -> Self {
        // tokio intervals reject a zero period.
        Self {
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Start ticking into `tick_tx`. Installing the new timer stops any previous one.
    pub fn start(&self, store: &mut StateStore, tick_tx: UnboundedSender<PollTick>) {
        store.install_poll_timer(self.spawn(tick_tx));
        debug!(interval_ms = self.interval.as_millis() as u64, "poll loop started");
    }

    fn spawn(&self, tick_tx: UnboundedSender<PollTick>) -> PollTimer {
        let period = self.interval;
        let handle = tokio::spawn(async move {
            // First tick fires one full period after start, like a browser interval.
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq = 0u64;
            loop {
                ticker.tick().await;
                seq += 1;
                if tick_tx.send(PollTick { seq }).is_err() {
                    break;
                }
            }
        });
        PollTimer {
            handle,
            interval: period,
        }
    }
}
