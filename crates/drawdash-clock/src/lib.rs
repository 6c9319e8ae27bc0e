//! Cancellable countdown primitive for room actors.
//!
//! A [`Countdown`] is designed to sit inside a room actor's
//! `tokio::select!` loop rather than run as its own task:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = rx.recv() => { /* handle commands */ }
//!         _ = countdown.tick() => { /* one second elapsed */ }
//!     }
//! }
//! ```
//!
//! Because the same task that consumes ticks is the one that arms and
//! cancels the countdown, replacement is race-free by construction: a
//! round start re-arms the countdown in the same serialized iteration
//! that applies the state transition, and a cancelled countdown has no
//! task left anywhere that could deliver a stale tick.
//!
//! # Disarmed mode
//!
//! While disarmed, [`Countdown::tick`] pends forever, so the select branch
//! simply never fires. This is the correct behavior for a room that is
//! waiting for players or between games.

use std::future;
use std::time::Duration;

use tokio::time::{self, Instant};

/// A cancellable one-tick-per-period countdown.
///
/// Deadlines advance by a fixed period from the previous deadline, not from
/// "now", so a tick consumed late does not push later ticks back.
#[derive(Debug)]
pub struct Countdown {
    period: Duration,
    next: Option<Instant>,
    ticks: u64,
}

impl Countdown {
    /// Creates a disarmed countdown that will tick once per `period` when
    /// armed.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: None,
            ticks: 0,
        }
    }

    /// Arms the countdown: the next tick fires one period from now.
    ///
    /// Re-arming an already armed countdown replaces the pending deadline,
    /// which is how a new round's timer supersedes the previous round's.
    pub fn arm(&mut self) {
        self.next = Some(Instant::now() + self.period);
        tracing::trace!(period_ms = self.period.as_millis() as u64, "countdown armed");
    }

    /// Disarms the countdown. Subsequent [`tick`](Self::tick) calls pend
    /// forever until the next [`arm`](Self::arm).
    pub fn cancel(&mut self) {
        if self.next.take().is_some() {
            tracing::trace!("countdown cancelled");
        }
    }

    /// Returns `true` if a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// The tick period this countdown was built with.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Total ticks delivered since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Resolves at the next deadline while armed; pends forever while
    /// disarmed.
    ///
    /// Cancel-safe: dropping the returned future before it resolves (the
    /// usual outcome when another select branch wins) leaves the deadline
    /// untouched.
    pub async fn tick(&mut self) {
        match self.next {
            Some(deadline) => {
                time::sleep_until(deadline).await;
                self.next = Some(deadline + self.period);
                self.ticks += 1;
            }
            None => future::pending().await,
        }
    }
}
