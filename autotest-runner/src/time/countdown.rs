// Copyright (c) The autotest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The once-per-second countdown shown while an unattended run executes.
//!
//! The countdown is purely informational: it bounds the "time remaining"
//! display, not the case itself. It decrements once per second and stops
//! itself when it reaches zero; stopping it early is idempotent and safe.

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A countdown that ticks down once per second, self-terminating at zero.
///
/// At most one countdown is live per run session. Designed to sit in a
/// `select!` arm guarded by [`Countdown::is_running`]; the disabled state
/// (used for manual runs, where completion is user-driven) never ticks.
#[derive(Debug)]
pub(crate) struct Countdown {
    state: CountdownState,
}

#[derive(Debug)]
enum CountdownState {
    Disabled,
    Running {
        interval: Interval,
        label: String,
        remaining: u32,
    },
}

impl Countdown {
    /// Starts a countdown at `seconds`, labeled for status display.
    pub(crate) fn started(seconds: u32, label: impl Into<String>) -> Self {
        if seconds == 0 {
            return Self::disabled();
        }
        // Delay the first tick by a full period; interval() would fire it
        // immediately.
        let mut interval = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            state: CountdownState::Running {
                interval,
                label: label.into(),
                remaining: seconds,
            },
        }
    }

    /// A countdown that never ticks.
    pub(crate) fn disabled() -> Self {
        Self {
            state: CountdownState::Disabled,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        matches!(self.state, CountdownState::Running { .. })
    }

    /// Waits for the next tick and returns `(label, remaining)` with the
    /// decrement applied. After yielding zero the countdown disables itself
    /// and never ticks again.
    ///
    /// Pends forever while disabled; callers gate on [`Countdown::is_running`].
    pub(crate) async fn tick(&mut self) -> (String, u32) {
        let result = match &mut self.state {
            CountdownState::Disabled => std::future::pending().await,
            CountdownState::Running {
                interval,
                label,
                remaining,
            } => {
                interval.tick().await;
                *remaining -= 1;
                (label.clone(), *remaining)
            }
        };
        if result.1 == 0 {
            self.state = CountdownState::Disabled;
        }
        result
    }

    /// Cancels any pending tick. Idempotent; safe to call when not running.
    pub(crate) fn stop(&mut self) {
        self.state = CountdownState::Disabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn counts_down_and_self_terminates() {
        let mut countdown = Countdown::started(3, "Geography");

        let mut ticks = Vec::new();
        while countdown.is_running() {
            ticks.push(countdown.tick().await);
        }
        assert_eq!(
            ticks,
            vec![
                ("Geography".to_owned(), 2),
                ("Geography".to_owned(), 1),
                ("Geography".to_owned(), 0),
            ]
        );

        // No further ticks, and stopping after the fact is a no-op.
        assert!(!countdown.is_running());
        countdown.stop();
        countdown.stop();
        assert!(!countdown.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_one_second_apart() {
        let mut countdown = Countdown::started(2, "Vectors");

        let before = Instant::now();
        countdown.tick().await;
        assert_eq!(before.elapsed(), Duration::from_secs(1));
        countdown.tick().await;
        assert_eq!(before.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn stop_cancels_pending_ticks() {
        let mut countdown = Countdown::started(5, "Geography");
        countdown.stop();
        assert!(!countdown.is_running());
    }

    #[test]
    fn zero_seconds_never_runs() {
        let countdown = Countdown::started(0, "Geography");
        assert!(!countdown.is_running());
    }
}
