//! Transition (blend) progress tracker
//!
//! Mirrors the device's crossfade client-side as a time-based estimate.
//! Every write restarts the estimate from zero; remaining progress of the
//! previous run is discarded. Time is passed in so the tracker stays pure;
//! the session drives it from a tokio interval.

use std::time::Duration;
use tokio::time::Instant;

/// Progress snapshot for display
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransitionState {
    pub is_busy: bool,
    /// 0.0 ..= 100.0
    pub progress_percent: f64,
}

#[derive(Debug, Clone, Copy)]
struct Run {
    started: Instant,
    duration: Duration,
}

/// Idle/running state machine
#[derive(Debug, Default)]
pub struct TransitionTracker {
    run: Option<Run>,
    state: TransitionState,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a transition of `duration` at `now`
    ///
    /// A zero duration completes immediately.
    pub fn start(&mut self, duration: Duration, now: Instant) {
        if duration.is_zero() {
            self.cancel();
            return;
        }
        self.run = Some(Run {
            started: now,
            duration,
        });
        self.state = TransitionState {
            is_busy: true,
            progress_percent: 0.0,
        };
    }

    /// Recompute progress at `now`; completes the run once elapsed
    pub fn tick(&mut self, now: Instant) -> TransitionState {
        let Some(run) = self.run else {
            return self.state;
        };

        let elapsed = now.saturating_duration_since(run.started);
        if elapsed >= run.duration {
            self.cancel();
        } else {
            let ratio = elapsed.as_secs_f64() / run.duration.as_secs_f64();
            self.state.progress_percent = (ratio * 100.0).min(100.0);
        }
        self.state
    }

    /// Drop any running transition and reset to idle
    pub fn cancel(&mut self) {
        self.run = None;
        self.state = TransitionState::default();
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Duration of the current run, if any
    #[cfg(test)]
    pub fn duration(&self) -> Option<Duration> {
        self.run.map(|r| r.duration)
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }
}
