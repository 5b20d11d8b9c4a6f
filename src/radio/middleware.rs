//! Duration normalizer between the encoder and the reload ring
//!
//! Encoders hand out alternating level runs, possibly several in a row at
//! the same level, interleaved with guard-gap and end markers. The timer
//! only knows "toggle after N ticks", so consecutive runs of one level are
//! merged into a single toggle period here.

use crate::config::{ASYNC_TX_GUARD_TIME, RELOAD_FLOOR};
use crate::types::LevelDuration;

use super::peripherals::LevelSource;

/// Normalizer state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MiddlewareState {
    /// Waiting for the first level that differs from the line
    #[default]
    Idle,
    /// End marker seen, only zeros until restarted
    ResetPending,
    /// Merging level runs
    Running,
}

#[cfg(feature = "embedded")]
impl defmt::Format for MiddlewareState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "Idle"),
            Self::ResetPending => defmt::write!(f, "ResetPending"),
            Self::Running => defmt::write!(f, "Running"),
        }
    }
}

/// Convert a toggle period into the auto-reload register value
///
/// The counter runs from 0 to ARR inclusive, so one is taken off. Periods
/// under two ticks are raised to the hardware floor. Zero passes through
/// unchanged as the end-of-waveform value.
#[must_use]
pub const fn reload_value(duration: u32) -> u32 {
    if duration == 0 {
        0
    } else if duration > 2 {
        duration - 1
    } else {
        RELOAD_FLOOR
    }
}

/// Merges level runs into toggle periods
#[derive(Clone, Copy, Debug, Default)]
pub struct DurationNormalizer {
    state: MiddlewareState,
    /// Level of the run currently accumulated
    level: bool,
    /// Ticks accumulated and not yet emitted
    pending: u32,
}

impl DurationNormalizer {
    /// Create a normalizer in `Idle` with the line low
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: MiddlewareState::Idle,
            level: false,
            pending: 0,
        }
    }

    /// Return to `Idle` with the line low and nothing accumulated
    pub fn restart(&mut self) {
        *self = Self::new();
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> MiddlewareState {
        self.state
    }

    /// Ticks accumulated and not yet emitted
    #[must_use]
    pub const fn pending(&self) -> u32 {
        self.pending
    }

    /// Pull from `source` until one toggle period is complete
    ///
    /// Returns the period in ticks, or 0 when the waveform has ended. Once 0
    /// is reached through an end marker the source is not polled again until
    /// [`restart`](Self::restart).
    pub fn next_duration<S: LevelSource + ?Sized>(&mut self, source: &mut S) -> u32 {
        if self.state == MiddlewareState::ResetPending {
            return 0;
        }

        loop {
            let (level, duration) = match source.next_level() {
                LevelDuration::Reset => {
                    self.state = MiddlewareState::ResetPending;
                    // A high run still accumulating is the last toggle period.
                    // A trailing low run needs no toggle.
                    let last = if self.level { self.pending } else { 0 };
                    self.level = false;
                    self.pending = 0;
                    return last;
                }
                LevelDuration::Wait => {
                    self.level = !self.level;
                    let gap = self.pending.saturating_add(ASYNC_TX_GUARD_TIME);
                    self.pending = 0;
                    return gap;
                }
                LevelDuration::Level { level, duration } => (level, duration),
            };

            if self.state == MiddlewareState::Idle {
                if level == self.level {
                    // Line is already there, nothing to toggle.
                    continue;
                }
                self.state = MiddlewareState::Running;
                self.level = level;
                self.pending = 0;
            }

            if level == self.level {
                self.pending = self.pending.saturating_add(duration);
            } else {
                self.level = level;
                let period = self.pending;
                self.pending = duration;
                return period;
            }
        }
    }

    /// Next value for the auto-reload register, 0 at the end of waveform
    pub fn next_reload<S: LevelSource + ?Sized>(&mut self, source: &mut S) -> u32 {
        reload_value(self.next_duration(source))
    }
}
