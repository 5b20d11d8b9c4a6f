//! Async receive capture
//!
//! The counter is reset by every rising edge of GD0 (slave reset mode on
//! the filtered direct input), so a rising capture is the length of the
//! whole period and a falling capture is the length of the high level
//! that just ended. The low level is the difference of the two.

use crate::types::LevelDuration;

use super::peripherals::{CaptureEvents, EdgeSink};

/// Edge consumer borrowed by a running session
pub type Decoder<'cb> = &'cb mut (dyn EdgeSink + Send);

/// Interval bookkeeping between two captures
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureState {
    /// Counter value at the last falling edge
    delta: u32,
}

impl CaptureState {
    /// Fresh state, as at session start
    #[must_use]
    pub const fn new() -> Self {
        Self { delta: 0 }
    }

    /// Falling edge at counter `captured`: a high level just ended
    pub fn on_falling(&mut self, captured: u32) -> LevelDuration {
        self.delta = captured;
        LevelDuration::high(captured)
    }

    /// Rising edge at counter `captured`: a low level just ended
    pub fn on_rising(&mut self, captured: u32) -> LevelDuration {
        LevelDuration::low(captured.wrapping_sub(self.delta))
    }
}

/// State of a running async reception
pub struct AsyncRx<'cb> {
    decoder: Decoder<'cb>,
    capture: CaptureState,
}

impl<'cb> AsyncRx<'cb> {
    /// New session with the delta cleared
    pub fn new(decoder: Decoder<'cb>) -> Self {
        Self {
            decoder,
            capture: CaptureState::new(),
        }
    }

    /// Deliver pending captures to the decoder
    ///
    /// `mirror` is called with the new line level before the decoder sees
    /// the edge. Falling is handled before rising.
    pub fn dispatch<F>(&mut self, events: CaptureEvents, mut mirror: F)
    where
        F: FnMut(bool),
    {
        if let Some(captured) = events.falling {
            mirror(false);
            if let LevelDuration::Level { duration, .. } = self.capture.on_falling(captured) {
                self.decoder.on_edge(true, duration);
            }
        }
        if let Some(captured) = events.rising {
            mirror(true);
            if let LevelDuration::Level { duration, .. } = self.capture.on_rising(captured) {
                self.decoder.on_edge(false, duration);
            }
        }
    }

    /// Interval bookkeeping
    #[must_use]
    pub const fn capture(&self) -> &CaptureState {
        &self.capture
    }
}
