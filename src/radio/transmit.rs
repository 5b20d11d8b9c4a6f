//! Async transmit session
//!
//! The timer toggles GD0 every time its counter wraps. DMA reloads the
//! auto-reload register from a circular stream on each update, so every
//! word is the length of one level. [`ReloadBuffer`] is the ring image the
//! stream was primed with and is rewritten one half at a time: once DMA has
//! played a half (the half-transfer or transfer-complete notification) the
//! same half is refilled here and queued behind the words still playing.

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::{ASYNC_TX_BUFFER_FULL, ASYNC_TX_BUFFER_HALF};

use super::middleware::{reload_value, DurationNormalizer};
use super::peripherals::LevelSource;

/// Transmit encoder borrowed by a running session
pub type Encoder<'cb> = &'cb mut (dyn LevelSource + Send);

/// One half of the reload ring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Half {
    /// Words `0..HALF`, refilled on half-transfer
    First,
    /// Words `HALF..FULL`, refilled on transfer-complete
    Second,
}

impl Half {
    /// Index of the first word of this half
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => ASYNC_TX_BUFFER_HALF,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Half {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::First => defmt::write!(f, "first"),
            Self::Second => defmt::write!(f, "second"),
        }
    }
}

/// Circular buffer of auto-reload values read by DMA
#[derive(Clone, Debug)]
pub struct ReloadBuffer {
    words: [u32; ASYNC_TX_BUFFER_FULL],
}

impl ReloadBuffer {
    /// Zeroed buffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            words: [0; ASYNC_TX_BUFFER_FULL],
        }
    }

    /// Whole ring, as handed to DMA
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.words
    }

    /// Words of one half
    #[must_use]
    pub fn half(&self, half: Half) -> &[u32] {
        &self.words[half.offset()..half.offset() + ASYNC_TX_BUFFER_HALF]
    }
}

impl Default for ReloadBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Ticks spent keyed and unkeyed during a session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DutyCycle {
    /// Keyed ticks
    pub high: u64,
    /// Unkeyed ticks
    pub low: u64,
}

impl DutyCycle {
    /// Account one level of `duration` ticks
    pub fn record(&mut self, high: bool, duration: u32) {
        if high {
            self.high += u64::from(duration);
        } else {
            self.low += u64::from(duration);
        }
    }

    /// Total ticks accounted
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.high + self.low
    }

    /// Keyed share in percent, 0 for an empty session
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.high as f32 / total as f32 * 100.0
    }

    /// Keyed share rounded to a whole percent
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent_rounded(&self) -> u8 {
        self.percent().round() as u8
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DutyCycle {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "on {} ticks, off {} ticks", self.high, self.low);
    }
}

/// Result of a refill pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refill {
    /// Every word of the half was written
    Filled,
    /// The end value was written at `index`; no further refills are needed
    Ended {
        /// Buffer index holding the 0 reload
        index: usize,
    },
}

/// State of a running async transmission
pub struct AsyncTx<'cb> {
    encoder: Encoder<'cb>,
    normalizer: DurationNormalizer,
    buffer: ReloadBuffer,
    duty: DutyCycle,
    end: Option<usize>,
    next: Half,
}

impl<'cb> AsyncTx<'cb> {
    /// New session with an idle normalizer and an empty buffer
    pub fn new(encoder: Encoder<'cb>) -> Self {
        Self {
            encoder,
            normalizer: DurationNormalizer::new(),
            buffer: ReloadBuffer::new(),
            duty: DutyCycle::default(),
            end: None,
            next: Half::First,
        }
    }

    /// Fill both halves before the DMA stream is started
    pub fn prefill(&mut self) -> Refill {
        match self.refill(Half::First) {
            Refill::Filled => self.refill(Half::Second),
            ended @ Refill::Ended { .. } => ended,
        }
    }

    /// Refill the half DMA played least recently
    ///
    /// Halves alternate starting with the first one after [`prefill`].
    ///
    /// [`prefill`]: Self::prefill
    pub fn refill_next(&mut self) -> (Half, Refill) {
        let half = self.next;
        self.next = match half {
            Half::First => Half::Second,
            Half::Second => Half::First,
        };
        (half, self.refill(half))
    }

    /// Rewrite one half from the normalizer
    ///
    /// Stops at the first 0 reload, leaving the rest of the half untouched.
    /// After that every call is a no-op reporting the same end position.
    pub fn refill(&mut self, half: Half) -> Refill {
        if let Some(index) = self.end {
            return Refill::Ended { index };
        }

        let start = half.offset();
        for index in start..start + ASYNC_TX_BUFFER_HALF {
            let duration = self.normalizer.next_duration(&mut *self.encoder);
            self.buffer.words[index] = reload_value(duration);
            if duration == 0 {
                self.end = Some(index);
                return Refill::Ended { index };
            }
            // The output toggles on the first update, so even slots are keyed.
            self.duty.record(index % 2 == 0, duration);
        }
        Refill::Filled
    }

    /// Reload ring
    #[must_use]
    pub const fn buffer(&self) -> &ReloadBuffer {
        &self.buffer
    }

    /// Duty-cycle totals so far
    #[must_use]
    pub const fn duty(&self) -> DutyCycle {
        self.duty
    }

    /// Buffer index of the queued end value, if any
    #[must_use]
    pub const fn end_index(&self) -> Option<usize> {
        self.end
    }
}
