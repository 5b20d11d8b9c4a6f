//! Shared types used across the sub-GHz firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

/// Inclusive frequency range in Hz
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrequencyRange {
    /// Lowest frequency in the range
    pub start: u32,
    /// Highest frequency in the range
    pub end: u32,
}

impl FrequencyRange {
    /// Create a range covering `start..=end`
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Check if `hz` lies inside the range
    #[must_use]
    pub const fn contains(&self, hz: u32) -> bool {
        hz >= self.start && hz <= self.end
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for FrequencyRange {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}..={} Hz", self.start, self.end);
    }
}

/// Unit exchanged with protocol encoders and decoders
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelDuration {
    /// Hold `level` for `duration` ticks
    Level {
        /// Output level (true = carrier keyed)
        level: bool,
        /// Length in ticks
        duration: u32,
    },
    /// Insert the inter-frame guard gap
    Wait,
    /// End of waveform
    Reset,
}

impl LevelDuration {
    /// Create a level run
    #[must_use]
    pub const fn new(level: bool, duration: u32) -> Self {
        Self::Level { level, duration }
    }

    /// Create a high (keyed) run
    #[must_use]
    pub const fn high(duration: u32) -> Self {
        Self::new(true, duration)
    }

    /// Create a low (unkeyed) run
    #[must_use]
    pub const fn low(duration: u32) -> Self {
        Self::new(false, duration)
    }

    /// Check for the end-of-waveform marker
    #[must_use]
    pub const fn is_reset(&self) -> bool {
        matches!(self, Self::Reset)
    }

    /// Check for the guard-gap marker
    #[must_use]
    pub const fn is_wait(&self) -> bool {
        matches!(self, Self::Wait)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LevelDuration {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Level { level, duration } => defmt::write!(f, "{}:{}", level, duration),
            Self::Wait => defmt::write!(f, "WAIT"),
            Self::Reset => defmt::write!(f, "RESET"),
        }
    }
}

/// Analog front-end path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Path {
    /// Antenna disconnected
    Isolate,
    /// 300-348 MHz filter
    Mhz315,
    /// 387-464 MHz filter
    Mhz433,
    /// 779-928 MHz filter
    Mhz868,
}

impl Path {
    /// Select the path for a realized synthesizer frequency
    #[must_use]
    pub const fn for_frequency(hz: u32) -> Option<Self> {
        if hz >= 280_999_633 && hz <= 360_999_938 {
            Some(Self::Mhz315)
        } else if hz >= 377_999_755 && hz <= 481_000_000 {
            Some(Self::Mhz433)
        } else if hz >= 748_999_633 && hz <= 962_000_000 {
            Some(Self::Mhz868)
        } else {
            None
        }
    }

    /// Level of the RF switch line for this path
    #[must_use]
    pub const fn rf_switch(self) -> bool {
        matches!(self, Self::Mhz315 | Self::Mhz868)
    }

    /// Whether GDO2 drives the second switch inverted
    #[must_use]
    pub const fn gdo2_inverted(self) -> bool {
        matches!(self, Self::Mhz433 | Self::Mhz868)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Path {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Isolate => defmt::write!(f, "ISOLATE"),
            Self::Mhz315 => defmt::write!(f, "315"),
            Self::Mhz433 => defmt::write!(f, "433"),
            Self::Mhz868 => defmt::write!(f, "868"),
        }
    }
}

/// Outcome of the tiered transmit permission check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxCheck {
    /// Transmission permitted
    Allowed,
    /// Outside every band the transceiver can tune
    UnsupportedByHardware,
    /// Outside the conservative default sub-ranges
    BlockedByDefaultRange,
    /// No regional allow-list provisioned
    BlockedRegionNotProvisioned,
    /// Not listed in the provisioned region
    BlockedByRegion,
}

impl TxCheck {
    /// Check if transmission is permitted
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TxCheck {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Allowed => defmt::write!(f, "Allowed"),
            Self::UnsupportedByHardware => defmt::write!(f, "Unsupported"),
            Self::BlockedByDefaultRange => defmt::write!(f, "BlockedDefault"),
            Self::BlockedRegionNotProvisioned => defmt::write!(f, "BlockedNoRegion"),
            Self::BlockedByRegion => defmt::write!(f, "BlockedRegion"),
        }
    }
}

/// Regulation applied to the programmed frequency
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RegulationMode {
    /// Receive only
    ReceiveOnly,
    /// Receive and transmit
    #[default]
    ReceiveAndTransmit,
}

#[cfg(feature = "embedded")]
impl defmt::Format for RegulationMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::ReceiveOnly => defmt::write!(f, "RX"),
            Self::ReceiveAndTransmit => defmt::write!(f, "RX/TX"),
        }
    }
}

/// Coarse transceiver state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransceiverState {
    /// Power-on self test not run yet
    #[default]
    Uninitialized,
    /// Self test failed
    Faulty,
    /// Idle, energy save mode
    Idle,
    /// Edge capture running
    AsyncReceiving,
    /// Timer and DMA driving the data line
    AsyncTransmitting,
}

#[cfg(feature = "embedded")]
impl defmt::Format for TransceiverState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Uninitialized => defmt::write!(f, "INIT"),
            Self::Faulty => defmt::write!(f, "FAULTY"),
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::AsyncReceiving => defmt::write!(f, "ASYNC-RX"),
            Self::AsyncTransmitting => defmt::write!(f, "ASYNC-TX"),
        }
    }
}

/// Chip main radio control state, from the status byte
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChipState {
    /// IDLE
    Idle,
    /// Receive mode
    Rx,
    /// Transmit mode
    Tx,
    /// Fast TX ready
    FstxOn,
    /// Synthesizer calibration
    Calibrate,
    /// PLL settling
    Settling,
    /// RX FIFO overflowed
    RxFifoOverflow,
    /// TX FIFO underflowed
    TxFifoUnderflow,
}

impl ChipState {
    /// Decode bits 6:4 of a status byte
    #[must_use]
    pub const fn from_status(status: u8) -> Self {
        match (status >> 4) & 0x07 {
            0 => Self::Idle,
            1 => Self::Rx,
            2 => Self::Tx,
            3 => Self::FstxOn,
            4 => Self::Calibrate,
            5 => Self::Settling,
            6 => Self::RxFifoOverflow,
            _ => Self::TxFifoUnderflow,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ChipState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::Rx => defmt::write!(f, "RX"),
            Self::Tx => defmt::write!(f, "TX"),
            Self::FstxOn => defmt::write!(f, "FSTXON"),
            Self::Calibrate => defmt::write!(f, "CALIBRATE"),
            Self::Settling => defmt::write!(f, "SETTLING"),
            Self::RxFifoOverflow => defmt::write!(f, "RXFIFO_OVF"),
            Self::TxFifoUnderflow => defmt::write!(f, "TXFIFO_UNF"),
        }
    }
}
