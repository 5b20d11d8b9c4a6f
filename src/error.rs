//! Driver error type

use crate::types::{TransceiverState, TxCheck};

/// Driver result
pub type Result<T> = core::result::Result<T, Error>;

/// Recoverable driver errors
///
/// Hardware faults that leave the chip unusable (a status transition that
/// never completes) are not represented here; they panic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Operation requires a different transceiver state
    InvalidState {
        /// State the operation needs
        expected: TransceiverState,
        /// State the driver is in
        actual: TransceiverState,
    },
    /// Programmed frequency is receive-only
    TxNotPermitted(TxCheck),
    /// No front-end path covers the frequency
    FrequencyUnsupported(u32),
    /// GD0 did not follow the forced levels
    SelfTestFailed,
    /// SPI transfer to the chip failed
    Bus,
    /// Region table has no free slot
    RegionFull,
    /// Malformed preset or packet
    InvalidData,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::InvalidState { expected, actual } => {
                defmt::write!(f, "InvalidState(expected {}, got {})", expected, actual);
            }
            Self::TxNotPermitted(check) => defmt::write!(f, "TxNotPermitted({})", check),
            Self::FrequencyUnsupported(hz) => defmt::write!(f, "FrequencyUnsupported({} Hz)", hz),
            Self::SelfTestFailed => defmt::write!(f, "SelfTestFailed"),
            Self::Bus => defmt::write!(f, "Bus"),
            Self::RegionFull => defmt::write!(f, "RegionFull"),
            Self::InvalidData => defmt::write!(f, "InvalidData"),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidState { expected, actual } => {
                write!(f, "expected state {expected:?}, driver is {actual:?}")
            }
            Self::TxNotPermitted(check) => write!(f, "transmit not permitted: {check:?}"),
            Self::FrequencyUnsupported(hz) => write!(f, "no front-end path for {hz} Hz"),
            Self::SelfTestFailed => f.write_str("power-on self test failed"),
            Self::Bus => f.write_str("SPI bus error"),
            Self::RegionFull => f.write_str("region band table full"),
            Self::InvalidData => f.write_str("malformed preset or packet"),
        }
    }
}
