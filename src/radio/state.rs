//! Driver settings and state bookkeeping
//!
//! Settings live in RAM only. They are changed with immutable `with_*`
//! transitions and applied to the driver as a whole.

use crate::error::{Error, Result};
use crate::types::{RegulationMode, TransceiverState};

/// Runtime overrides of the driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverSettings {
    /// Skip the default sub-range tier of the transmit check
    pub extended_range: bool,
    /// Skip the region tier of the transmit check
    pub bypass_region: bool,
    /// Drive the external amplifier / LED line while transmitting
    pub ext_leds_and_amp: bool,
    /// Multiplier applied by rolling-code encoders to their counter step
    pub rolling_counter_mult: u8,
}

impl DriverSettings {
    /// Factory settings
    #[must_use]
    pub const fn new() -> Self {
        Self {
            extended_range: false,
            bypass_region: false,
            ext_leds_and_amp: true,
            rolling_counter_mult: 1,
        }
    }

    /// Set the extended range override
    #[must_use]
    pub const fn with_extended_range(self, extended_range: bool) -> Self {
        Self {
            extended_range,
            ..self
        }
    }

    /// Set the region bypass override
    #[must_use]
    pub const fn with_bypass_region(self, bypass_region: bool) -> Self {
        Self {
            bypass_region,
            ..self
        }
    }

    /// Enable or disable the amplifier line
    #[must_use]
    pub const fn with_ext_leds_and_amp(self, ext_leds_and_amp: bool) -> Self {
        Self {
            ext_leds_and_amp,
            ..self
        }
    }

    /// Set the rolling counter multiplier
    #[must_use]
    pub const fn with_rolling_counter_mult(self, rolling_counter_mult: u8) -> Self {
        Self {
            rolling_counter_mult,
            ..self
        }
    }
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DriverSettings {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "ext_range={} bypass_region={} amp={} mult={}",
            self.extended_range,
            self.bypass_region,
            self.ext_leds_and_amp,
            self.rolling_counter_mult
        );
    }
}

/// Coarse state plus the regulation of the programmed frequency
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriverState {
    state: TransceiverState,
    regulation: RegulationMode,
}

impl DriverState {
    /// Power-on state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TransceiverState::Uninitialized,
            regulation: RegulationMode::ReceiveAndTransmit,
        }
    }

    /// Current transceiver state
    #[must_use]
    pub const fn state(&self) -> TransceiverState {
        self.state
    }

    /// Regulation of the programmed frequency
    #[must_use]
    pub const fn regulation(&self) -> RegulationMode {
        self.regulation
    }

    /// Same record in `state`
    #[must_use]
    pub const fn with_state(self, state: TransceiverState) -> Self {
        Self { state, ..self }
    }

    /// Same record with `regulation`
    #[must_use]
    pub const fn with_regulation(self, regulation: RegulationMode) -> Self {
        Self { regulation, ..self }
    }

    /// Fail unless the driver is in `expected`
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] otherwise.
    pub fn require(&self, expected: TransceiverState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    /// Panic unless the driver is in `expected`
    ///
    /// # Panics
    ///
    /// When the state differs; callers use this where the state machine
    /// already guarantees the precondition.
    #[track_caller]
    pub fn assert(&self, expected: TransceiverState) {
        assert!(
            self.state == expected,
            "transceiver in {:?}, operation needs {:?}",
            self.state,
            expected
        );
    }
}
