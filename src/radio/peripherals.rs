//! Hardware seams of the driver
//!
//! The driver core only talks to the chip, the GD0 data line, the front-end
//! switches and the TIM2/DMA pair through these traits. The STM32 binary
//! implements them in [`crate::hal`]; the host tests implement them with
//! simulated peripherals.

use core::task::Waker;

use embedded_hal::delay::DelayNs;

use crate::error::Result;
use crate::types::ChipState;

/// GDOx pin signal selection (IOCFGx register value)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GdoConfig(u8);

impl GdoConfig {
    /// Serial data output (async mode)
    pub const SERIAL_DATA: Self = Self(0x0D);

    /// Tri-stated output
    pub const HIGH_IMPEDANCE: Self = Self(0x2E);

    /// Hardwired to 0 (1 when inverted)
    pub const HARDWIRE: Self = Self(0x2F);

    /// Invert the output polarity
    #[must_use]
    pub const fn inverted(self) -> Self {
        Self(self.0 | 0x40)
    }

    /// Raw register value
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for GdoConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "IOCFG({=u8:#x})", self.0);
    }
}

/// Low-level radio chip controller
///
/// Register-level access to the transceiver. All calls are short bus
/// transactions; none of them waits for the chip state machine.
pub trait RadioChip {
    /// Issue a chip reset
    fn reset(&mut self) -> Result<()>;

    /// Enter power-down
    fn shutdown(&mut self) -> Result<()>;

    /// Request IDLE
    fn switch_to_idle(&mut self) -> Result<()>;

    /// Request RX
    fn switch_to_rx(&mut self) -> Result<()>;

    /// Request TX
    fn switch_to_tx(&mut self) -> Result<()>;

    /// Start synthesizer calibration
    fn calibrate(&mut self) -> Result<()>;

    /// Flush the RX FIFO
    fn flush_rx(&mut self) -> Result<()>;

    /// Flush the TX FIFO
    fn flush_tx(&mut self) -> Result<()>;

    /// Current main radio control state
    fn status(&mut self) -> Result<ChipState>;

    /// Write a configuration register
    fn write_reg(&mut self, addr: u8, value: u8) -> Result<()>;

    /// Configure the GDO0 (async data) pin
    fn set_gdo0(&mut self, config: GdoConfig) -> Result<()>;

    /// Configure the GDO2 (front-end switch) pin
    fn set_gdo2(&mut self, config: GdoConfig) -> Result<()>;

    /// Program the synthesizer, returning the realized frequency in Hz
    fn set_frequency(&mut self, hz: u32) -> Result<u32>;

    /// Load the 8-entry PA table
    fn set_pa_table(&mut self, table: &[u8; 8]) -> Result<()>;

    /// Append bytes to the TX FIFO
    fn write_fifo(&mut self, data: &[u8]) -> Result<()>;

    /// Read a length-prefixed packet from the RX FIFO into `data`
    ///
    /// Returns the number of payload bytes stored. A packet longer than
    /// `data` is read out and dropped with [`Error::InvalidData`].
    ///
    /// [`Error::InvalidData`]: crate::error::Error::InvalidData
    fn read_fifo(&mut self, data: &mut [u8]) -> Result<usize>;

    /// Number of bytes waiting in the RX FIFO
    fn rx_bytes(&mut self) -> Result<u8>;

    /// Part number register
    fn part_number(&mut self) -> Result<u8>;

    /// Version register
    fn version(&mut self) -> Result<u8>;

    /// Raw RSSI status register
    fn rssi_raw(&mut self) -> Result<u8>;

    /// Raw LQI status register (bit 7 = CRC OK)
    fn lqi_raw(&mut self) -> Result<u8>;
}

/// Mode of the MCU pin wired to GDO0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataLineMode {
    /// Disconnected (lowest leakage)
    Analog,
    /// Plain input, used by the self test
    Input,
    /// Routed to the async timer channel
    Timer,
}

#[cfg(feature = "embedded")]
impl defmt::Format for DataLineMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Analog => defmt::write!(f, "Analog"),
            Self::Input => defmt::write!(f, "Input"),
            Self::Timer => defmt::write!(f, "Timer"),
        }
    }
}

/// MCU pin connected to the chip's GDO0 output
pub trait DataLine {
    /// Reconfigure the pin
    fn set_data_line_mode(&mut self, mode: DataLineMode);

    /// Sample the pin
    fn data_line_is_high(&mut self) -> bool;
}

/// Analog front-end controls
pub trait FrontEnd {
    /// Drive the RF path switch
    fn set_rf_switch(&mut self, high: bool);

    /// Drive the external amplifier / LED enable line
    fn set_amp(&mut self, enabled: bool);
}

/// Pending capture values
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureEvents {
    /// Counter captured on the falling edge
    pub falling: Option<u32>,
    /// Counter captured on the rising edge (counter resets here)
    pub rising: Option<u32>,
}

/// Timer/counter and DMA engine shared by async TX and RX
pub trait PulseTimer {
    /// Configure toggle output and a circular DMA stream into the
    /// auto-reload register, primed with the whole of `reloads`. The
    /// counter is left stopped with `lead_in` as the first period.
    fn arm_transmit(&mut self, reloads: &[u32], lead_in: u32);

    /// Live auto-reload register value
    fn auto_reload(&self) -> u32;

    /// Words of the DMA stream already played and free to be rewritten
    fn reload_space(&mut self) -> usize;

    /// Append reload words behind the ones still queued
    ///
    /// Callers never queue more than [`PulseTimer::reload_space`] words.
    fn queue_reloads(&mut self, reloads: &[u32]);

    /// Wake `waker` on the next half or full transfer notification
    fn listen_reloads(&mut self, waker: &Waker);

    /// Stop the counter and the DMA stream
    fn disarm_transmit(&mut self);

    /// Configure falling (indirect) and rising (direct, filtered, counter
    /// reset) capture with per-channel interrupts
    fn arm_capture(&mut self);

    /// Read and acknowledge pending captures
    fn take_capture_events(&mut self) -> CaptureEvents;

    /// Stop the counter and capture channels, mask the interrupt
    fn disarm_capture(&mut self);

    /// Zero and enable the counter
    fn start_counter(&mut self);
}

/// Everything the driver needs from the board besides the chip
pub trait Board: DataLine + FrontEnd + PulseTimer + DelayNs {}

impl<T: DataLine + FrontEnd + PulseTimer + DelayNs> Board for T {}

/// Observer that mirrors the radio data level onto a debug output
pub trait LevelMirror {
    /// Take the output over (driven low)
    fn attach(&mut self);

    /// Drive the mirrored level
    fn set_level(&mut self, high: bool);

    /// Flip the output on every reload of the TX timer
    fn follow_reloads(&mut self);

    /// Release the output
    fn detach(&mut self);
}

/// Mirror that does nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMirror;

impl LevelMirror for NoMirror {
    fn attach(&mut self) {}

    fn set_level(&mut self, _high: bool) {}

    fn follow_reloads(&mut self) {}

    fn detach(&mut self) {}
}

/// Source of transmit durations (the protocol encoder)
///
/// Called while refilling the reload ring; must not block.
pub trait LevelSource {
    /// Produce the next run or marker
    fn next_level(&mut self) -> crate::types::LevelDuration;
}

impl<F> LevelSource for F
where
    F: FnMut() -> crate::types::LevelDuration,
{
    fn next_level(&mut self) -> crate::types::LevelDuration {
        self()
    }
}

/// Consumer of captured edges (the protocol decoder)
///
/// Called from the capture interrupt; must not block.
pub trait EdgeSink {
    /// `is_falling` is true when a high level of `duration` ticks just ended
    fn on_edge(&mut self, is_falling: bool, duration: u32);
}

impl<F> EdgeSink for F
where
    F: FnMut(bool, u32),
{
    fn on_edge(&mut self, is_falling: bool, duration: u32) {
        self(is_falling, duration);
    }
}
