//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the sub-GHz transceiver hardware.
//! All pin mappings, clock frequencies, and timing parameters are centralized here.

/// System clock frequency (STM32G474 @ 170MHz)
pub const SYSTEM_CLOCK_HZ: u32 = 170_000_000;

/// TIM2 kernel clock (APB1 timer clock equals SYSCLK with prescaler 1)
pub const TIMER_CLOCK_HZ: u32 = SYSTEM_CLOCK_HZ;

/// Duration tick rate: one tick is one microsecond
pub const TICK_HZ: u32 = 1_000_000;

/// TIM2 prescaler register value producing [`TICK_HZ`]
pub const TIMER_PRESCALER: u16 = (TIMER_CLOCK_HZ / TICK_HZ - 1) as u16;

/// Number of reload words in the async TX ring
pub const ASYNC_TX_BUFFER_FULL: usize = 256;

/// Number of reload words refilled per DMA notification
pub const ASYNC_TX_BUFFER_HALF: usize = ASYNC_TX_BUFFER_FULL / 2;

/// Inter-frame gap added on a wait marker, in ticks
pub const ASYNC_TX_GUARD_TIME: u32 = 999;

/// Auto-reload programmed before the first DMA update, in ticks
pub const ASYNC_TX_LEAD_IN: u32 = 1000;

/// Smallest reload written to the hardware register
pub const RELOAD_FLOOR: u32 = 1;

/// Capture counter auto-reload (free running, 31 bit)
pub const CAPTURE_AUTO_RELOAD: u32 = 0x7FFF_FFFE;

/// Capture input filter: fSAMPLING = fDTS/32, N = 8 (16us at 1MHz / 4)
pub const CAPTURE_FILTER: u8 = 0b1111;

/// Bounded wait for a chip status transition, in microseconds
pub const CHIP_POLL_TIMEOUT_US: u32 = 10_000;

/// Bounded wait for each GD0 level during the power-on self test
pub const SELF_TEST_TIMEOUT_US: u32 = 10_000;

/// Delay between two status polls, in microseconds
pub const POLL_STEP_US: u32 = 1;

/// CC1101 reference crystal
pub const CC1101_XTAL_HZ: u32 = 26_000_000;

/// CC1101 synthesizer divider (2^16)
pub const CC1101_FREQ_DIV: u64 = 0x1_0000;

/// SPI clock for the CC1101 (max 6.5MHz for burst access)
pub const SPI_FREQUENCY_HZ: u32 = 4_000_000;

/// Maximum number of bands in a provisioned region
pub const MAX_REGION_BANDS: usize = 16;

/// Default startup frequency (433.92 MHz ISM)
pub const DEFAULT_FREQUENCY_HZ: u32 = 433_920_000;

/// Depth of the edge queue between the capture ISR and the logger task
pub const EDGE_QUEUE_DEPTH: usize = 64;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED (directly on MCU)
    pub const LED_STATUS: &str = "PA5";

    /// CC1101 GDO0 (async data, TIM2_CH2 on AF1)
    pub const CC1101_GDO0: &str = "PA1";

    /// CC1101 chip select
    pub const CC1101_CS: &str = "PA4";

    /// SPI1 SCK
    pub const SPI1_SCK: &str = "PB3";

    /// SPI1 MISO
    pub const SPI1_MISO: &str = "PB4";

    /// SPI1 MOSI
    pub const SPI1_MOSI: &str = "PB5";

    /// RF path switch
    pub const RF_SW_0: &str = "PC0";

    /// External amplifier / LED enable
    pub const AMP_EN: &str = "PC1";

    /// Async mirror (debug) output, must be on GPIOB
    pub const ASYNC_MIRROR: &str = "PB0";
}

/// DMA channel assignments
pub mod dma {
    //! DMA channel assignments for the mirror stream
    //!
    //! DMA1 channel 1 carries the reload ring and is handed to the board as
    //! an `embassy-stm32` peripheral.

    /// DMA1 channel index feeding the mirror pin BSRR (channel 2)
    pub const MIRROR_CHANNEL: usize = 1;

    /// DMAMUX request line for TIM2 update
    pub const TIM2_UP_REQUEST: u8 = 60;
}

/// Timer assignments
pub mod timers {
    //! Hardware timer assignments

    /// Async TX toggle output and async RX capture
    pub const ASYNC: u8 = 2;

    /// Capture channel for the falling edge (indirect input)
    pub const FALLING_CHANNEL: usize = 0;

    /// Capture channel for the rising edge / toggle output (direct input)
    pub const RISING_CHANNEL: usize = 1;
}
