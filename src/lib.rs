//! Sub-GHz Transceiver Firmware Library
//!
//! This library drives a CC1101 sub-GHz transceiver attached to an
//! STM32G474. Waveforms are transmitted and captured asynchronously: TIM2
//! toggles or timestamps the chip's GD0 data line while DMA and interrupts
//! keep the pulse stream flowing without the CPU polling.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Protocol encoders / decoders (external)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      RADIO LAYER                             │
//! │  RegulatoryGate │ SubGhz lifecycle │ Async TX │ Async RX     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  CC1101 (SPI)  │  TIM2 + DMA1  │  GPIO                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Owned driver**: one [`radio::SubGhz`] value holds all transceiver
//!   state; interrupt handlers reach it through [`radio::IsrShared`]
//! - **Hardware behind traits**: the radio layer only sees
//!   [`radio::RadioChip`] and [`radio::Board`], so it runs on the host
//! - **No unsafe in application code**: unsafe is isolated in the HAL layer
//! - **Permission before carrier**: every frequency passes the regulatory
//!   tiers before TX can start

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(all(feature = "std", feature = "embedded"))]
compile_error!(
    "`std` and `embedded` are exclusive; build the target with \
     `--no-default-features --features embedded`"
);

// Must come first so the logging macros are visible in every module
#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_sync;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// STM32G474 implementations of the radio board traits.
#[cfg(feature = "embedded")]
pub mod hal;

/// Peripheral Drivers
///
/// Drivers for external ICs (CC1101).
pub mod drivers;

/// Radio Control Logic
///
/// Regulatory gate, lifecycle and async sessions.
pub mod radio;

/// Driver error type
pub mod error;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

pub use error::{Error, Result};

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::error::{Error, Result};
    pub use crate::radio::{DriverSettings, IsrShared, SubGhz};
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::digital::OutputPin;
    pub use embedded_hal::spi::SpiDevice;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
