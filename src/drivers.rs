//! Peripheral Drivers
//!
//! Drivers for external ICs. These sit on the `embedded-hal` traits and
//! implement the radio layer's chip interface.

pub mod cc1101;

pub use cc1101::Cc1101;
