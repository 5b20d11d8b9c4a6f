//! Radio Control Logic
//!
//! Regulatory gate, chip lifecycle and the interrupt-driven async TX and RX
//! sessions. Everything here is hardware independent; the board is reached
//! through the traits in [`peripherals`].

pub mod diagnostics;
pub mod middleware;
pub mod peripherals;
pub mod poll;
pub mod receive;
pub mod region;
pub mod regulatory;
pub mod shared;
pub mod state;
pub mod subghz;
pub mod transmit;

pub use peripherals::{Board, EdgeSink, LevelMirror, LevelSource, NoMirror, RadioChip};
pub use region::{Region, RegionBand};
pub use regulatory::RegulatoryGate;
pub use shared::IsrShared;
pub use state::DriverSettings;
pub use subghz::SubGhz;
