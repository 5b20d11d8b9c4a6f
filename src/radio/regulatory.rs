//! Tiered transmit permission
//!
//! A frequency may always be received. Transmitting requires passing, in
//! order:
//!
//! 1. the bands the transceiver can physically tune,
//! 2. the conservative default sub-ranges (skipped with `extended_range`),
//! 3. the provisioned region allow-list (skipped with `bypass_region`).
//!
//! The first failing tier decides the result. Overrides only skip their own
//! tier, never an earlier one.

use crate::types::{FrequencyRange, RegulationMode, TxCheck};

use super::region::Region;

/// Bands the CC1101 synthesizer can lock on
pub const CC1101_HARDWARE_BANDS: [FrequencyRange; 3] = [
    FrequencyRange::new(281_000_000, 361_000_000),
    FrequencyRange::new(378_000_000, 481_000_000),
    FrequencyRange::new(749_000_000, 962_000_000),
];

/// Unlicensed sub-ranges used unless `extended_range` is set
pub const DEFAULT_TX_RANGES: [FrequencyRange; 3] = [
    FrequencyRange::new(299_999_755, 350_000_335),
    FrequencyRange::new(386_999_938, 467_750_000),
    FrequencyRange::new(778_999_847, 928_000_000),
];

/// Transmit permission policy
#[derive(Clone, Debug)]
pub struct RegulatoryGate {
    hardware: &'static [FrequencyRange],
    defaults: &'static [FrequencyRange],
    extended_range: bool,
    bypass_region: bool,
    region: Option<Region>,
}

impl RegulatoryGate {
    /// Gate with custom band tables, no overrides and no region
    #[must_use]
    pub const fn new(
        hardware: &'static [FrequencyRange],
        defaults: &'static [FrequencyRange],
    ) -> Self {
        Self {
            hardware,
            defaults,
            extended_range: false,
            bypass_region: false,
            region: None,
        }
    }

    /// Gate with the CC1101 band tables
    #[must_use]
    pub const fn cc1101() -> Self {
        Self::new(&CC1101_HARDWARE_BANDS, &DEFAULT_TX_RANGES)
    }

    /// Enable or disable the extended range override
    #[must_use]
    pub fn with_extended_range(mut self, enabled: bool) -> Self {
        self.extended_range = enabled;
        self
    }

    /// Enable or disable the region bypass override
    #[must_use]
    pub fn with_bypass_region(mut self, enabled: bool) -> Self {
        self.bypass_region = enabled;
        self
    }

    /// Attach a provisioned region
    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Update both overrides in place
    pub fn set_overrides(&mut self, extended_range: bool, bypass_region: bool) {
        self.extended_range = extended_range;
        self.bypass_region = bypass_region;
    }

    /// Replace the provisioned region
    pub fn provision(&mut self, region: Region) {
        self.region = Some(region);
    }

    /// Forget the provisioned region
    pub fn clear_region(&mut self) {
        self.region = None;
    }

    /// Currently provisioned region
    #[must_use]
    pub const fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Extended range override
    #[must_use]
    pub const fn extended_range(&self) -> bool {
        self.extended_range
    }

    /// Region bypass override
    #[must_use]
    pub const fn bypass_region(&self) -> bool {
        self.bypass_region
    }

    /// Check if the transceiver can tune `hz` at all
    #[must_use]
    pub fn is_frequency_valid(&self, hz: u32) -> bool {
        self.hardware.iter().any(|band| band.contains(hz))
    }

    /// Run the tiers in order and report the first failure
    #[must_use]
    pub fn classify(&self, hz: u32) -> TxCheck {
        if !self.is_frequency_valid(hz) {
            return TxCheck::UnsupportedByHardware;
        }

        if !self.extended_range && !self.defaults.iter().any(|band| band.contains(hz)) {
            return TxCheck::BlockedByDefaultRange;
        }

        if !self.bypass_region {
            match &self.region {
                None => return TxCheck::BlockedRegionNotProvisioned,
                Some(region) if !region.is_frequency_allowed(hz) => {
                    return TxCheck::BlockedByRegion;
                }
                Some(_) => {}
            }
        }

        TxCheck::Allowed
    }

    /// Classify `hz`, logging the reason when transmitting is blocked
    #[must_use]
    pub fn check_tx(&self, hz: u32) -> TxCheck {
        let check = self.classify(hz);
        match check {
            TxCheck::Allowed => {}
            TxCheck::UnsupportedByHardware => {
                warn!("TX blocked: {} Hz not supported by hardware", hz);
            }
            TxCheck::BlockedByDefaultRange => {
                warn!("TX blocked: {} Hz outside default range", hz);
            }
            TxCheck::BlockedRegionNotProvisioned => {
                warn!("TX blocked: region not provisioned");
            }
            TxCheck::BlockedByRegion => {
                warn!("TX blocked: {} Hz not allowed in region", hz);
            }
        }
        check
    }

    /// Check if transmitting on `hz` is permitted
    #[must_use]
    pub fn is_tx_allowed(&self, hz: u32) -> bool {
        self.check_tx(hz).is_allowed()
    }

    /// Regulation matching a check result
    #[must_use]
    pub const fn regulation_for(check: TxCheck) -> RegulationMode {
        if check.is_allowed() {
            RegulationMode::ReceiveAndTransmit
        } else {
            RegulationMode::ReceiveOnly
        }
    }
}

impl Default for RegulatoryGate {
    fn default() -> Self {
        Self::cc1101()
    }
}
