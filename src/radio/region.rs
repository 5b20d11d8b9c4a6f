//! Regional transmit allow-list
//!
//! A region is provisioned at runtime by the application and lists the bands
//! where keying the carrier is legal.

use heapless::Vec;

use crate::config::MAX_REGION_BANDS;
use crate::error::{Error, Result};

/// One permitted band of a region
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionBand {
    /// Lowest permitted frequency in Hz
    pub start: u32,
    /// Highest permitted frequency in Hz
    pub end: u32,
    /// Maximum conducted power
    pub power_limit_dbm: i8,
    /// Maximum duty cycle
    pub duty_cycle_percent: u8,
}

impl RegionBand {
    /// Create a band with no power or duty restriction recorded
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end,
            power_limit_dbm: 12,
            duty_cycle_percent: 50,
        }
    }

    /// Set the power limit
    #[must_use]
    pub const fn with_power_limit(mut self, dbm: i8) -> Self {
        self.power_limit_dbm = dbm;
        self
    }

    /// Set the duty-cycle limit
    #[must_use]
    pub const fn with_duty_cycle(mut self, percent: u8) -> Self {
        self.duty_cycle_percent = percent;
        self
    }

    /// Check if `hz` lies inside the band
    #[must_use]
    pub const fn contains(&self, hz: u32) -> bool {
        self.start <= hz && self.end >= hz
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RegionBand {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{}..={} Hz {} dBm {}%",
            self.start,
            self.end,
            self.power_limit_dbm,
            self.duty_cycle_percent
        );
    }
}

/// Provisioned regulatory region
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    code: [u8; 2],
    bands: Vec<RegionBand, MAX_REGION_BANDS>,
}

impl Region {
    /// Create an empty region with a two-letter country code
    #[must_use]
    pub const fn new(code: [u8; 2]) -> Self {
        Self {
            code,
            bands: Vec::new(),
        }
    }

    /// Build a region from a band list
    ///
    /// # Errors
    ///
    /// [`Error::RegionFull`] if `bands` has more than [`MAX_REGION_BANDS`] entries.
    pub fn with_bands(code: [u8; 2], bands: &[RegionBand]) -> Result<Self> {
        let mut region = Self::new(code);
        for band in bands {
            region.push(*band)?;
        }
        Ok(region)
    }

    /// Append a band
    ///
    /// # Errors
    ///
    /// [`Error::RegionFull`] when the table is full.
    pub fn push(&mut self, band: RegionBand) -> Result<()> {
        self.bands.push(band).map_err(|_| Error::RegionFull)
    }

    /// Two-letter country code
    #[must_use]
    pub const fn code(&self) -> [u8; 2] {
        self.code
    }

    /// Provisioned bands
    #[must_use]
    pub fn bands(&self) -> &[RegionBand] {
        &self.bands
    }

    /// Band covering `hz`, if any
    #[must_use]
    pub fn band_for(&self, hz: u32) -> Option<&RegionBand> {
        self.bands.iter().find(|band| band.contains(hz))
    }

    /// Check if transmitting on `hz` is permitted in this region
    #[must_use]
    pub fn is_frequency_allowed(&self, hz: u32) -> bool {
        self.band_for(hz).is_some()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Region {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Region({=[u8]:a}, {} bands)",
            &self.code[..],
            self.bands.len()
        );
    }
}
