//! RSSI, LQI and chip identification

/// RSSI offset of the CC1101 at the data rates used here, in dB
pub const RSSI_OFFSET_DB: f32 = 74.0;

/// Convert the raw RSSI status byte to dBm
///
/// The register is a two's complement value in half-dB steps.
#[must_use]
pub fn rssi_dbm(raw: u8) -> f32 {
    let half_db = if raw >= 128 {
        f32::from(raw) - 256.0
    } else {
        f32::from(raw)
    };
    half_db / 2.0 - RSSI_OFFSET_DB
}

/// Link quality estimate from the raw LQI status byte
#[must_use]
pub const fn lqi(raw: u8) -> u8 {
    raw & 0x7F
}

/// CRC flag carried in bit 7 of the LQI status byte
#[must_use]
pub const fn crc_ok(raw: u8) -> bool {
    raw & 0x80 != 0
}

/// Chip identification registers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChipInfo {
    /// PARTNUM (0x00 for CC1101)
    pub part_number: u8,
    /// VERSION (0x14 on current silicon)
    pub version: u8,
}

#[cfg(feature = "embedded")]
impl defmt::Format for ChipInfo {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "partnum {=u8:#x}, version {=u8:#x}", self.part_number, self.version);
    }
}
