//! `CC1101` Sub-GHz Transceiver Driver
//!
//! Register-level access over an `embedded-hal` [`SpiDevice`]. Every method
//! is one or two short SPI transactions; waiting for the chip state machine
//! is left to the caller.
//!
//! The synthesizer is programmed as `FREQ = f * 2^16 / f_xosc` with a
//! 26 MHz crystal, which quantizes requests to about 397 Hz.

use embedded_hal::spi::{Operation, SpiDevice};

use crate::config::{CC1101_FREQ_DIV, CC1101_XTAL_HZ};
use crate::error::{Error, Result};
use crate::radio::peripherals::{GdoConfig, RadioChip};
use crate::types::ChipState;

/// Header bits of an SPI access
mod access {
    pub const WRITE_BURST: u8 = 0x40;
    pub const READ_SINGLE: u8 = 0x80;
    pub const READ_BURST: u8 = 0xC0;
}

/// Command strobes
pub mod strobe {
    /// Chip reset
    pub const SRES: u8 = 0x30;
    /// Enable and calibrate the synthesizer
    pub const SFSTXON: u8 = 0x31;
    /// Calibrate the synthesizer and turn it off
    pub const SCAL: u8 = 0x33;
    /// Enable RX
    pub const SRX: u8 = 0x34;
    /// Enable TX
    pub const STX: u8 = 0x35;
    /// Exit RX / TX
    pub const SIDLE: u8 = 0x36;
    /// Power down when CSn goes high
    pub const SPWD: u8 = 0x39;
    /// Flush the RX FIFO
    pub const SFRX: u8 = 0x3A;
    /// Flush the TX FIFO
    pub const SFTX: u8 = 0x3B;
    /// No operation, returns the status byte
    pub const SNOP: u8 = 0x3D;
}

/// Configuration registers
pub mod reg {
    /// GDO2 output pin configuration
    pub const IOCFG2: u8 = 0x00;
    /// GDO0 output pin configuration
    pub const IOCFG0: u8 = 0x02;
    /// Frequency control word, high byte
    pub const FREQ2: u8 = 0x0D;
    /// Frequency control word, middle byte
    pub const FREQ1: u8 = 0x0E;
    /// Frequency control word, low byte
    pub const FREQ0: u8 = 0x0F;
    /// PA power table
    pub const PATABLE: u8 = 0x3E;
    /// RX / TX FIFO
    pub const FIFO: u8 = 0x3F;
}

/// Status registers (read with the burst bit set)
pub mod status {
    /// Part number
    pub const PARTNUM: u8 = 0x30;
    /// Silicon version
    pub const VERSION: u8 = 0x31;
    /// Link quality and CRC flag
    pub const LQI: u8 = 0x33;
    /// Received signal strength
    pub const RSSI: u8 = 0x34;
    /// Main radio control state machine
    pub const MARCSTATE: u8 = 0x35;
    /// TX FIFO fill level and underflow
    pub const TXBYTES: u8 = 0x3A;
    /// RX FIFO fill level and overflow
    pub const RXBYTES: u8 = 0x3B;
}

/// RX FIFO size in bytes
pub const FIFO_SIZE: usize = 64;

/// Frequency control word for `hz`
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn frequency_word(hz: u32) -> u32 {
    (hz as u64 * CC1101_FREQ_DIV / CC1101_XTAL_HZ as u64) as u32
}

/// Frequency produced by a control word
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn word_frequency(word: u32) -> u32 {
    (word as u64 * CC1101_XTAL_HZ as u64 / CC1101_FREQ_DIV) as u32
}

/// `CC1101` on an SPI device
pub struct Cc1101<SPI> {
    spi: SPI,
}

impl<SPI> Cc1101<SPI>
where
    SPI: SpiDevice,
{
    /// Wrap an SPI device (chip select handled by the device)
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Give back the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }

    /// Send a command strobe, returning the status byte
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn strobe(&mut self, command: u8) -> Result<u8> {
        let mut buf = [command];
        self.spi.transfer_in_place(&mut buf).map_err(bus_error)?;
        Ok(buf[0])
    }

    /// Read a configuration register
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn read_reg(&mut self, addr: u8) -> Result<u8> {
        let mut buf = [addr | access::READ_SINGLE, 0x00];
        self.spi.transfer_in_place(&mut buf).map_err(bus_error)?;
        Ok(buf[1])
    }

    /// Read a status register
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn read_status(&mut self, addr: u8) -> Result<u8> {
        let mut buf = [addr | access::READ_BURST, 0x00];
        self.spi.transfer_in_place(&mut buf).map_err(bus_error)?;
        Ok(buf[1])
    }

    /// Write consecutive registers starting at `addr`
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn write_burst(&mut self, addr: u8, data: &[u8]) -> Result<()> {
        let header = [addr | access::WRITE_BURST];
        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Write(data)])
            .map_err(bus_error)
    }

    /// Read and drop `count` bytes from the RX FIFO
    fn discard_fifo(&mut self, mut count: usize) -> Result<()> {
        let header = [reg::FIFO | access::READ_BURST];
        let mut scratch = [0u8; 16];
        while count > 0 {
            let chunk = count.min(scratch.len());
            self.spi
                .transaction(&mut [
                    Operation::Write(&header),
                    Operation::Read(&mut scratch[..chunk]),
                ])
                .map_err(bus_error)?;
            count -= chunk;
        }
        Ok(())
    }
}

fn bus_error<E: embedded_hal::spi::Error>(_error: E) -> Error {
    warn!("CC1101 SPI transfer failed");
    Error::Bus
}

impl<SPI> RadioChip for Cc1101<SPI>
where
    SPI: SpiDevice,
{
    fn reset(&mut self) -> Result<()> {
        self.strobe(strobe::SRES).map(drop)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.strobe(strobe::SPWD).map(drop)
    }

    fn switch_to_idle(&mut self) -> Result<()> {
        self.strobe(strobe::SIDLE).map(drop)
    }

    fn switch_to_rx(&mut self) -> Result<()> {
        self.strobe(strobe::SRX).map(drop)
    }

    fn switch_to_tx(&mut self) -> Result<()> {
        self.strobe(strobe::STX).map(drop)
    }

    fn calibrate(&mut self) -> Result<()> {
        self.strobe(strobe::SCAL).map(drop)
    }

    fn flush_rx(&mut self) -> Result<()> {
        self.strobe(strobe::SFRX).map(drop)
    }

    fn flush_tx(&mut self) -> Result<()> {
        self.strobe(strobe::SFTX).map(drop)
    }

    fn status(&mut self) -> Result<ChipState> {
        self.strobe(strobe::SNOP).map(ChipState::from_status)
    }

    fn write_reg(&mut self, addr: u8, value: u8) -> Result<()> {
        let mut buf = [addr, value];
        self.spi.transfer_in_place(&mut buf).map_err(bus_error)
    }

    fn set_gdo0(&mut self, config: GdoConfig) -> Result<()> {
        self.write_reg(reg::IOCFG0, config.raw())
    }

    fn set_gdo2(&mut self, config: GdoConfig) -> Result<()> {
        self.write_reg(reg::IOCFG2, config.raw())
    }

    fn set_frequency(&mut self, hz: u32) -> Result<u32> {
        let word = frequency_word(hz);
        let [_, freq2, freq1, freq0] = word.to_be_bytes();
        self.write_burst(reg::FREQ2, &[freq2, freq1, freq0])?;
        Ok(word_frequency(word))
    }

    fn set_pa_table(&mut self, table: &[u8; 8]) -> Result<()> {
        self.write_burst(reg::PATABLE, table)
    }

    fn write_fifo(&mut self, data: &[u8]) -> Result<()> {
        self.write_burst(reg::FIFO, data)
    }

    fn read_fifo(&mut self, data: &mut [u8]) -> Result<usize> {
        let mut len = [0u8];
        let header = [reg::FIFO | access::READ_SINGLE];
        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Read(&mut len)])
            .map_err(bus_error)?;

        let len = usize::from(len[0]).min(FIFO_SIZE);
        if len > data.len() {
            // Drop the whole payload so the next read starts on a length byte
            self.discard_fifo(len)?;
            warn!("dropped {} byte packet, buffer holds {}", len, data.len());
            return Err(Error::InvalidData);
        }
        if len == 0 {
            return Ok(0);
        }
        let header = [reg::FIFO | access::READ_BURST];
        self.spi
            .transaction(&mut [Operation::Write(&header), Operation::Read(&mut data[..len])])
            .map_err(bus_error)?;
        Ok(len)
    }

    fn rx_bytes(&mut self) -> Result<u8> {
        self.read_status(status::RXBYTES)
    }

    fn part_number(&mut self) -> Result<u8> {
        self.read_status(status::PARTNUM)
    }

    fn version(&mut self) -> Result<u8> {
        self.read_status(status::VERSION)
    }

    fn rssi_raw(&mut self) -> Result<u8> {
        self.read_status(status::RSSI)
    }

    fn lqi_raw(&mut self) -> Result<u8> {
        self.read_status(status::LQI)
    }
}
