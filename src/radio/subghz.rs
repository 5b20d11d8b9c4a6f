//! Sub-GHz transceiver driver
//!
//! One [`SubGhz`] owns the chip controller, the board peripherals and the
//! optional level mirror. Thread-mode code calls the lifecycle and session
//! methods, the capture interrupt calls [`SubGhz::on_capture_irq`] and the
//! reload task drives [`SubGhz::poll_transfer`] from the DMA notifications.
//! On the target the driver sits in an
//! [`IsrShared`](super::shared::IsrShared) so every caller goes through a
//! critical section.
//!
//! ```text
//!  Uninitialized ──init──> Idle <──stop──> AsyncReceiving
//!        │                  ^ │
//!        └──(self test)──>  │ └──start──> AsyncTransmitting
//!                Faulty ──init┘
//! ```

use core::task::{Poll, Waker};

use crate::config::{
    ASYNC_TX_BUFFER_HALF, ASYNC_TX_LEAD_IN, CHIP_POLL_TIMEOUT_US, SELF_TEST_TIMEOUT_US,
};
use crate::error::{Error, Result};
use crate::types::{ChipState, Path, RegulationMode, TransceiverState, TxCheck};

use super::diagnostics::{self, ChipInfo};
use super::peripherals::{Board, DataLineMode, GdoConfig, LevelMirror, NoMirror, RadioChip};
use super::poll;
use super::receive::{AsyncRx, Decoder};
use super::region::Region;
use super::regulatory::RegulatoryGate;
use super::state::{DriverSettings, DriverState};
use super::transmit::{AsyncTx, DutyCycle, Encoder, Refill, ReloadBuffer};

/// Maximum payload of one FIFO packet
pub const MAX_PACKET_LEN: usize = 64;

/// Async half-duplex transceiver driver
pub struct SubGhz<'cb, C, B, M = NoMirror> {
    chip: C,
    board: B,
    mirror: M,
    gate: RegulatoryGate,
    settings: DriverSettings,
    status: DriverState,
    /// Requested frequency and its check result, for error reporting
    frequency: u32,
    tx_check: TxCheck,
    tx: Option<AsyncTx<'cb>>,
    rx: Option<AsyncRx<'cb>>,
    /// Reload task parked until the next transmission
    transfer_waker: Option<Waker>,
}

impl<'cb, C, B> SubGhz<'cb, C, B, NoMirror>
where
    C: RadioChip,
    B: Board,
{
    /// Driver without a level mirror
    pub fn new(chip: C, board: B) -> Self {
        Self::with_mirror(chip, board, NoMirror)
    }
}

impl<'cb, C, B, M> SubGhz<'cb, C, B, M>
where
    C: RadioChip,
    B: Board,
    M: LevelMirror,
{
    /// Driver mirroring the data level onto `mirror`
    pub fn with_mirror(chip: C, board: B, mirror: M) -> Self {
        Self {
            chip,
            board,
            mirror,
            gate: RegulatoryGate::cc1101(),
            settings: DriverSettings::new(),
            status: DriverState::new(),
            frequency: 0,
            tx_check: TxCheck::Allowed,
            tx: None,
            rx: None,
            transfer_waker: None,
        }
    }

    /// Replace the regulatory band tables
    #[must_use]
    pub fn with_gate(mut self, gate: RegulatoryGate) -> Self {
        self.gate = gate;
        self.gate
            .set_overrides(self.settings.extended_range, self.settings.bypass_region);
        self
    }

    /// Give back the peripherals
    pub fn release(self) -> (C, B, M) {
        (self.chip, self.board, self.mirror)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Coarse transceiver state
    #[must_use]
    pub const fn state(&self) -> TransceiverState {
        self.status.state()
    }

    /// Regulation of the last programmed frequency
    #[must_use]
    pub const fn regulation(&self) -> RegulationMode {
        self.status.regulation()
    }

    /// Last requested frequency in Hz (0 before the first one)
    #[must_use]
    pub const fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Current settings
    #[must_use]
    pub const fn settings(&self) -> DriverSettings {
        self.settings
    }

    /// Apply new settings
    ///
    /// Overrides affect the next [`set_frequency`](Self::set_frequency); the
    /// regulation of the programmed frequency is not recomputed.
    pub fn set_settings(&mut self, settings: DriverSettings) {
        self.settings = settings;
        self.gate
            .set_overrides(settings.extended_range, settings.bypass_region);
        debug!("settings updated");
    }

    /// Rolling-code counter multiplier for protocol encoders
    #[must_use]
    pub const fn rolling_counter_mult(&self) -> u8 {
        self.settings.rolling_counter_mult
    }

    /// Regulatory gate
    #[must_use]
    pub const fn gate(&self) -> &RegulatoryGate {
        &self.gate
    }

    /// Install a regional allow-list
    pub fn provision_region(&mut self, region: Region) {
        info!("region provisioned, {} bands", region.bands().len());
        self.gate.provision(region);
    }

    /// Remove the regional allow-list
    pub fn clear_region(&mut self) {
        info!("region cleared");
        self.gate.clear_region();
    }

    /// Chip controller
    pub fn chip_mut(&mut self) -> &mut C {
        &mut self.chip
    }

    /// Board peripherals
    #[must_use]
    pub const fn board(&self) -> &B {
        &self.board
    }

    /// Board peripherals
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Reload ring of the running transmission
    #[must_use]
    pub fn reload_buffer(&self) -> Option<&ReloadBuffer> {
        self.tx.as_ref().map(AsyncTx::buffer)
    }

    /// Duty-cycle totals of the running transmission
    #[must_use]
    pub fn duty_cycle(&self) -> Option<DutyCycle> {
        self.tx.as_ref().map(AsyncTx::duty)
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Power-on self test
    ///
    /// Forces GD0 low then high through the chip and checks that the MCU sees
    /// both levels. The driver is `Faulty` until the test passes; a failed
    /// test may be repeated.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] unless `Uninitialized` or `Faulty`,
    /// [`Error::SelfTestFailed`] when GD0 does not follow, [`Error::Bus`].
    pub fn init(&mut self) -> Result<()> {
        match self.state() {
            TransceiverState::Uninitialized | TransceiverState::Faulty => {}
            actual => {
                return Err(Error::InvalidState {
                    expected: TransceiverState::Uninitialized,
                    actual,
                })
            }
        }
        self.status = self.status.with_state(TransceiverState::Faulty);

        match self.self_test() {
            Ok(true) => {
                self.status = self.status.with_state(TransceiverState::Idle);
                info!("Init OK");
                Ok(())
            }
            Ok(false) => {
                self.board.set_data_line_mode(DataLineMode::Analog);
                error!("Init failed: GD0 did not follow");
                Err(Error::SelfTestFailed)
            }
            Err(e) => {
                self.board.set_data_line_mode(DataLineMode::Analog);
                error!("Init failed: {:?}", e);
                Err(e)
            }
        }
    }

    fn self_test(&mut self) -> Result<bool> {
        self.board.set_data_line_mode(DataLineMode::Analog);
        self.chip.reset()?;
        self.chip.set_gdo0(GdoConfig::HIGH_IMPEDANCE)?;

        self.board.set_data_line_mode(DataLineMode::Input);

        self.chip.set_gdo0(GdoConfig::HARDWIRE)?;
        if !self.wait_data_line(false)? {
            return Ok(false);
        }

        self.chip.set_gdo0(GdoConfig::HARDWIRE.inverted())?;
        if !self.wait_data_line(true)? {
            return Ok(false);
        }

        self.chip.set_gdo0(GdoConfig::HIGH_IMPEDANCE)?;
        self.board.set_data_line_mode(DataLineMode::Analog);

        self.board.set_rf_switch(false);
        self.chip.set_gdo2(GdoConfig::HARDWIRE)?;

        self.chip.shutdown()?;
        Ok(true)
    }

    fn wait_data_line(&mut self, high: bool) -> Result<bool> {
        poll::wait_until(&mut self.board, SELF_TEST_TIMEOUT_US, |board| {
            Ok(board.data_line_is_high() == high)
        })
    }

    /// Wait for the chip to report `target`
    ///
    /// # Panics
    ///
    /// When the chip does not get there within the poll bound.
    fn wait_chip(&mut self, target: ChipState) -> Result<()> {
        let chip = &mut self.chip;
        let reached = poll::wait_until(&mut self.board, CHIP_POLL_TIMEOUT_US, |_| {
            Ok(chip.status()? == target)
        })?;
        if !reached {
            error!("chip stuck before {:?}", target);
            panic!("chip did not reach {target:?} within {CHIP_POLL_TIMEOUT_US} us");
        }
        Ok(())
    }

    /// Reset the chip and float GD0
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn reset(&mut self) -> Result<()> {
        self.board.set_data_line_mode(DataLineMode::Analog);
        self.chip.switch_to_idle()?;
        self.chip.reset()?;
        // GD0 defaults to a push-pull clock output after reset.
        self.chip.set_gdo0(GdoConfig::HIGH_IMPEDANCE)
    }

    /// Idle the chip and power it down
    ///
    /// # Panics
    ///
    /// Unless `Idle`, or when the chip does not acknowledge IDLE.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn sleep(&mut self) -> Result<()> {
        self.status.assert(TransceiverState::Idle);
        self.chip.switch_to_idle()?;
        self.chip.set_gdo0(GdoConfig::HIGH_IMPEDANCE)?;
        self.board.set_data_line_mode(DataLineMode::Analog);
        self.chip.shutdown()
    }

    /// Power the chip down from any state
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn shutdown(&mut self) -> Result<()> {
        self.chip.shutdown()
    }

    /// Switch the chip to IDLE and wait for it
    ///
    /// # Panics
    ///
    /// When the chip does not get there within the poll bound.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn idle(&mut self) -> Result<()> {
        self.chip.switch_to_idle()?;
        self.wait_chip(ChipState::Idle)
    }

    /// Switch the chip to RX and wait for it
    ///
    /// # Panics
    ///
    /// When the chip does not get there within the poll bound.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn rx(&mut self) -> Result<()> {
        self.chip.switch_to_rx()?;
        self.wait_chip(ChipState::Rx)
    }

    /// Switch the chip to TX and wait for it
    ///
    /// # Panics
    ///
    /// When the chip does not get there within the poll bound.
    ///
    /// # Errors
    ///
    /// [`Error::TxNotPermitted`] when the programmed frequency is receive
    /// only, [`Error::Bus`].
    pub fn tx(&mut self) -> Result<()> {
        if self.regulation() != RegulationMode::ReceiveAndTransmit {
            return Err(Error::TxNotPermitted(self.tx_check));
        }
        self.chip.switch_to_tx()?;
        self.wait_chip(ChipState::Tx)
    }

    // ------------------------------------------------------------------------
    // Frequency and path
    // ------------------------------------------------------------------------

    /// Classify `hz` against the transmit tiers
    #[must_use]
    pub fn check_tx(&self, hz: u32) -> TxCheck {
        self.gate.check_tx(hz)
    }

    /// Check if transmitting on `hz` is permitted
    #[must_use]
    pub fn is_tx_allowed(&self, hz: u32) -> bool {
        self.gate.is_tx_allowed(hz)
    }

    /// Check if the chip can tune `hz`
    #[must_use]
    pub fn is_frequency_valid(&self, hz: u32) -> bool {
        self.gate.is_frequency_valid(hz)
    }

    /// Program and calibrate the synthesizer
    ///
    /// Always succeeds for reception. Transmission is enabled only when `hz`
    /// passes every regulatory tier. Returns the realized frequency.
    ///
    /// # Panics
    ///
    /// When calibration does not return the chip to IDLE.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn set_frequency(&mut self, hz: u32) -> Result<u32> {
        let check = self.gate.check_tx(hz);
        let regulation = RegulatoryGate::regulation_for(check);
        self.status = self.status.with_regulation(regulation);
        self.frequency = hz;
        self.tx_check = check;

        let realized = self.chip.set_frequency(hz)?;
        self.chip.calibrate()?;
        self.wait_chip(ChipState::Idle)?;

        debug!("frequency {} Hz, realized {} Hz, {:?}", hz, realized, regulation);
        Ok(realized)
    }

    /// Select the analog front-end path
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn set_path(&mut self, path: Path) -> Result<()> {
        self.board.set_rf_switch(path.rf_switch());
        let gdo2 = if path.gdo2_inverted() {
            GdoConfig::HARDWIRE.inverted()
        } else {
            GdoConfig::HARDWIRE
        };
        self.chip.set_gdo2(gdo2)?;
        debug!("path {:?}", path);
        Ok(())
    }

    /// Program `hz` and the path covering the realized frequency
    ///
    /// # Errors
    ///
    /// [`Error::FrequencyUnsupported`] when no path covers the realized
    /// frequency (the synthesizer stays programmed), [`Error::Bus`].
    pub fn set_frequency_and_path(&mut self, hz: u32) -> Result<u32> {
        let realized = self.set_frequency(hz)?;
        let path = Path::for_frequency(realized).ok_or(Error::FrequencyUnsupported(realized))?;
        self.set_path(path)?;
        Ok(realized)
    }

    // ------------------------------------------------------------------------
    // Async receive
    // ------------------------------------------------------------------------

    /// Start capturing GD0 edges into `decoder`
    ///
    /// # Panics
    ///
    /// When the chip does not enter RX within the poll bound.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] unless `Idle` (nothing changed),
    /// [`Error::Bus`].
    pub fn start_async_rx(&mut self, decoder: Decoder<'cb>) -> Result<()> {
        self.status.require(TransceiverState::Idle)?;
        self.status = self.status.with_state(TransceiverState::AsyncReceiving);
        self.rx = Some(AsyncRx::new(decoder));

        self.board.set_data_line_mode(DataLineMode::Timer);
        self.board.arm_capture();
        self.board.start_counter();
        self.mirror.attach();

        self.rx()?;
        info!("async RX started");
        Ok(())
    }

    /// Capture interrupt entry point
    pub fn on_capture_irq(&mut self) {
        let events = self.board.take_capture_events();
        let Some(session) = self.rx.as_mut() else {
            return;
        };
        let mirror = &mut self.mirror;
        session.dispatch(events, |high| mirror.set_level(high));
    }

    /// Stop capturing and return to `Idle`
    ///
    /// # Panics
    ///
    /// Unless `AsyncReceiving`, or when the chip does not acknowledge IDLE.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn stop_async_rx(&mut self) -> Result<()> {
        self.status.assert(TransceiverState::AsyncReceiving);
        self.status = self.status.with_state(TransceiverState::Idle);

        let idled = self.idle();

        self.board.disarm_capture();
        self.mirror.detach();
        self.rx = None;
        self.board.set_data_line_mode(DataLineMode::Analog);

        info!("async RX stopped");
        idled
    }

    // ------------------------------------------------------------------------
    // Async transmit
    // ------------------------------------------------------------------------

    /// Start transmitting the waveform produced by `encoder`
    ///
    /// Both halves of the reload ring are filled before the counter starts.
    /// The chip is switched to TX last, right before the counter.
    ///
    /// # Panics
    ///
    /// When the chip does not enter TX within the poll bound.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] unless `Idle`, [`Error::TxNotPermitted`] when
    /// the programmed frequency is receive only. Nothing changes in either
    /// case. [`Error::Bus`] leaves the session running; stop it.
    pub fn start_async_tx(&mut self, encoder: Encoder<'cb>) -> Result<()> {
        self.status.require(TransceiverState::Idle)?;
        if self.regulation() != RegulationMode::ReceiveAndTransmit {
            warn!("async TX refused at {} Hz: {:?}", self.frequency, self.tx_check);
            return Err(Error::TxNotPermitted(self.tx_check));
        }
        self.status = self.status.with_state(TransceiverState::AsyncTransmitting);

        let session = self.tx.insert(AsyncTx::new(encoder));
        self.board.set_data_line_mode(DataLineMode::Timer);

        if let Refill::Ended { index } = session.prefill() {
            trace!("waveform ends at reload {}", index);
        }
        self.board.arm_transmit(session.buffer().as_slice(), ASYNC_TX_LEAD_IN);

        self.mirror.attach();
        self.mirror.follow_reloads();

        if self.settings.ext_leds_and_amp {
            self.board.set_amp(true);
        }
        self.tx()?;

        self.board.start_counter();
        if let Some(waker) = self.transfer_waker.take() {
            waker.wake();
        }
        info!("async TX started");
        Ok(())
    }

    /// Refill every half the DMA stream has played
    ///
    /// Returns the number of halves queued. Once the end value is queued
    /// nothing is refilled until the next transmission.
    pub fn service_transfer(&mut self) -> usize {
        let Some(session) = self.tx.as_mut() else {
            return 0;
        };

        let mut queued = 0;
        while session.end_index().is_none() && self.board.reload_space() >= ASYNC_TX_BUFFER_HALF
        {
            let (half, refill) = session.refill_next();
            self.board.queue_reloads(session.buffer().half(half));
            queued += 1;
            if let Refill::Ended { index } = refill {
                trace!("waveform ends at reload {}", index);
            }
        }
        queued
    }

    /// Reload task entry point
    ///
    /// Ready with the number of halves queued once there was something to
    /// refill. Otherwise `waker` is woken by the next transfer notification,
    /// or by the next [`start_async_tx`](Self::start_async_tx) when no
    /// waveform is waiting for refills.
    pub fn poll_transfer(&mut self, waker: &Waker) -> Poll<usize> {
        let queued = self.service_transfer();
        if queued > 0 {
            return Poll::Ready(queued);
        }

        match &self.tx {
            Some(session) if session.end_index().is_none() => {
                self.board.listen_reloads(waker);
            }
            _ => self.transfer_waker = Some(waker.clone()),
        }

        // A notification may have landed before the waker was registered
        match self.service_transfer() {
            0 => Poll::Pending,
            queued => Poll::Ready(queued),
        }
    }

    /// True once the end value reached the live auto-reload register
    #[must_use]
    pub fn is_async_tx_complete(&self) -> bool {
        self.state() == TransceiverState::AsyncTransmitting && self.board.auto_reload() == 0
    }

    /// Stop transmitting and return to `Idle`
    ///
    /// The timer and DMA stream are disarmed before the reload ring is
    /// dropped. Returns the duty-cycle totals of the session.
    ///
    /// # Panics
    ///
    /// Unless `AsyncTransmitting`, or when the chip does not acknowledge
    /// IDLE.
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn stop_async_tx(&mut self) -> Result<DutyCycle> {
        self.status.assert(TransceiverState::AsyncTransmitting);

        let idled = self.idle();

        self.board.set_data_line_mode(DataLineMode::Analog);
        self.board.set_amp(false);
        self.board.disarm_transmit();
        self.mirror.detach();

        let duty = self.tx.take().map(|session| session.duty()).unwrap_or_default();
        info!(
            "async TX stopped: on {} ticks, off {} ticks, duty {}%",
            duty.high,
            duty.low,
            duty.percent_rounded()
        );

        self.status = self.status.with_state(TransceiverState::Idle);
        idled.map(|()| duty)
    }

    // ------------------------------------------------------------------------
    // Presets
    // ------------------------------------------------------------------------

    /// Reset the chip and write `(address, value)` pairs
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn load_registers(&mut self, registers: &[(u8, u8)]) -> Result<()> {
        self.reset()?;
        for &(addr, value) in registers {
            self.chip.write_reg(addr, value)?;
        }
        Ok(())
    }

    /// Load the PA table
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn load_patable(&mut self, table: &[u8; 8]) -> Result<()> {
        self.chip.set_pa_table(table)
    }

    /// Load a serialized preset
    ///
    /// Layout: `(address, value)` pairs up to a zero address, one more
    /// separator byte, then the eight PA table bytes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidData`] when the pairs are not terminated or the PA
    /// table is truncated (checked before touching the chip),
    /// [`Error::Bus`].
    pub fn load_custom_preset(&mut self, preset: &[u8]) -> Result<()> {
        let mut end = 0;
        while preset.get(end).is_some_and(|&addr| addr != 0) {
            end += 2;
        }
        if end >= preset.len() {
            return Err(Error::InvalidData);
        }
        let pa_table: [u8; 8] = preset
            .get(end + 2..end + 10)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(Error::InvalidData)?;

        self.reset()?;
        for pair in preset[..end].chunks_exact(2) {
            self.chip.write_reg(pair[0], pair[1])?;
        }
        self.load_patable(&pa_table)?;

        debug!("custom preset: {} registers", end / 2);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Packet mode
    // ------------------------------------------------------------------------

    /// Queue a length-prefixed packet in the TX FIFO
    ///
    /// # Errors
    ///
    /// [`Error::InvalidData`] for an empty packet or one longer than
    /// [`MAX_PACKET_LEN`], [`Error::Bus`].
    pub fn write_packet(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() || data.len() > MAX_PACKET_LEN {
            return Err(Error::InvalidData);
        }
        #[allow(clippy::cast_possible_truncation)]
        let len = data.len() as u8;
        self.chip.flush_tx()?;
        self.chip.write_fifo(&[len])?;
        self.chip.write_fifo(data)
    }

    /// Read a received packet, returning its length
    ///
    /// # Errors
    ///
    /// [`Error::InvalidData`] when the packet does not fit in `data`; it is
    /// dropped so the next read starts on the following packet.
    /// [`Error::Bus`].
    pub fn read_packet(&mut self, data: &mut [u8]) -> Result<usize> {
        self.chip.read_fifo(data)
    }

    /// Drop everything in the RX FIFO
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn flush_rx(&mut self) -> Result<()> {
        self.chip.flush_rx()
    }

    /// Drop everything in the TX FIFO
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn flush_tx(&mut self) -> Result<()> {
        self.chip.flush_tx()
    }

    /// Check if the RX FIFO holds data
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn rx_pipe_not_empty(&mut self) -> Result<bool> {
        Ok(self.chip.rx_bytes()? & 0x7F > 0)
    }

    /// CRC flag of the last received packet
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn is_rx_data_crc_valid(&mut self) -> Result<bool> {
        Ok(diagnostics::crc_ok(self.chip.lqi_raw()?))
    }

    // ------------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------------

    /// Received signal strength in dBm
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn rssi(&mut self) -> Result<f32> {
        Ok(diagnostics::rssi_dbm(self.chip.rssi_raw()?))
    }

    /// Link quality indicator (7 bit)
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn lqi(&mut self) -> Result<u8> {
        Ok(diagnostics::lqi(self.chip.lqi_raw()?))
    }

    /// Read and log the chip identification
    ///
    /// # Errors
    ///
    /// [`Error::Bus`].
    pub fn dump_state(&mut self) -> Result<ChipInfo> {
        let info = ChipInfo {
            part_number: self.chip.part_number()?,
            version: self.chip.version()?,
        };
        info!("cc1101 chip {}, version {}", info.part_number, info.version);
        Ok(info)
    }
}
