//! Simulated CC1101 and board shared by the integration tests
//!
//! The chip model and the board model share one [`Bench`], so a GDO0
//! configuration written over "SPI" shows up on the simulated data line and
//! the tests can inspect every side effect.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Wake, Waker};

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};

use subghz_firmware::config::{ASYNC_TX_BUFFER_FULL, ASYNC_TX_BUFFER_HALF};
use subghz_firmware::drivers::cc1101::{frequency_word, word_frequency};
use subghz_firmware::error::{Error, Result};
use subghz_firmware::radio::peripherals::{
    CaptureEvents, DataLine, DataLineMode, FrontEnd, GdoConfig, LevelMirror, PulseTimer,
    RadioChip,
};
use subghz_firmware::radio::SubGhz;
use subghz_firmware::types::{ChipState, LevelDuration};

pub type Shared = Arc<Mutex<Bench>>;

/// Driver wired to the simulated chip and board
pub type SimRadio<'cb> = SubGhz<'cb, FakeChip, SimBoard, SimMirror>;

// =============================================================================
// Bench state
// =============================================================================

/// Everything the simulated hardware knows
#[derive(Debug)]
pub struct Bench {
    // chip
    pub chip_state: ChipState,
    /// Chip ignores IDLE / RX / TX strobes
    pub chip_stuck: bool,
    /// Every chip call fails with a bus error
    pub bus_fault: bool,
    pub gdo0: Option<GdoConfig>,
    pub gdo2: Option<GdoConfig>,
    /// Data line ignores GDO0 and reads this level
    pub gdo0_stuck: Option<bool>,
    pub frequency_word: u32,
    pub registers: Vec<(u8, u8)>,
    pub pa_table: Option<[u8; 8]>,
    pub tx_fifo: Vec<u8>,
    pub rx_fifo: VecDeque<u8>,
    pub rssi_raw: u8,
    pub lqi_raw: u8,
    pub part_number: u8,
    pub version: u8,
    /// Strobes and register writes in order
    pub ops: Vec<String>,

    // board
    pub data_mode: DataLineMode,
    pub rf_switch: bool,
    pub amp: bool,
    pub elapsed_ns: u64,

    // timer
    pub arr: u32,
    pub counter_running: bool,
    pub transmit_armed: bool,

    // reload stream
    /// Memory the DMA stream reads, empty while disarmed
    pub dma_ring: Vec<u32>,
    pub dma_read: usize,
    pub dma_write: usize,
    /// Played words that may be rewritten
    pub dma_space: usize,
    /// Words queued after the prefill
    pub queued_words: usize,
    /// Wakers registered for the next notification
    pub reload_listeners: usize,

    pub capture_armed: bool,
    pub captures: VecDeque<CaptureEvents>,

    // mirror
    pub mirror_attached: bool,
    pub mirror_following: bool,
    pub mirror_levels: Vec<bool>,
}

impl Default for Bench {
    fn default() -> Self {
        Self {
            chip_state: ChipState::Idle,
            chip_stuck: false,
            bus_fault: false,
            gdo0: None,
            gdo2: None,
            gdo0_stuck: None,
            frequency_word: 0,
            registers: Vec::new(),
            pa_table: None,
            tx_fifo: Vec::new(),
            rx_fifo: VecDeque::new(),
            rssi_raw: 0,
            lqi_raw: 0,
            part_number: 0x00,
            version: 0x14,
            ops: Vec::new(),
            data_mode: DataLineMode::Analog,
            rf_switch: false,
            amp: false,
            elapsed_ns: 0,
            arr: 0,
            counter_running: false,
            transmit_armed: false,
            capture_armed: false,
            dma_ring: Vec::new(),
            dma_read: 0,
            dma_write: 0,
            dma_space: 0,
            queued_words: 0,
            reload_listeners: 0,
            captures: VecDeque::new(),
            mirror_attached: false,
            mirror_following: false,
            mirror_levels: Vec::new(),
        }
    }
}

impl Bench {
    /// Check if the strobe or write `op` was issued
    pub fn saw(&self, op: &str) -> bool {
        self.ops.iter().any(|o| o == op)
    }
}

// =============================================================================
// Chip model
// =============================================================================

pub struct FakeChip {
    bench: Shared,
}

impl FakeChip {
    fn op<T>(&mut self, name: &str, f: impl FnOnce(&mut Bench) -> T) -> Result<T> {
        let mut bench = self.bench.lock().unwrap();
        if bench.bus_fault {
            return Err(Error::Bus);
        }
        bench.ops.push(name.to_string());
        Ok(f(&mut bench))
    }

    fn strobe_to(&mut self, name: &str, target: ChipState) -> Result<()> {
        self.op(name, |b| {
            if !b.chip_stuck {
                b.chip_state = target;
            }
        })
    }
}

impl RadioChip for FakeChip {
    fn reset(&mut self) -> Result<()> {
        self.op("SRES", |b| {
            b.chip_state = ChipState::Idle;
            b.registers.clear();
        })
    }

    fn shutdown(&mut self) -> Result<()> {
        self.op("SPWD", |_| ())
    }

    fn switch_to_idle(&mut self) -> Result<()> {
        self.strobe_to("SIDLE", ChipState::Idle)
    }

    fn switch_to_rx(&mut self) -> Result<()> {
        self.strobe_to("SRX", ChipState::Rx)
    }

    fn switch_to_tx(&mut self) -> Result<()> {
        self.strobe_to("STX", ChipState::Tx)
    }

    fn calibrate(&mut self) -> Result<()> {
        self.strobe_to("SCAL", ChipState::Idle)
    }

    fn flush_rx(&mut self) -> Result<()> {
        self.op("SFRX", |b| b.rx_fifo.clear())
    }

    fn flush_tx(&mut self) -> Result<()> {
        self.op("SFTX", |b| b.tx_fifo.clear())
    }

    fn status(&mut self) -> Result<ChipState> {
        let bench = self.bench.lock().unwrap();
        if bench.bus_fault {
            return Err(Error::Bus);
        }
        Ok(bench.chip_state)
    }

    fn write_reg(&mut self, addr: u8, value: u8) -> Result<()> {
        self.op(&format!("W{addr:02x}={value:02x}"), |b| {
            b.registers.push((addr, value));
        })
    }

    fn set_gdo0(&mut self, config: GdoConfig) -> Result<()> {
        self.op(&format!("IOCFG0={:02x}", config.raw()), |b| {
            b.gdo0 = Some(config);
        })
    }

    fn set_gdo2(&mut self, config: GdoConfig) -> Result<()> {
        self.op(&format!("IOCFG2={:02x}", config.raw()), |b| {
            b.gdo2 = Some(config);
        })
    }

    fn set_frequency(&mut self, hz: u32) -> Result<u32> {
        let word = frequency_word(hz);
        self.op("FREQ", |b| b.frequency_word = word)?;
        Ok(word_frequency(word))
    }

    fn set_pa_table(&mut self, table: &[u8; 8]) -> Result<()> {
        self.op("PATABLE", |b| b.pa_table = Some(*table))
    }

    fn write_fifo(&mut self, data: &[u8]) -> Result<()> {
        self.op("TXFIFO", |b| b.tx_fifo.extend_from_slice(data))
    }

    fn read_fifo(&mut self, data: &mut [u8]) -> Result<usize> {
        self.op("RXFIFO", |b| {
            let Some(len) = b.rx_fifo.pop_front() else {
                return Ok(0);
            };
            let len = usize::from(len).min(64);
            if len > data.len() {
                b.rx_fifo.drain(..len.min(b.rx_fifo.len()));
                return Err(Error::InvalidData);
            }
            for slot in &mut data[..len] {
                *slot = b.rx_fifo.pop_front().unwrap_or(0);
            }
            Ok(len)
        })?
    }

    fn rx_bytes(&mut self) -> Result<u8> {
        self.op("RXBYTES", |b| u8::try_from(b.rx_fifo.len()).unwrap_or(u8::MAX))
    }

    fn part_number(&mut self) -> Result<u8> {
        self.op("PARTNUM", |b| b.part_number)
    }

    fn version(&mut self) -> Result<u8> {
        self.op("VERSION", |b| b.version)
    }

    fn rssi_raw(&mut self) -> Result<u8> {
        self.op("RSSI", |b| b.rssi_raw)
    }

    fn lqi_raw(&mut self) -> Result<u8> {
        self.op("LQI", |b| b.lqi_raw)
    }
}

// =============================================================================
// Board model
// =============================================================================

pub struct SimBoard {
    bench: Shared,
}

impl SimBoard {
    fn bench(&self) -> std::sync::MutexGuard<'_, Bench> {
        self.bench.lock().unwrap()
    }
}

impl DataLine for SimBoard {
    fn set_data_line_mode(&mut self, mode: DataLineMode) {
        self.bench().data_mode = mode;
    }

    fn data_line_is_high(&mut self) -> bool {
        let bench = self.bench();
        if let Some(level) = bench.gdo0_stuck {
            return level;
        }
        if bench.data_mode != DataLineMode::Input {
            return false;
        }
        bench.gdo0 == Some(GdoConfig::HARDWIRE.inverted())
    }
}

impl FrontEnd for SimBoard {
    fn set_rf_switch(&mut self, high: bool) {
        self.bench().rf_switch = high;
    }

    fn set_amp(&mut self, enabled: bool) {
        self.bench().amp = enabled;
    }
}

impl PulseTimer for SimBoard {
    fn arm_transmit(&mut self, reloads: &[u32], lead_in: u32) {
        let mut bench = self.bench();
        assert_eq!(reloads.len(), ASYNC_TX_BUFFER_FULL);
        bench.arr = lead_in;
        bench.transmit_armed = true;
        bench.dma_ring = reloads.to_vec();
        bench.dma_read = 0;
        bench.dma_write = 0;
        bench.dma_space = 0;
        bench.queued_words = 0;
    }

    fn auto_reload(&self) -> u32 {
        self.bench().arr
    }

    fn reload_space(&mut self) -> usize {
        self.bench().dma_space
    }

    fn queue_reloads(&mut self, reloads: &[u32]) {
        let mut bench = self.bench();
        assert!(reloads.len() <= bench.dma_space, "queued over unplayed words");
        for &word in reloads {
            let at = bench.dma_write;
            bench.dma_ring[at] = word;
            bench.dma_write = (at + 1) % ASYNC_TX_BUFFER_FULL;
        }
        bench.dma_space -= reloads.len();
        bench.queued_words += reloads.len();
    }

    fn listen_reloads(&mut self, _waker: &Waker) {
        self.bench().reload_listeners += 1;
    }

    fn disarm_transmit(&mut self) {
        let mut bench = self.bench();
        bench.transmit_armed = false;
        bench.counter_running = false;
        bench.dma_ring.clear();
        bench.dma_space = 0;
    }

    fn arm_capture(&mut self) {
        self.bench().capture_armed = true;
    }

    fn take_capture_events(&mut self) -> CaptureEvents {
        self.bench().captures.pop_front().unwrap_or_default()
    }

    fn disarm_capture(&mut self) {
        let mut bench = self.bench();
        bench.capture_armed = false;
        bench.counter_running = false;
    }

    fn start_counter(&mut self) {
        self.bench().counter_running = true;
    }
}

impl DelayNs for SimBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.bench().elapsed_ns += u64::from(ns);
    }
}

/// Mirror that records every level it is given
pub struct SimMirror {
    bench: Shared,
}

impl LevelMirror for SimMirror {
    fn attach(&mut self) {
        self.bench.lock().unwrap().mirror_attached = true;
    }

    fn set_level(&mut self, high: bool) {
        self.bench.lock().unwrap().mirror_levels.push(high);
    }

    fn follow_reloads(&mut self) {
        self.bench.lock().unwrap().mirror_following = true;
    }

    fn detach(&mut self) {
        let mut bench = self.bench.lock().unwrap();
        bench.mirror_attached = false;
        bench.mirror_following = false;
    }
}

// =============================================================================
// Harness helpers
// =============================================================================

/// Uninitialized driver on a fresh bench
pub fn radio<'cb>() -> (SimRadio<'cb>, Shared) {
    let bench = Shared::default();
    let chip = FakeChip {
        bench: bench.clone(),
    };
    let board = SimBoard {
        bench: bench.clone(),
    };
    let mirror = SimMirror {
        bench: bench.clone(),
    };
    (SubGhz::with_mirror(chip, board, mirror), bench)
}

/// Driver that passed its self test
pub fn idle_radio<'cb>() -> (SimRadio<'cb>, Shared) {
    let (mut radio, bench) = radio();
    radio.init().unwrap();
    bench.lock().unwrap().ops.clear();
    (radio, bench)
}

/// Scripted encoder: plays `levels`, then reports the end forever
pub fn script(levels: Vec<LevelDuration>) -> impl FnMut() -> LevelDuration + Send {
    let mut levels = levels.into_iter();
    move || levels.next().unwrap_or(LevelDuration::Reset)
}

/// Alternating high/low runs ending on a high run
pub fn square_wave(periods: usize, high: u32, low: u32) -> Vec<LevelDuration> {
    let mut levels = Vec::with_capacity(periods * 2);
    for i in 0..periods {
        levels.push(LevelDuration::high(high));
        if i + 1 < periods {
            levels.push(LevelDuration::low(low));
        }
    }
    levels.push(LevelDuration::Reset);
    levels
}

/// Edge recorder usable as a decoder
#[derive(Clone, Default)]
pub struct Edges(Arc<Mutex<Vec<(bool, u32)>>>);

impl Edges {
    pub fn sink(&self) -> impl FnMut(bool, u32) + Send {
        let edges = self.0.clone();
        move |is_falling, duration| edges.lock().unwrap().push((is_falling, duration))
    }

    pub fn taken(&self) -> Vec<(bool, u32)> {
        self.0.lock().unwrap().clone()
    }
}

/// Play the DMA stream of a running transmission
///
/// Each step moves the next word of the stream into ARR. At every half
/// boundary the notification runs the refill, as the woken reload task
/// would. Stops once a 0 reaches ARR or after `limit` updates. Returns the
/// ARR values in order.
pub fn run_dma(radio: &mut SimRadio<'_>, bench: &Shared, limit: usize) -> Vec<u32> {
    let mut seen = Vec::new();
    for _ in 0..limit {
        let (word, notify) = play_one(bench);
        seen.push(word);
        if notify {
            radio.service_transfer();
        }
        if word == 0 {
            break;
        }
    }
    seen
}

/// Move one word of the stream into ARR without servicing anything
///
/// Returns the word and whether a half or full notification fired.
pub fn play_one(bench: &Shared) -> (u32, bool) {
    let mut b = bench.lock().unwrap();
    assert!(b.transmit_armed, "transmission running");
    let word = b.dma_ring[b.dma_read];
    b.arr = word;
    b.dma_read = (b.dma_read + 1) % ASYNC_TX_BUFFER_FULL;
    b.dma_space += 1;
    (word, b.dma_read % ASYNC_TX_BUFFER_HALF == 0)
}

/// Waker counting its wake-ups
#[derive(Default)]
pub struct CountingWaker(AtomicUsize);

impl CountingWaker {
    pub fn waker() -> (Arc<Self>, Waker) {
        let counter = Arc::new(Self::default());
        let waker = Waker::from(counter.clone());
        (counter, waker)
    }

    pub fn wakes(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Wake for CountingWaker {
    fn wake(self: Arc<Self>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Queue one capture and run the interrupt handler
pub fn capture(radio: &mut SimRadio<'_>, bench: &Shared, events: CaptureEvents) {
    bench.lock().unwrap().captures.push_back(events);
    radio.on_capture_irq();
}

// =============================================================================
// SPI model for the register-level driver
// =============================================================================

/// SPI device recording every transaction
#[derive(Default)]
pub struct FakeSpi {
    /// Bytes clocked out per transaction
    pub transactions: Vec<Vec<u8>>,
    /// Bytes clocked in, in order (0 when exhausted)
    pub replies: VecDeque<u8>,
    pub fail: bool,
}

impl FakeSpi {
    pub fn replying(bytes: &[u8]) -> Self {
        Self {
            replies: bytes.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn next_reply(&mut self) -> u8 {
        self.replies.pop_front().unwrap_or(0)
    }
}

impl ErrorType for FakeSpi {
    type Error = ErrorKind;
}

impl SpiDevice for FakeSpi {
    fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> core::result::Result<(), ErrorKind> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        let mut out = Vec::new();
        for op in operations {
            match op {
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        out.push(0);
                        *byte = self.next_reply();
                    }
                }
                Operation::Write(buf) => out.extend_from_slice(buf),
                Operation::Transfer(read, write) => {
                    out.extend_from_slice(write);
                    for byte in read.iter_mut() {
                        *byte = self.next_reply();
                    }
                }
                Operation::TransferInPlace(buf) => {
                    out.extend_from_slice(buf);
                    for byte in buf.iter_mut() {
                        *byte = self.next_reply();
                    }
                }
                Operation::DelayNs(_) => {}
            }
        }
        self.transactions.push(out);
        Ok(())
    }
}
