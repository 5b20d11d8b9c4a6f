//! Sub-GHz Transceiver Main Application
//!
//! Entry point for the STM32G474 + CC1101 firmware.
//! Brings the radio up, tunes the default frequency and logs every
//! captured edge.

#![no_std]
#![no_main]

use core::future::poll_fn;
use core::task::Poll;

use defmt::{info, trace};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::interrupt::typelevel::{Handler, TIM2};
use embassy_stm32::mode::Blocking;
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_stm32::bind_interrupts;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Delay, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use subghz_firmware::drivers::Cc1101;
use subghz_firmware::hal::{self, DataPin, DmaMirror, FrontEndPins, RadioBoard, StatusLed};
use subghz_firmware::prelude::*;
use subghz_firmware::radio::EdgeSink;

type RadioSpi = ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, Delay>;
type Radio = SubGhz<'static, Cc1101<RadioSpi>, RadioBoard<'static>, DmaMirror>;

/// Driver shared with the TIM2 handler and the reload task
static RADIO: IsrShared<Radio> = IsrShared::new();

/// Edges handed from the capture interrupt to the logger task
static EDGES: Channel<CriticalSectionRawMutex, (bool, u32), EDGE_QUEUE_DEPTH> = Channel::new();

static EDGE_SINK: StaticCell<EdgeForwarder> = StaticCell::new();

/// Capture sink that queues edges without blocking
///
/// Edges are dropped while the queue is full.
struct EdgeForwarder;

impl EdgeSink for EdgeForwarder {
    fn on_edge(&mut self, is_falling: bool, duration: u32) {
        let _ = EDGES.try_send((is_falling, duration));
    }
}

/// TIM2 raises the edge captures; transmit refills never interrupt here
struct AsyncDataIrq;

impl Handler<TIM2> for AsyncDataIrq {
    unsafe fn on_interrupt() {
        RADIO.with(|radio| radio.on_capture_irq());
    }
}

bind_interrupts!(struct Irqs {
    TIM2 => AsyncDataIrq;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Sub-GHz Firmware v{}", env!("CARGO_PKG_VERSION"));

    // 16 MHz HSI / 4 * 85 / 2 = 170 MHz
    let mut config = embassy_stm32::Config::default();
    {
        use embassy_stm32::rcc::{Pll, PllMul, PllPreDiv, PllRDiv, PllSource, Sysclk};
        config.rcc.pll = Some(Pll {
            source: PllSource::HSI,
            prediv: PllPreDiv::DIV4,
            mul: PllMul::MUL85,
            divp: None,
            divq: None,
            divr: Some(PllRDiv::DIV2),
        });
        config.rcc.sys = Sysclk::PLL1_R;
        config.rcc.boost = true;
    }
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    let led = StatusLed::new(Output::new(p.PA5, Level::Low, Speed::Low));

    // PB3 = SCK, PB4 = MISO, PB5 = MOSI, PA4 = CSn
    let mut spi_config = spi::Config::default();
    spi_config.frequency = Hertz(SPI_FREQUENCY_HZ);
    let bus = Spi::new_blocking(p.SPI1, p.PB3, p.PB5, p.PB4, spi_config);
    let cs = Output::new(p.PA4, Level::High, Speed::VeryHigh);
    let device = ExclusiveDevice::new(bus, cs, Delay).unwrap();

    let front_end = FrontEndPins::new(
        Output::new(p.PC0, Level::Low, Speed::Low),
        Output::new(p.PC1, Level::Low, Speed::Low),
    );
    let board = RadioBoard::new(DataPin::pa1(), front_end, p.DMA1_CH1);

    info!("SPI1 initialized at {} Hz", SPI_FREQUENCY_HZ);

    let mut radio = SubGhz::with_mirror(
        Cc1101::new(device),
        board,
        DmaMirror::portb(0, p.DMA1_CH2),
    );
    radio.init().unwrap();
    radio.dump_state().unwrap();
    let realized = radio.set_frequency_and_path(DEFAULT_FREQUENCY_HZ).unwrap();
    info!("Tuned to {} Hz ({:?})", realized, radio.regulation());
    RADIO.install(radio);

    let _ = Irqs;
    hal::timer::unmask_interrupts();

    let sink = EDGE_SINK.init(EdgeForwarder);
    RADIO
        .with(|radio| radio.start_async_rx(sink))
        .unwrap()
        .unwrap();

    // Spawn background tasks
    spawner.spawn(heartbeat_task(led)).unwrap();
    spawner.spawn(edge_logger_task()).unwrap();
    spawner.spawn(reload_task()).unwrap();

    info!("Tasks spawned, entering main loop");

    loop {
        Timer::after(Duration::from_secs(10)).await;
        let rssi = RADIO.with(|radio| radio.rssi()).and_then(|reading| reading.ok());
        if let Some(rssi) = rssi {
            info!("RSSI {} dBm", rssi);
        }
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: StatusLed<'static>) {
    loop {
        led.toggle();
        Timer::after(Duration::from_millis(100)).await;
        led.toggle();
        Timer::after(Duration::from_millis(900)).await;
    }
}

/// Refills the async TX reload ring
///
/// Woken by the reload stream's half and full transfer notifications while a
/// waveform plays, and by the start of the next transmission otherwise.
#[embassy_executor::task]
async fn reload_task() {
    loop {
        let halves = poll_fn(|cx| {
            RADIO
                .with(|radio| radio.poll_transfer(cx.waker()))
                .unwrap_or(Poll::Pending)
        })
        .await;
        trace!("queued {} reload halves", halves);
    }
}

/// Drains the edge queue filled by the capture interrupt
#[embassy_executor::task]
async fn edge_logger_task() {
    loop {
        let (is_falling, duration) = EDGES.receive().await;
        if is_falling {
            info!("high {} us", duration);
        } else {
            info!("low {} us", duration);
        }
    }
}
