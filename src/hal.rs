//! Hardware Abstraction Layer
//!
//! STM32G474 implementations of the radio board traits. Register access
//! goes through the `embassy-stm32` PAC, the reload stream through its DMA
//! ring buffer; this is the only place in the crate with unsafe code.

pub mod gpio;
pub mod timer;

use core::task::Waker;

use embassy_stm32::peripherals::DMA1_CH1;
use embassy_time::Delay;
use embedded_hal::delay::DelayNs;

use crate::radio::peripherals::{CaptureEvents, DataLine, DataLineMode, FrontEnd, PulseTimer};

pub use gpio::{DataPin, DmaMirror, FrontEndPins, StatusLed};
pub use timer::AsyncTimer;

/// Everything the driver touches on the board besides the CC1101
pub struct RadioBoard<'d> {
    data: DataPin,
    front_end: FrontEndPins<'d>,
    timer: AsyncTimer,
    delay: Delay,
}

impl<'d> RadioBoard<'d> {
    /// Assemble the board; enables the TIM2 clock
    #[must_use]
    pub fn new(data: DataPin, front_end: FrontEndPins<'d>, reload_dma: DMA1_CH1) -> Self {
        timer::enable_clocks();
        Self {
            data,
            front_end,
            timer: AsyncTimer::new(reload_dma),
            delay: Delay,
        }
    }
}

impl DataLine for RadioBoard<'_> {
    fn set_data_line_mode(&mut self, mode: DataLineMode) {
        self.data.set_data_line_mode(mode);
    }

    fn data_line_is_high(&mut self) -> bool {
        self.data.data_line_is_high()
    }
}

impl FrontEnd for RadioBoard<'_> {
    fn set_rf_switch(&mut self, high: bool) {
        self.front_end.set_rf_switch(high);
    }

    fn set_amp(&mut self, enabled: bool) {
        self.front_end.set_amp(enabled);
    }
}

impl PulseTimer for RadioBoard<'_> {
    fn arm_transmit(&mut self, reloads: &[u32], lead_in: u32) {
        self.timer.arm_transmit(reloads, lead_in);
    }

    fn auto_reload(&self) -> u32 {
        self.timer.auto_reload()
    }

    fn reload_space(&mut self) -> usize {
        self.timer.reload_space()
    }

    fn queue_reloads(&mut self, reloads: &[u32]) {
        self.timer.queue_reloads(reloads);
    }

    fn listen_reloads(&mut self, waker: &Waker) {
        self.timer.listen_reloads(waker);
    }

    fn disarm_transmit(&mut self) {
        self.timer.disarm_transmit();
    }

    fn arm_capture(&mut self) {
        self.timer.arm_capture();
    }

    fn take_capture_events(&mut self) -> CaptureEvents {
        self.timer.take_capture_events()
    }

    fn disarm_capture(&mut self) {
        self.timer.disarm_capture();
    }

    fn start_counter(&mut self) {
        self.timer.start_counter();
    }
}

impl DelayNs for RadioBoard<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
