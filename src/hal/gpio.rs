//! GPIO Abstractions
//!
//! Pins around the CC1101: the GD0 data line that moves between analog,
//! input and TIM2 alternate function, the RF front-end outputs, the
//! optional level mirror and the status LED.

use embassy_stm32::gpio::Output;
use embassy_stm32::pac;
use embassy_stm32::pac::gpio::vals::{Idr, Moder};
use embassy_stm32::peripherals::DMA1_CH2;

use crate::config::dma;
use crate::radio::peripherals::{DataLine, DataLineMode, FrontEnd, LevelMirror};

/// TIM2_CH2 alternate function on PA1
const GD0_AF_TIM2: u8 = 1;

/// GD0 on PA1, reconfigured through the PAC
pub struct DataPin {
    port: pac::gpio::Gpio,
    pin: usize,
}

impl DataPin {
    /// GD0 on PA1
    #[must_use]
    pub fn pa1() -> Self {
        Self {
            port: pac::GPIOA,
            pin: 1,
        }
    }
}

impl DataLine for DataPin {
    fn set_data_line_mode(&mut self, mode: DataLineMode) {
        let moder = match mode {
            DataLineMode::Analog => Moder::ANALOG,
            DataLineMode::Input => Moder::INPUT,
            DataLineMode::Timer => {
                let (reg, idx) = (self.pin / 8, self.pin % 8);
                self.port.afr(reg).modify(|w| w.set_afr(idx, GD0_AF_TIM2));
                Moder::ALTERNATE
            }
        };
        self.port.moder().modify(|w| w.set_moder(self.pin, moder));
    }

    fn data_line_is_high(&mut self) -> bool {
        self.port.idr().read().idr(self.pin) == Idr::HIGH
    }
}

/// RF switch and amplifier enable outputs
pub struct FrontEndPins<'d> {
    rf_sw_0: Output<'d>,
    amp_en: Output<'d>,
}

impl<'d> FrontEndPins<'d> {
    /// Both outputs must start low
    #[must_use]
    pub fn new(rf_sw_0: Output<'d>, amp_en: Output<'d>) -> Self {
        Self { rf_sw_0, amp_en }
    }
}

impl FrontEnd for FrontEndPins<'_> {
    fn set_rf_switch(&mut self, high: bool) {
        self.rf_sw_0.set_level(high.into());
    }

    fn set_amp(&mut self, enabled: bool) {
        self.amp_en.set_level(enabled.into());
    }
}

/// Debug output following the radio data level
///
/// In receive mode the capture handler drives it directly. In transmit mode
/// DMA1 channel 2 writes alternating BSRR words on every TIM2 update, so the
/// pin flips on the same reload boundary as GD0. Must be on GPIOB.
pub struct DmaMirror {
    pin: usize,
    /// BSRR words: set, then reset
    pattern: [u32; 2],
    /// Held so no other driver claims the stream
    _channel: DMA1_CH2,
}

impl DmaMirror {
    /// Mirror on PB`pin`, streamed by DMA1 channel 2
    #[must_use]
    pub const fn portb(pin: usize, channel: DMA1_CH2) -> Self {
        Self {
            pin,
            pattern: [1 << pin, 1 << (pin + 16)],
            _channel: channel,
        }
    }
}

impl LevelMirror for DmaMirror {
    fn attach(&mut self) {
        let gpio = pac::GPIOB;
        gpio.bsrr().write(|w| w.set_br(self.pin, true));
        gpio.moder().modify(|w| w.set_moder(self.pin, Moder::OUTPUT));
    }

    fn set_level(&mut self, high: bool) {
        pac::GPIOB.bsrr().write(|w| {
            if high {
                w.set_bs(self.pin, true);
            } else {
                w.set_br(self.pin, true);
            }
        });
    }

    fn follow_reloads(&mut self) {
        let ch = pac::DMA1.ch(dma::MIRROR_CHANNEL);
        ch.cr().write(|_| {});
        pac::DMAMUX1
            .ccr(dma::MIRROR_CHANNEL)
            .write(|w| w.set_dmareq_id(dma::TIM2_UP_REQUEST));
        ch.par().write_value(pac::GPIOB.bsrr().as_ptr() as u32);
        ch.mar().write_value(self.pattern.as_ptr() as u32);
        ch.ndtr().write(|w| w.set_ndt(2));
        ch.cr().write(|w| {
            w.set_dir(pac::bdma::vals::Dir::FROM_MEMORY);
            w.set_circ(true);
            w.set_minc(true);
            w.set_pinc(false);
            w.set_msize(pac::bdma::vals::Size::BITS32);
            w.set_psize(pac::bdma::vals::Size::BITS32);
            // Below the reload stream so ARR is written first
            w.set_pl(pac::bdma::vals::Pl::HIGH);
            w.set_en(true);
        });
    }

    fn detach(&mut self) {
        pac::DMA1.ch(dma::MIRROR_CHANNEL).cr().write(|_| {});
        pac::DMAMUX1.ccr(dma::MIRROR_CHANNEL).write(|_| {});
        pac::GPIOB
            .moder()
            .modify(|w| w.set_moder(self.pin, Moder::ANALOG));
    }
}

/// Status LED driver
pub struct StatusLed<'d> {
    pin: Output<'d>,
    on: bool,
}

impl<'d> StatusLed<'d> {
    /// Create a new status LED (initially off)
    #[must_use]
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin, on: false }
    }

    /// Toggle LED state
    pub fn toggle(&mut self) {
        self.on = !self.on;
        self.pin.set_level(self.on.into());
    }

    /// Check if the LED is lit
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.on
    }
}
