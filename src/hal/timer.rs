//! TIM2 and DMA1 for the async data line
//!
//! TIM2 is a 32-bit general purpose timer. In transmit mode channel 2
//! toggles GD0 on every update and the update DMA request rewrites ARR
//! from an `embassy-stm32` [`WritableRingBuffer`] on DMA1 channel 1. The
//! ring raises its half and full transfer notifications through the
//! embassy DMA interrupt, which wakes the reload task; TIM2 itself raises
//! no interrupt while transmitting. In receive mode channel 1 captures
//! falling edges through the indirect input, channel 2 captures filtered
//! rising edges and resets the counter through the slave controller.

use core::ptr::addr_of_mut;
use core::task::Waker;

use embassy_stm32::dma::{Priority as DmaPriority, TransferOptions, WritableRingBuffer};
use embassy_stm32::interrupt::{self, InterruptExt, Priority};
use embassy_stm32::pac;
use embassy_stm32::pac::timer::vals::{
    CcmrInputCcs, CcmrOutputCcs, Ckd, FilterValue, Mms, Msm, Ocm, Sms, Ts,
};
use embassy_stm32::peripherals::{DMA1_CH1, TIM2};
use embassy_stm32::timer::UpDma;
use embassy_stm32::Peripheral;

use crate::config::{
    timers, ASYNC_TX_BUFFER_FULL, CAPTURE_AUTO_RELOAD, CAPTURE_FILTER, TIMER_PRESCALER,
};
use crate::radio::peripherals::CaptureEvents;

const FALLING: usize = timers::FALLING_CHANNEL;
const RISING: usize = timers::RISING_CHANNEL;

/// Direct mapping (ICx on TIx)
const DIRECT: CcmrInputCcs = CcmrInputCcs::TI4;
/// Indirect mapping (IC1 on TI2)
const INDIRECT: CcmrInputCcs = CcmrInputCcs::TI3;

/// Memory read by the reload stream
static mut RELOAD_RING: [u32; ASYNC_TX_BUFFER_FULL] = [0; ASYNC_TX_BUFFER_FULL];

/// Enable the TIM2 clock (DMA clocks belong to `embassy-stm32`)
pub fn enable_clocks() {
    pac::RCC.apb1enr1().modify(|w| w.set_tim2en(true));
}

/// Unmask the TIM2 (capture) interrupt
#[allow(unsafe_code)]
pub fn unmask_interrupts() {
    interrupt::TIM2.set_priority(Priority::P1);
    // SAFETY: the handler only touches the driver through its critical
    // section cell.
    unsafe { interrupt::TIM2.enable() };
}

/// TIM2 plus the DMA1 reload stream
pub struct AsyncTimer {
    tim: pac::timer::TimGp32,
    channel: DMA1_CH1,
    ring: Option<WritableRingBuffer<'static, u32>>,
}

impl AsyncTimer {
    /// Take over TIM2 and the reload DMA channel (clocks must be enabled)
    #[must_use]
    pub fn new(channel: DMA1_CH1) -> Self {
        Self {
            tim: pac::TIM2,
            channel,
            ring: None,
        }
    }

    /// ARR register address, the DMA destination
    #[must_use]
    pub fn auto_reload_address(&self) -> *mut u32 {
        self.tim.arr().as_ptr().cast()
    }

    fn reset_timer(&self) {
        let tim = self.tim;
        tim.cr1().write(|_| {});
        tim.cr2().write(|_| {});
        tim.smcr().write(|_| {});
        tim.dier().write(|_| {});
        tim.ccer().write(|_| {});
        tim.sr().write(|_| {});
    }

    /// Build a fresh ring over [`RELOAD_RING`] and prime it with `reloads`
    #[allow(unsafe_code)]
    fn open_ring(&mut self, reloads: &[u32]) -> WritableRingBuffer<'static, u32> {
        let request = <DMA1_CH1 as UpDma<TIM2>>::request(&self.channel);
        let mut options = TransferOptions::default();
        // ARR must be rewritten before anything else reads it
        options.priority = DmaPriority::VeryHigh;

        // SAFETY: at most one ring exists at a time. The previous one was
        // dropped, which stops its stream, before this one is built.
        let mut ring = unsafe {
            let channel = self.channel.clone_unchecked();
            let memory: &'static mut [u32] = &mut *addr_of_mut!(RELOAD_RING);
            WritableRingBuffer::new(
                channel,
                request,
                self.auto_reload_address(),
                memory,
                options,
            )
        };
        // The stream is still stopped, so fill the raw buffer directly
        match ring.write_immediate(reloads) {
            Ok((written, _)) if written == reloads.len() => {}
            _ => warn!("reload ring rejected the prefill"),
        }
        ring
    }
}

impl crate::radio::peripherals::PulseTimer for AsyncTimer {
    fn arm_transmit(&mut self, reloads: &[u32], lead_in: u32) {
        let tim = self.tim;
        self.reset_timer();
        self.ring = None;

        let mut ring = self.open_ring(reloads);
        ring.start();
        self.ring = Some(ring);

        tim.cr1().modify(|w| {
            w.set_ckd(Ckd::DIV1);
            w.set_arpe(false);
        });
        tim.psc().write_value(TIMER_PRESCALER);
        tim.arr().write_value(lead_in);

        tim.ccmr_output(0).modify(|w| {
            w.set_ccs(RISING, CcmrOutputCcs::OUTPUT);
            w.set_ocm(RISING, Ocm::TOGGLE);
            w.set_ocfe(RISING, false);
        });
        tim.ccr(RISING).write_value(0);
        tim.ccer().modify(|w| {
            w.set_ccp(RISING, false);
            w.set_cce(RISING, true);
        });
        tim.dier().modify(|w| w.set_ude(true));
    }

    fn auto_reload(&self) -> u32 {
        self.tim.arr().read()
    }

    fn reload_space(&mut self) -> usize {
        let Some(ring) = self.ring.as_mut() else {
            return 0;
        };
        match ring.write(&[]) {
            Ok((_, space)) => space,
            Err(_) => {
                warn!("reload stream overran the queued words");
                0
            }
        }
    }

    fn queue_reloads(&mut self, reloads: &[u32]) {
        let Some(ring) = self.ring.as_mut() else {
            return;
        };
        match ring.write(reloads) {
            Ok((written, _)) if written == reloads.len() => {}
            Ok((written, _)) => warn!("reload ring took {} of {} words", written, reloads.len()),
            Err(_) => warn!("reload stream overran the queued words"),
        }
    }

    fn listen_reloads(&mut self, waker: &Waker) {
        if let Some(ring) = self.ring.as_mut() {
            ring.set_waker(waker);
        }
    }

    fn disarm_transmit(&mut self) {
        self.reset_timer();
        // Dropping the ring stops the stream
        self.ring = None;
    }

    fn arm_capture(&mut self) {
        let tim = self.tim;
        self.reset_timer();

        tim.cr1().modify(|w| {
            // Capture filter runs on fDTS = tick / 4
            w.set_ckd(Ckd::DIV4);
            w.set_arpe(false);
        });
        tim.psc().write_value(TIMER_PRESCALER);
        tim.arr().write_value(CAPTURE_AUTO_RELOAD);

        tim.smcr().modify(|w| {
            w.set_ts(Ts::TI2FP2);
            w.set_sms(Sms::RESET_MODE);
            w.set_msm(Msm::SYNC);
        });
        tim.cr2().modify(|w| w.set_mms(Mms::RESET));

        tim.ccmr_input(0).modify(|w| {
            w.set_ccs(FALLING, INDIRECT);
            w.set_icpsc(FALLING, 0);
            w.set_ccs(RISING, DIRECT);
            w.set_icpsc(RISING, 0);
            w.set_icf(RISING, FilterValue::from_bits(CAPTURE_FILTER));
        });
        tim.ccer().modify(|w| {
            w.set_ccp(FALLING, true);
            w.set_ccnp(FALLING, false);
            w.set_ccp(RISING, false);
            w.set_ccnp(RISING, false);
        });

        tim.dier().modify(|w| {
            w.set_ccie(FALLING, true);
            w.set_ccie(RISING, true);
        });
        tim.ccer().modify(|w| {
            w.set_cce(FALLING, true);
            w.set_cce(RISING, true);
        });
    }

    fn take_capture_events(&mut self) -> CaptureEvents {
        let tim = self.tim;
        let sr = tim.sr().read();
        let mut events = CaptureEvents::default();
        if sr.ccif(FALLING) {
            tim.sr().modify(|w| w.set_ccif(FALLING, false));
            events.falling = Some(tim.ccr(FALLING).read());
        }
        if sr.ccif(RISING) {
            tim.sr().modify(|w| w.set_ccif(RISING, false));
            events.rising = Some(tim.ccr(RISING).read());
        }
        events
    }

    fn disarm_capture(&mut self) {
        self.reset_timer();
    }

    fn start_counter(&mut self) {
        self.tim.cnt().write_value(0);
        self.tim.cr1().modify(|w| w.set_cen(true));
    }
}
