//! Bounded polling
//!
//! Every wait for a chip status transition goes through [`wait_until`].

use embedded_hal::delay::DelayNs;

use crate::config::POLL_STEP_US;
use crate::error::Result;

/// Poll `ready` every [`POLL_STEP_US`] until it reports true or
/// `timeout_us` elapses.
///
/// The predicate gets the delay provider back, so a board that is both the
/// delay and the polled pin can be sampled. Returns `Ok(false)` on timeout.
/// Bus errors from the predicate are propagated immediately.
pub fn wait_until<D, F>(delay: &mut D, timeout_us: u32, mut ready: F) -> Result<bool>
where
    D: DelayNs,
    F: FnMut(&mut D) -> Result<bool>,
{
    let mut waited = 0u32;
    loop {
        if ready(delay)? {
            return Ok(true);
        }
        if waited >= timeout_us {
            return Ok(false);
        }
        delay.delay_us(POLL_STEP_US);
        waited = waited.saturating_add(POLL_STEP_US);
    }
}
