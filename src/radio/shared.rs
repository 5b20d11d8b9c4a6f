//! Interrupt-safe ownership cell
//!
//! The driver is created in `main` and then used from both thread mode and
//! the TIM2 / DMA interrupt handlers. It lives in a static [`IsrShared`] and
//! every access runs inside a critical section.

use core::cell::RefCell;

use critical_section::Mutex;

/// Value shared between thread mode and interrupt handlers
pub struct IsrShared<T> {
    inner: Mutex<RefCell<Option<T>>>,
}

impl<T> IsrShared<T> {
    /// Empty cell, usable in a `static`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Store `value`, returning the previous one
    pub fn install(&self, value: T) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(value))
    }

    /// Take the value out
    pub fn take(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
    }

    /// Run `f` on the value with interrupts masked
    ///
    /// Returns `None` when nothing is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Check if a value is installed
    #[must_use]
    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_some())
    }
}

impl<T> Default for IsrShared<T> {
    fn default() -> Self {
        Self::new()
    }
}
