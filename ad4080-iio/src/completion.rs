//! Single-slot completion used to hand a result from the FIFO-full ISR to the
//! context that armed the capture.
//!
//! # Contract
//!
//! - Exactly ONE waiter per initialisation. Re-[`init()`](Completion::init)
//!   before every capture.
//! - [`signal()`](Completion::signal) is called at most once per
//!   initialisation, typically from interrupt context.
//! - [`wait()`](Completion::wait) is a busy-wait. It never sleeps, so the
//!   interrupt that signals it must be able to preempt the waiting context.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Stamp written by [`Completion::init`].
const SIGNATURE: u32 = 0xDEAD_C0DE;

/// Returned by [`Completion::wait`] when the poll budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedOut;

/// A one-shot, single-waiter completion carrying a `T`.
pub struct Completion<T> {
    signature: AtomicU32,
    done: AtomicBool,
    result: UnsafeCell<MaybeUninit<T>>,
}

// SAFETY: `result` is written once by the signalling side before `done` is
// published with Release ordering, and only read by the waiter after it
// observes `done` with Acquire ordering.
unsafe impl<T: Send> Sync for Completion<T> {}
unsafe impl<T: Send> Send for Completion<T> {}

impl<T: Copy> Completion<T> {
    /// Create an uninitialised completion. Call [`init()`](Self::init) before use.
    pub const fn new() -> Self {
        Completion {
            signature: AtomicU32::new(0),
            done: AtomicBool::new(false),
            result: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Clear the done flag and stamp the signature.
    pub fn init(&self) {
        self.done.store(false, Ordering::Release);
        self.signature.store(SIGNATURE, Ordering::Release);
    }

    /// Invalidate the completion. Any later `signal()` or `wait()` panics.
    pub fn invalidate(&self) {
        self.signature.store(0, Ordering::Release);
    }

    /// Whether a result has been published.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Publish `value` and release the waiter.
    ///
    /// # Panics
    ///
    /// If the completion was never initialised or has been invalidated.
    pub fn signal(&self, value: T) {
        self.check_signature();

        // SAFETY: single signaller per initialisation; the waiter does not
        // read the slot until `done` is observed below.
        unsafe {
            (*self.result.get()).write(value);
        }

        let was_done = self.done.swap(true, Ordering::Release);
        debug_assert!(!was_done, "completion signalled twice");
    }

    /// Spin until signalled or until `timeout` polls have elapsed.
    ///
    /// A completion that is already done returns its value even with a
    /// zero budget. The result slot is never read on timeout.
    ///
    /// # Panics
    ///
    /// If the completion was never initialised or has been invalidated.
    pub fn wait(&self, timeout: u32) -> Result<T, TimedOut> {
        self.check_signature();

        let mut remaining = timeout;
        loop {
            if self.done.load(Ordering::Acquire) {
                // SAFETY: `done` is only set after the slot was written.
                return Ok(unsafe { (*self.result.get()).assume_init_read() });
            }
            if remaining == 0 {
                return Err(TimedOut);
            }
            remaining -= 1;
            core::hint::spin_loop();
        }
    }

    fn check_signature(&self) {
        assert_eq!(
            self.signature.load(Ordering::Acquire),
            SIGNATURE,
            "completion used without init"
        );
    }
}

impl<T: Copy> Default for Completion<T> {
    fn default() -> Self {
        Self::new()
    }
}
