//! FIFO-triggered acquisition driver.
//!
//! [`Ad4080Iio`] ties the register driver, the FIFO descriptor and the
//! FIFO-full interrupt together. All methods take `&self`, so one instance
//! can live in a `static` and be shared between thread mode and the GPIO
//! interrupt handler.
//!
//! ## Capture sequence
//!
//! ```text
//! thread mode                          GPIO ISR (on_interrupt)
//! ───────────                          ───────────────────────
//! buffer_submit(n)
//!   watermark != n → set_watermark(n)
//!   immediate_trigger_capture()
//!     Idle → Armed, completion.init()
//!     FIFO_MODE = immediate trigger
//!     completion.wait(timeout) ┄┄┄┄┄┄┄  DEVICE_STATUS.FIFO_FULL?
//!                                        read FIFO → format
//!                           ◄┄┄┄┄┄┄┄┄┄  completion.signal(result)
//!                                        FIFO_MODE = disabled
//!     Armed → Idle
//!   bulk_write(samples) → destination
//! ```
//!
//! ## Timeout policy
//!
//! A capture that is not signalled within the configured number of polls is
//! abandoned: the FIFO is forced to disabled, the capture state returns to
//! idle and [`Error::Timeout`] is returned. Nothing is retried.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use critical_section::Mutex;

use crate::completion::{Completion, TimedOut};
use crate::config::Ad4080IioConfig;
use crate::constants::{FORMATTED_BYTES_PER_SAMPLE, SUBMIT_CHUNK_SAMPLES};
use crate::device::{Ad4080, RegisterInterface};
use crate::error::Error;
use crate::fifo::Fifo;
use crate::io::AcquisitionBuffer;
use crate::platform::{GpioLine, IrqController};

/// Capture state, stored in an `AtomicU8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum CaptureState {
    Idle = 0,
    Armed = 1,
}

type CaptureResult<E> = Result<(), Error<E>>;

/// AD4080 acquisition driver.
pub struct Ad4080Iio<IFACE, G, C>
where
    IFACE: RegisterInterface,
{
    fifo: Mutex<RefCell<Fifo<IFACE, G, C>>>,
    completion: Completion<CaptureResult<IFACE::Error>>,
    state: AtomicU8,
    capture_timeout: AtomicU32,
}

impl<IFACE, G, C> Ad4080Iio<IFACE, G, C>
where
    IFACE: RegisterInterface,
    G: GpioLine,
    C: IrqController,
{
    /// Probe the device, size the FIFO and bind the FIFO-full interrupt.
    ///
    /// Each failing step undoes the ones before it.
    pub fn init(
        iface: IFACE,
        config: Ad4080IioConfig<G::Params, C::Ops>,
    ) -> Result<Self, Error<IFACE::Error>> {
        let mut adc = Ad4080::new(iface);
        adc.init()?;

        let mut fifo = Fifo::new(adc);
        if let Err(e) = fifo.set_watermark(config.watermark) {
            fifo.fini();
            return Err(e);
        }

        if let Err(e) =
            fifo.register_irq(&config.gpio_params, &config.irq_ops, config.fifo_full_gpio)
        {
            let _ = fifo.unset_watermark();
            fifo.fini();
            return Err(e);
        }

        log::info!(
            "ad4080: ready, watermark {}, FIFO-full on GP{}",
            config.watermark,
            config.fifo_full_gpio
        );

        Ok(Self {
            fifo: Mutex::new(RefCell::new(fifo)),
            completion: Completion::new(),
            state: AtomicU8::new(CaptureState::Idle as u8),
            capture_timeout: AtomicU32::new(config.capture_timeout),
        })
    }

    /// Unbind the interrupt, disable the FIFO, free the buffers and hand
    /// back the register bus.
    pub fn fini(self) -> IFACE {
        let mut fifo = self.fifo.into_inner().into_inner();
        if let Err(e) = fifo.unregister_irq() {
            log::warn!("ad4080: unregister irq: {:?}", e);
        }
        if let Err(e) = fifo.unset_watermark() {
            log::warn!("ad4080: unset watermark: {:?}", e);
        }
        fifo.fini();
        self.completion.invalidate();
        log::info!("ad4080: removed");
        fifo.release().release()
    }

    /// Run `f` on the register driver inside a critical section.
    pub fn with_device<R>(&self, f: impl FnOnce(&mut Ad4080<IFACE>) -> R) -> R {
        critical_section::with(|cs| f(self.fifo.borrow_ref_mut(cs).device()))
    }

    /// Run `f` on the formatted samples of the last capture.
    pub fn with_samples<R>(&self, f: impl FnOnce(&[u32]) -> R) -> R {
        critical_section::with(|cs| f(self.fifo.borrow_ref(cs).samples()))
    }

    /// Current FIFO watermark in samples.
    pub fn watermark(&self) -> usize {
        critical_section::with(|cs| self.fifo.borrow_ref(cs).watermark())
    }

    /// Resize the FIFO buffers and reprogram the device watermark.
    ///
    /// Refused with [`Error::Busy`] while a capture is pending. On failure
    /// the descriptor is left without buffers until the next successful call.
    pub fn set_watermark(&self, watermark: usize) -> Result<(), Error<IFACE::Error>> {
        critical_section::with(|cs| {
            if self.capture_pending() {
                return Err(Error::Busy);
            }
            // Disables the FIFO and frees the old buffers first.
            self.fifo.borrow_ref_mut(cs).set_watermark(watermark)
        })
    }

    /// Whether a capture is armed and waiting for FIFO-full.
    pub fn capture_pending(&self) -> bool {
        self.state.load(Ordering::Acquire) == CaptureState::Armed as u8
    }

    /// Completion polls before a capture is abandoned.
    pub fn capture_timeout(&self) -> u32 {
        self.capture_timeout.load(Ordering::Relaxed)
    }

    /// Change the completion poll budget; applies from the next capture.
    pub fn set_capture_timeout(&self, polls: u32) {
        self.capture_timeout.store(polls, Ordering::Relaxed);
    }

    /// FIFO-full interrupt entry point. Call from the GPIO vector bound by
    /// the interrupt controller.
    pub fn on_interrupt(&self) {
        critical_section::with(|cs| {
            let mut fifo = self.fifo.borrow_ref_mut(cs);
            let handled = fifo.handle_interrupt(|fifo| {
                if !self.capture_pending() || self.completion.is_done() {
                    log::warn!("ad4080: FIFO full with no capture pending");
                    return;
                }
                let result = fifo.read_samples();
                self.completion.signal(result);
            });
            if let Err(e) = handled {
                log::warn!("ad4080: FIFO-full interrupt: {:?}", e);
            }
        });
    }

    /// Arm an immediate-trigger capture and spin until the interrupt
    /// handler has read the FIFO, or the timeout expires.
    pub fn immediate_trigger_capture(&self) -> Result<(), Error<IFACE::Error>> {
        critical_section::with(|cs| {
            self.state
                .compare_exchange(
                    CaptureState::Idle as u8,
                    CaptureState::Armed as u8,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .map_err(|_| Error::Busy)?;
            self.completion.init();
            if let Err(e) = self.fifo.borrow_ref_mut(cs).arm() {
                self.completion.invalidate();
                self.state.store(CaptureState::Idle as u8, Ordering::Release);
                return Err(e);
            }
            Ok(())
        })?;
        log::debug!("ad4080: capture armed");

        let timeout = self.capture_timeout();
        let waited = self.completion.wait(timeout);

        critical_section::with(|cs| {
            let result = match waited {
                Ok(result) => result,
                // The interrupt may land between the last poll and here.
                Err(TimedOut) if self.completion.is_done() => self
                    .completion
                    .wait(0)
                    .unwrap_or(Err(Error::Timeout)),
                Err(TimedOut) => {
                    log::error!(
                        "ad4080: capture timed out after {} polls",
                        timeout
                    );
                    if let Err(e) = self.fifo.borrow_ref_mut(cs).disable() {
                        log::warn!("ad4080: FIFO disable after timeout: {:?}", e);
                    }
                    Err(Error::Timeout)
                }
            };
            self.completion.invalidate();
            self.state.store(CaptureState::Idle as u8, Ordering::Release);
            if result.is_ok() {
                log::debug!("ad4080: capture complete");
            }
            result
        })
    }

    /// Capture `samples` samples and append them to `dest`.
    ///
    /// The watermark is reprogrammed first if it differs from `samples`.
    /// Samples are written as little-endian 32-bit words, in chunks, up to
    /// the destination's declared capacity. If the destination cannot take
    /// the whole capture, nothing is written and [`Error::BufferFull`] is
    /// returned.
    pub fn buffer_submit<B>(&self, samples: usize, dest: &mut B) -> Result<(), Error<IFACE::Error>>
    where
        B: AcquisitionBuffer,
    {
        if self.watermark() != samples {
            self.set_watermark(samples)?;
        }

        self.immediate_trigger_capture()?;

        critical_section::with(|cs| write_samples(self.fifo.borrow_ref(cs).samples(), dest))
            .map_err(|_| Error::BufferFull)
    }
}

/// Bulk-write `samples` little-endian into `dest`, bounded by its capacity.
///
/// All or nothing: the payload must fit in `dest.free()` before the first
/// chunk goes out.
fn write_samples<B: AcquisitionBuffer>(
    samples: &[u32],
    dest: &mut B,
) -> Result<(), crate::io::BufferFull> {
    let limit = samples.len().min(dest.capacity() / FORMATTED_BYTES_PER_SAMPLE);
    if limit < samples.len() {
        log::warn!(
            "ad4080: submit truncated to {} of {} samples by buffer capacity",
            limit,
            samples.len()
        );
    }
    if limit * FORMATTED_BYTES_PER_SAMPLE > dest.free() {
        return Err(crate::io::BufferFull);
    }
    let mut staging = [0u8; SUBMIT_CHUNK_SAMPLES * FORMATTED_BYTES_PER_SAMPLE];

    for block in samples[..limit].chunks(SUBMIT_CHUNK_SAMPLES) {
        for (out, sample) in staging
            .chunks_exact_mut(FORMATTED_BYTES_PER_SAMPLE)
            .zip(block)
        {
            out.copy_from_slice(&sample.to_le_bytes());
        }
        dest.bulk_write(&staging[..block.len() * FORMATTED_BYTES_PER_SAMPLE])?;
    }
    Ok(())
}
