//! FIFO descriptor: watermark-sized buffers and the FIFO-full interrupt line.
//!
//! [`Fifo`] owns the [`Ad4080`] register driver, the [`FifoBuffers`] sized to
//! the current watermark, and the GPIO/IRQ binding that signals FIFO-full.
//!
//! ## Buffer sizing
//!
//! | Buffer | Size |
//! |--------|------|
//! | raw | `3 * watermark + 1` bytes (sync byte + 24-bit samples) |
//! | formatted | `4 * watermark` bytes |
//!
//! Changing the watermark disables the device FIFO, frees both buffers and
//! allocates new ones. Any failure leaves the descriptor unset.
//!
//! ## Interrupt state machine
//!
//! ```text
//!   idle ──arm──► armed ──irq, FIFO_FULL set──► fired-valid ──disable FIFO──► idle
//!                   │
//!                   └──irq, FIFO_FULL clear──► fired-spurious ──► armed (FIFO untouched)
//! ```

mod buffers;

pub use buffers::{AllocError, FifoBuffers};

use crate::constants::FIFO_DEPTH;
use crate::device::{Ad4080, FifoMode, Gpio, GpioDirection, GpioFunction, RegisterInterface};
use crate::error::Error;
use crate::platform::{GpioLine, IrqController, TriggerLevel};

/// Tag stamped on a live descriptor.
const FIFO_SIGNATURE: u32 = 0x4144_4946;

/// What the interrupt handler found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqEvent {
    /// FIFO_FULL was set: the consumer ran and the FIFO was disabled.
    FifoFull,
    /// FIFO_FULL was clear: nothing was done.
    Spurious,
}

/// Interrupt routing for the FIFO-full GP pin.
struct IrqBinding<G, C> {
    line: G,
    ctrl: C,
    irq: u32,
    gpio: Gpio,
}

/// FIFO descriptor.
pub struct Fifo<IFACE, G, C> {
    signature: u32,
    adc: Ad4080<IFACE>,
    buffers: Option<FifoBuffers>,
    binding: Option<IrqBinding<G, C>>,
}

impl<IFACE, G, C> Fifo<IFACE, G, C>
where
    IFACE: RegisterInterface,
    G: GpioLine,
    C: IrqController,
{
    /// Create a descriptor with no buffers and no interrupt binding.
    pub fn new(adc: Ad4080<IFACE>) -> Self {
        Self {
            signature: FIFO_SIGNATURE,
            adc,
            buffers: None,
            binding: None,
        }
    }

    /// Whether the descriptor is live (not finalised).
    pub fn is_valid(&self) -> bool {
        self.signature == FIFO_SIGNATURE
    }

    /// Invalidate the descriptor. Interrupts delivered afterwards panic.
    pub fn fini(&mut self) {
        self.signature = 0;
    }

    /// Consume the descriptor and return the register driver.
    pub fn release(self) -> Ad4080<IFACE> {
        self.adc
    }

    /// Register driver.
    pub fn device(&mut self) -> &mut Ad4080<IFACE> {
        &mut self.adc
    }

    /// Current watermark in samples; 0 when unset.
    pub fn watermark(&self) -> usize {
        self.buffers.as_ref().map_or(0, FifoBuffers::watermark)
    }

    /// Raw buffer size in bytes; 0 when unset.
    pub fn raw_size(&self) -> usize {
        self.buffers.as_ref().map_or(0, FifoBuffers::raw_size)
    }

    /// Formatted buffer size in bytes; 0 when unset.
    pub fn formatted_size(&self) -> usize {
        self.buffers.as_ref().map_or(0, FifoBuffers::formatted_size)
    }

    /// Formatted samples from the last capture; empty when unset.
    pub fn samples(&self) -> &[u32] {
        match &self.buffers {
            Some(buffers) => buffers.samples(),
            None => &[],
        }
    }

    /// Whether the FIFO-full interrupt is bound.
    pub fn irq_registered(&self) -> bool {
        self.binding.is_some()
    }

    // ── Watermark ──────────────────────────────────────────────────────

    /// Resize the buffers for `watermark` samples and program the device.
    ///
    /// Valid range is 1 to [`FIFO_DEPTH`]; anything else fails before any
    /// bus access or allocation.
    pub fn set_watermark(&mut self, watermark: usize) -> Result<(), Error<IFACE::Error>> {
        if !self.is_valid() || !(1..=FIFO_DEPTH).contains(&watermark) {
            return Err(Error::InvalidArgument);
        }

        self.unset_watermark()?;

        let buffers = FifoBuffers::allocate(watermark).map_err(|_| {
            log::warn!("fifo: cannot allocate buffers for {} samples", watermark);
            Error::OutOfMemory
        })?;

        // The range check above keeps this within u16.
        self.adc.set_fifo_watermark(watermark as u16)?;
        self.buffers = Some(buffers);

        log::debug!(
            "fifo: watermark {} (raw {} B, formatted {} B)",
            watermark,
            self.raw_size(),
            self.formatted_size()
        );
        Ok(())
    }

    /// Disable the device FIFO and free both buffers.
    ///
    /// Safe to call when already unset. The buffers are freed even if the
    /// disable write fails; that error is returned afterwards.
    pub fn unset_watermark(&mut self) -> Result<(), Error<IFACE::Error>> {
        let disabled = self.adc.set_fifo_mode(FifoMode::Disabled);
        self.buffers = None;
        disabled
    }

    // ── Capture ────────────────────────────────────────────────────────

    /// Put the device into immediate-trigger mode.
    pub fn arm(&mut self) -> Result<(), Error<IFACE::Error>> {
        if self.buffers.is_none() {
            return Err(Error::InvalidArgument);
        }
        self.adc.set_fifo_mode(FifoMode::ImmediateTrigger)
    }

    /// Turn sampling off.
    pub fn disable(&mut self) -> Result<(), Error<IFACE::Error>> {
        self.adc.set_fifo_mode(FifoMode::Disabled)
    }

    /// Read the FIFO contents over the data bus and format them.
    pub fn read_samples(&mut self) -> Result<(), Error<IFACE::Error>> {
        let buffers = self.buffers.as_mut().ok_or(Error::InvalidArgument)?;
        self.adc.read_data(buffers.raw_mut())?;
        buffers.format();
        Ok(())
    }

    // ── Interrupt routing ──────────────────────────────────────────────

    /// Bind the FIFO-full interrupt to GP pin `gpio_index`.
    ///
    /// Claims the GPIO line as an input, brings up the interrupt controller,
    /// routes the line's interrupt, arms it level-high, then programs the
    /// device pin as a FIFO-full output. A failing step unwinds every step
    /// before it.
    pub fn register_irq(
        &mut self,
        gpio_params: &G::Params,
        irq_ops: &C::Ops,
        gpio_index: usize,
    ) -> Result<(), Error<IFACE::Error>> {
        if !self.is_valid() || self.binding.is_some() {
            return Err(Error::InvalidArgument);
        }
        let gpio = Gpio::from_index(gpio_index).ok_or(Error::InvalidArgument)?;

        let mut line = G::acquire(gpio_params).map_err(gpio_error)?;
        if let Err(e) = line.set_input() {
            line.release();
            return Err(gpio_error(e));
        }

        let mut ctrl = match C::init(irq_ops) {
            Ok(ctrl) => ctrl,
            Err(e) => {
                line.release();
                return Err(irq_error(e));
            }
        };

        let irq = line.irq_number();
        if let Err(e) = ctrl.register_callback(irq) {
            ctrl.remove();
            line.release();
            return Err(irq_error(e));
        }

        let enabled = ctrl
            .set_trigger_level(irq, TriggerLevel::High)
            .and_then(|()| ctrl.enable(irq));
        let binding = IrqBinding { line, ctrl, irq, gpio };
        if let Err(e) = enabled {
            binding.teardown(false);
            return Err(irq_error(e));
        }

        let routed = self
            .adc
            .set_gpio_direction(gpio, GpioDirection::Output)
            .and_then(|()| self.adc.set_gpio_function(gpio, GpioFunction::FifoFull));
        if let Err(e) = routed {
            binding.teardown(true);
            return Err(e);
        }

        log::debug!("fifo: FIFO-full on {:?}, irq {}", gpio, irq);
        self.binding = Some(binding);
        Ok(())
    }

    /// Undo [`register_irq`](Self::register_irq). A no-op when nothing is bound.
    ///
    /// The platform side is always torn down; a failure to restore the device
    /// pin function is returned afterwards.
    pub fn unregister_irq(&mut self) -> Result<(), Error<IFACE::Error>> {
        let Some(binding) = self.binding.take() else {
            return Ok(());
        };
        let restored = self.adc.set_gpio_function(binding.gpio, GpioFunction::SpiSdo);
        binding.teardown(true);
        restored
    }

    /// FIFO-full interrupt handler.
    ///
    /// Reads DEVICE_STATUS. If FIFO_FULL is clear the interrupt is spurious
    /// and nothing else happens. Otherwise `consumer` runs, then the FIFO is
    /// disabled.
    ///
    /// # Panics
    ///
    /// If the descriptor has been finalised.
    pub fn handle_interrupt<F>(&mut self, consumer: F) -> Result<IrqEvent, Error<IFACE::Error>>
    where
        F: FnOnce(&mut Self),
    {
        assert!(self.is_valid(), "FIFO interrupt on a dead descriptor");

        if !self.adc.fifo_full()? {
            log::warn!("fifo: spurious FIFO-full interrupt");
            return Ok(IrqEvent::Spurious);
        }

        consumer(self);
        self.disable()?;
        Ok(IrqEvent::FifoFull)
    }
}

impl<G, C> IrqBinding<G, C>
where
    G: GpioLine,
    C: IrqController,
{
    /// Disable (if enabled), unregister, remove the controller, release the line.
    fn teardown(self, enabled: bool) {
        let IrqBinding {
            line,
            mut ctrl,
            irq,
            ..
        } = self;
        if enabled {
            if let Err(e) = ctrl.disable(irq) {
                log::warn!("fifo: irq {} disable failed: {:?}", irq, e);
            }
        }
        if let Err(e) = ctrl.unregister_callback(irq) {
            log::warn!("fifo: irq {} unregister failed: {:?}", irq, e);
        }
        ctrl.remove();
        line.release();
    }
}

fn gpio_error<E, P: core::fmt::Debug>(e: P) -> Error<E> {
    log::warn!("fifo: GPIO failure: {:?}", e);
    Error::Gpio
}

fn irq_error<E, P: core::fmt::Debug>(e: P) -> Error<E> {
    log::warn!("fifo: interrupt controller failure: {:?}", e);
    Error::Irq
}
