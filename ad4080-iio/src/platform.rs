//! Platform capabilities consumed by the FIFO-full interrupt path.
//!
//! The driver never touches GPIO or NVIC registers directly. A board crate
//! implements [`GpioLine`] for the MCU pin wired to the AD4080 GP output and
//! [`IrqController`] for its interrupt controller, then calls
//! [`Ad4080Iio::on_interrupt`](crate::Ad4080Iio::on_interrupt) from the
//! vector that [`IrqController::register_callback`] bound.

use core::fmt::Debug;

/// Interrupt trigger condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerLevel {
    Low,
    High,
    RisingEdge,
    FallingEdge,
}

/// An MCU GPIO line used as an interrupt source.
pub trait GpioLine: Sized {
    /// Board-specific description of the line (port, pin, pull).
    type Params;
    /// Error type of the GPIO implementation.
    type Error: Debug;

    /// Claim the line described by `params`.
    fn acquire(params: &Self::Params) -> Result<Self, Self::Error>;

    /// Configure the line as an input.
    fn set_input(&mut self) -> Result<(), Self::Error>;

    /// Interrupt number the line raises.
    fn irq_number(&self) -> u32;

    /// Give the line back to the platform.
    fn release(self);
}

/// An interrupt controller able to route a GPIO interrupt to the driver.
pub trait IrqController: Sized {
    /// Board-specific controller operations.
    type Ops;
    /// Error type of the controller.
    type Error: Debug;

    fn init(ops: &Self::Ops) -> Result<Self, Self::Error>;

    /// Route `irq` to the driver's interrupt entry point.
    fn register_callback(&mut self, irq: u32) -> Result<(), Self::Error>;

    fn unregister_callback(&mut self, irq: u32) -> Result<(), Self::Error>;

    fn set_trigger_level(&mut self, irq: u32, level: TriggerLevel) -> Result<(), Self::Error>;

    fn enable(&mut self, irq: u32) -> Result<(), Self::Error>;

    fn disable(&mut self, irq: u32) -> Result<(), Self::Error>;

    /// Tear the controller down.
    fn remove(self);
}
