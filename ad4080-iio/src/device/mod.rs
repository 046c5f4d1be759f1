//! AD4080 device layer.
//!
//! - [`registers`]: register addresses and bitfields
//! - [`RegisterInterface`] / [`SpiInterface`]: register bus access
//! - [`Ad4080`]: typed register driver

pub mod registers;

mod ad4080;
mod interface;

pub use ad4080::{
    Ad4080, FifoMode, Filter, Gpio, GpioDirection, GpioFunction, OperatingMode, SincDecimation,
    Threshold,
};
pub use interface::{RegisterInterface, SpiInterface};
