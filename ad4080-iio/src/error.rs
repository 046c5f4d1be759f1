//! Driver error type.

use core::fmt;

/// Errors returned by the AD4080 driver stack.
///
/// `E` is the error type of the register bus (see
/// [`RegisterInterface`](crate::device::RegisterInterface)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// An argument was out of range. Raised before any side effect.
    InvalidArgument,
    /// A FIFO buffer could not be allocated. The descriptor is left unset.
    OutOfMemory,
    /// The register bus reported an error. Never retried internally.
    Bus(E),
    /// The GPIO line backing the FIFO-full signal failed.
    Gpio,
    /// The interrupt controller failed.
    Irq,
    /// A capture did not complete in time and was abandoned.
    Timeout,
    /// A capture is already outstanding on this device.
    Busy,
    /// The destination buffer could not take the data.
    BufferFull,
    /// The product ID read back does not belong to an AD4080.
    UnknownDevice(u16),
}

impl<E> Error<E> {
    /// Negative errno-style status for attribute dispatch layers.
    pub fn errno(&self) -> i32 {
        match self {
            Error::InvalidArgument => -22,
            Error::OutOfMemory => -12,
            Error::Bus(_) | Error::Gpio | Error::Irq => -5,
            Error::Timeout => -110,
            Error::Busy => -16,
            Error::BufferFull => -28,
            Error::UnknownDevice(_) => -19,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => f.write_str("invalid argument"),
            Error::OutOfMemory => f.write_str("out of memory"),
            Error::Bus(e) => write!(f, "register bus error: {e:?}"),
            Error::Gpio => f.write_str("GPIO error"),
            Error::Irq => f.write_str("interrupt controller error"),
            Error::Timeout => f.write_str("capture timed out"),
            Error::Busy => f.write_str("capture already in progress"),
            Error::BufferFull => f.write_str("destination buffer full"),
            Error::UnknownDevice(id) => write!(f, "unexpected product id {id:#06x}"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Error<E> {}
