//! Upstream acquisition buffers.
//!
//! [`buffer_submit`](crate::Ad4080Iio::buffer_submit) never copies into the
//! destination's memory directly: the destination may be a ring that wraps,
//! so every transfer goes through [`AcquisitionBuffer::bulk_write`].
//!
//! - [`RingBuffer`]: lock-free SPSC byte ring implementing the trait

mod ring;

pub use ring::RingBuffer;

/// The destination had no room for a bulk write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferFull;

/// Byte sink that receives formatted samples.
pub trait AcquisitionBuffer {
    /// Declared capacity in bytes. At most this many bytes are submitted per
    /// capture.
    fn capacity(&self) -> usize;

    /// Bytes that can be written right now without failing.
    fn free(&self) -> usize;

    /// Append `data`, all or nothing.
    fn bulk_write(&mut self, data: &[u8]) -> Result<(), BufferFull>;
}
