//! Heap buffers sized to the FIFO watermark.

use alloc::vec::Vec;

use crate::constants::{FORMATTED_BYTES_PER_SAMPLE, RAW_BYTES_PER_SAMPLE, SYNC_BYTE_LEN};
use crate::format::format_raw_samples;

/// Allocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

/// The raw readout buffer and the formatted sample buffer.
///
/// Both are allocated together or not at all.
pub struct FifoBuffers {
    raw: Vec<u8>,
    formatted: Vec<u32>,
}

impl FifoBuffers {
    /// Raw buffer length for `watermark` samples, sync byte included.
    pub const fn raw_len(watermark: usize) -> usize {
        RAW_BYTES_PER_SAMPLE * watermark + SYNC_BYTE_LEN
    }

    /// Formatted buffer length in bytes for `watermark` samples.
    pub const fn formatted_len(watermark: usize) -> usize {
        watermark * FORMATTED_BYTES_PER_SAMPLE
    }

    /// Allocate both buffers for `watermark` samples.
    ///
    /// If the second allocation fails the first is released before
    /// returning.
    pub fn allocate(watermark: usize) -> Result<Self, AllocError> {
        let mut raw = Vec::new();
        raw.try_reserve_exact(Self::raw_len(watermark))
            .map_err(|_| AllocError)?;
        raw.resize(Self::raw_len(watermark), 0);

        let mut formatted = Vec::new();
        formatted
            .try_reserve_exact(watermark)
            .map_err(|_| AllocError)?;
        formatted.resize(watermark, 0);

        Ok(Self { raw, formatted })
    }

    /// Number of samples the buffers hold.
    pub fn watermark(&self) -> usize {
        self.formatted.len()
    }

    /// Raw buffer size in bytes.
    pub fn raw_size(&self) -> usize {
        self.raw.len()
    }

    /// Formatted buffer size in bytes.
    pub fn formatted_size(&self) -> usize {
        self.formatted.len() * FORMATTED_BYTES_PER_SAMPLE
    }

    /// Raw buffer, to be filled by a FIFO readout.
    pub fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.raw
    }

    /// Decode the raw buffer into the formatted buffer.
    pub fn format(&mut self) {
        format_raw_samples(&self.raw, &mut self.formatted);
    }

    /// Formatted samples from the last readout.
    pub fn samples(&self) -> &[u32] {
        &self.formatted
    }
}
