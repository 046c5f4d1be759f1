//! Raw FIFO stream to sample-word conversion.
//!
//! The FIFO readout starts with one synchronisation byte followed by
//! 3-byte big-endian samples:
//!
//! ```text
//! byte:   0      1   2   3     4   5   6     ...
//!        [sync] [ sample 0  ] [ sample 1  ]  ...
//! ```
//!
//! Sample `i` therefore starts at byte `3 * i + 1`.

use crate::constants::{RAW_BYTES_PER_SAMPLE, SYNC_BYTE_LEN};

/// Decode `samples.len()` samples from `raw` into zero-extended 32-bit words.
///
/// No sign extension is applied.
///
/// # Panics
///
/// If `raw` is shorter than `3 * samples.len() + 1` bytes.
pub fn format_raw_samples(raw: &[u8], samples: &mut [u32]) {
    let needed = RAW_BYTES_PER_SAMPLE * samples.len() + SYNC_BYTE_LEN;
    assert!(raw.len() >= needed, "raw FIFO buffer too short");

    let body = &raw[SYNC_BYTE_LEN..needed];
    for (sample, bytes) in samples.iter_mut().zip(body.chunks_exact(RAW_BYTES_PER_SAMPLE)) {
        *sample = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec;
    use std::vec::Vec;

    /// Build a raw stream (sync byte + big-endian triplets) from 24-bit values.
    fn pack(values: &[u32]) -> Vec<u8> {
        let mut raw = vec![0xAA];
        for v in values {
            raw.extend_from_slice(&v.to_be_bytes()[1..]);
        }
        raw
    }

    #[test]
    fn single_sample() {
        let raw = pack(&[0x0A_BCDE]);
        let mut out = [0u32; 1];
        format_raw_samples(&raw, &mut out);
        assert_eq!(out, [0x000A_BCDE]);
    }

    #[test]
    fn two_samples_in_order() {
        let raw = pack(&[0x12_3456, 0x65_4321]);
        let mut out = [0u32; 2];
        format_raw_samples(&raw, &mut out);
        assert_eq!(out, [0x0012_3456, 0x0065_4321]);
    }

    #[test]
    fn full_fifo_depth() {
        let values: Vec<u32> = (0..16_384u32).map(|i| (i * 1021) & 0xFF_FFFF).collect();
        let raw = pack(&values);
        let mut out = vec![0u32; values.len()];
        format_raw_samples(&raw, &mut out);
        assert_eq!(out, values);
    }

    #[test]
    fn no_sign_extension() {
        let raw = pack(&[0xFF_FFFF, 0x80_0000]);
        let mut out = [0u32; 2];
        format_raw_samples(&raw, &mut out);
        assert_eq!(out, [0x00FF_FFFF, 0x0080_0000]);
    }

    #[test]
    fn sync_byte_is_skipped() {
        let mut raw = pack(&[0x00_0001]);
        raw[0] = 0xFF;
        let mut out = [0u32; 1];
        format_raw_samples(&raw, &mut out);
        assert_eq!(out, [1]);
    }

    #[test]
    fn trailing_bytes_ignored() {
        let mut raw = pack(&[0x11_1111, 0x22_2222]);
        raw.extend_from_slice(&[0x33, 0x33, 0x33]);
        let mut out = [0u32; 2];
        format_raw_samples(&raw, &mut out);
        assert_eq!(out, [0x11_1111, 0x22_2222]);
    }

    #[test]
    #[should_panic(expected = "raw FIFO buffer too short")]
    fn short_buffer_panics() {
        let raw = [0xAA, 0x01, 0x02];
        let mut out = [0u32; 1];
        format_raw_samples(&raw, &mut out);
    }
}
