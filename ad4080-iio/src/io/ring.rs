//! Lock-free single-producer single-consumer byte ring.
//!
//! The driver's [`buffer_submit`](crate::Ad4080Iio::buffer_submit) is the
//! producer; whatever drains samples toward the host (a UART or USB task) is
//! the consumer.
//!
//! # Safety Contract
//!
//! - Only ONE context may call [`push_slice()`](RingBuffer::push_slice).
//! - Only ONE context may call [`pop_slice()`](RingBuffer::pop_slice).
//! - These may be different threads/ISR contexts running concurrently.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

use super::{AcquisitionBuffer, BufferFull};

/// A lock-free SPSC byte ring with `N - 1` bytes of usable capacity.
pub struct RingBuffer<const N: usize> {
    buffer: UnsafeCell<[u8; N]>,
    /// Write position (only modified by the producer).
    head: AtomicUsize,
    /// Read position (only modified by the consumer).
    tail: AtomicUsize,
}

// SAFETY: the producer only writes bytes in the free region [head, tail) and
// the consumer only reads bytes in the filled region [tail, head). Index
// updates are published with Release and observed with Acquire.
unsafe impl<const N: usize> Sync for RingBuffer<N> {}

impl<const N: usize> RingBuffer<N> {
    /// Create an empty ring.
    ///
    /// # Panics
    ///
    /// Compile-time assertion: `N` must be at least 2.
    pub const fn new() -> Self {
        assert!(N >= 2, "ring must have at least 2 slots (1 usable)");
        RingBuffer {
            buffer: UnsafeCell::new([0; N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Usable capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Bytes currently stored.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + N - tail) % N
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes that can be pushed right now.
    pub fn free(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Append all of `data` (producer side).
    ///
    /// Nothing is written unless the whole slice fits.
    pub fn push_slice(&self, data: &[u8]) -> Result<(), BufferFull> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let free = N - 1 - (head + N - tail) % N;
        if data.len() > free {
            return Err(BufferFull);
        }

        let first = data.len().min(N - head);
        // SAFETY: sole producer; the `free` check guarantees the consumer
        // is not reading [head, head + data.len()) modulo N.
        unsafe {
            let buf = &mut *self.buffer.get();
            buf[head..head + first].copy_from_slice(&data[..first]);
            buf[..data.len() - first].copy_from_slice(&data[first..]);
        }

        self.head.store((head + data.len()) % N, Ordering::Release);
        Ok(())
    }

    /// Move up to `out.len()` bytes out of the ring (consumer side).
    ///
    /// Returns the number of bytes copied.
    pub fn pop_slice(&self, out: &mut [u8]) -> usize {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        let count = ((head + N - tail) % N).min(out.len());

        let first = count.min(N - tail);
        // SAFETY: sole consumer; [tail, tail + count) modulo N was published
        // by the producer before `head` was stored.
        unsafe {
            let buf = &*self.buffer.get();
            out[..first].copy_from_slice(&buf[tail..tail + first]);
            out[first..count].copy_from_slice(&buf[..count - first]);
        }

        self.tail.store((tail + count) % N, Ordering::Release);
        count
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> AcquisitionBuffer for RingBuffer<N> {
    fn capacity(&self) -> usize {
        N - 1
    }

    fn free(&self) -> usize {
        RingBuffer::free(self)
    }

    fn bulk_write(&mut self, data: &[u8]) -> Result<(), BufferFull> {
        self.push_slice(data)
    }
}

impl<const N: usize> AcquisitionBuffer for &RingBuffer<N> {
    fn capacity(&self) -> usize {
        N - 1
    }

    fn free(&self) -> usize {
        RingBuffer::free(*self)
    }

    fn bulk_write(&mut self, data: &[u8]) -> Result<(), BufferFull> {
        self.push_slice(data)
    }
}
