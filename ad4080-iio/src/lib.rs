//! # ad4080-iio
//!
//! A `no_std` driver for the [AD4080](https://www.analog.com/en/products/ad4080.html)
//! 20-bit SAR ADC built around its on-chip 16 384-sample FIFO. A capture arms
//! the FIFO in immediate-trigger mode, waits for the FIFO-full interrupt on
//! one of the device's GP pins, reads the FIFO out over the data SPI and hands
//! the samples to an upstream acquisition buffer.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Bus | [`device`] | Register bus trait, SPI transport, typed register driver |
//! | Platform | [`platform`] | GPIO line and interrupt-controller capabilities |
//! | FIFO | [`fifo`] | Watermark-sized buffers, FIFO-full interrupt binding |
//! | Sync | [`completion`] | Busy-wait completion signalled from the ISR |
//! | Driver | [`acquisition`] | Capture orchestration and buffer submission |
//! | I/O | [`io`] | Acquisition buffer trait and SPSC byte ring |
//! | IIO | [`iio`] | Channel descriptor and attribute dispatch (feature-gated) |
//!
//! ## Quick start
//!
//! ```ignore
//! use ad4080_iio::{Ad4080Iio, Ad4080IioConfig};
//! use ad4080_iio::device::SpiInterface;
//! use ad4080_iio::io::RingBuffer;
//!
//! static RING: RingBuffer<{ 16 * 1024 + 1 }> = RingBuffer::new();
//!
//! let config = Ad4080IioConfig::new(gp3_params, nvic_ops).watermark(4096);
//! let adc = Ad4080Iio::init(SpiInterface::new(cfg_spi, data_spi), config)?;
//!
//! // In the GP3 interrupt handler:
//! adc.on_interrupt();
//!
//! // In thread mode:
//! adc.buffer_submit(4096, &mut &RING)?;
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `iio` | yes | Channel descriptor and attribute show/store layer |
//! | `defmt` | no | `defmt::Format` on public types, `embedded-hal/defmt-03` |
//!
//! ## Sample format
//!
//! - **Resolution:** 20 bits ([`constants::ADC_GRANULARITY_BITS`])
//! - **FIFO readout:** one sync byte, then 3-byte big-endian samples
//! - **Buffer format:** zero-padded little-endian `u32` per sample
//! - **FIFO depth:** 16 384 samples ([`constants::FIFO_DEPTH`])

#![no_std]

extern crate alloc;

pub mod constants;
pub mod error;
pub mod completion;
pub mod format;
pub mod device;
pub mod platform;
pub mod fifo;
pub mod io;
pub mod config;
pub mod acquisition;

#[cfg(feature = "iio")]
pub mod iio;

pub use acquisition::Ad4080Iio;
pub use config::Ad4080IioConfig;
pub use error::Error;

#[cfg(test)]
mod testing;
