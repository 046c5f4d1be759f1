//! Driver initialisation parameters.

use crate::constants::{CAPTURE_TIMEOUT_POLLS, FIFO_DEPTH};

/// Parameters for [`Ad4080Iio::init`](crate::Ad4080Iio::init).
///
/// `GP` describes the MCU line wired to the FIFO-full GP pin and `OPS` the
/// interrupt controller behind it.
///
/// ```ignore
/// let config = Ad4080IioConfig::new(gp3_params, nvic_ops)
///     .fifo_full_gpio(3)
///     .watermark(4096);
/// ```
#[derive(Debug, Clone)]
pub struct Ad4080IioConfig<GP, OPS> {
    pub gpio_params: GP,
    pub irq_ops: OPS,
    /// Index (0-3) of the device GP pin that signals FIFO-full.
    pub fifo_full_gpio: usize,
    /// Initial FIFO watermark in samples.
    pub watermark: usize,
    /// Completion polls before a capture is abandoned.
    pub capture_timeout: u32,
}

impl<GP, OPS> Ad4080IioConfig<GP, OPS> {
    /// GP3 as FIFO-full, a full-depth watermark and the default timeout.
    pub fn new(gpio_params: GP, irq_ops: OPS) -> Self {
        Self {
            gpio_params,
            irq_ops,
            fifo_full_gpio: 3,
            watermark: FIFO_DEPTH,
            capture_timeout: CAPTURE_TIMEOUT_POLLS,
        }
    }

    pub fn fifo_full_gpio(mut self, index: usize) -> Self {
        self.fifo_full_gpio = index;
        self
    }

    pub fn watermark(mut self, samples: usize) -> Self {
        self.watermark = samples;
        self
    }

    pub fn capture_timeout(mut self, polls: u32) -> Self {
        self.capture_timeout = polls;
        self
    }
}
