/// Maximum FIFO depth of the AD4080, in samples.
pub const FIFO_DEPTH: usize = 16_384;

/// ADC resolution in bits.
pub const ADC_GRANULARITY_BITS: usize = 20;

/// Bytes one sample occupies in the raw FIFO stream.
pub const RAW_BYTES_PER_SAMPLE: usize = ADC_GRANULARITY_BITS.div_ceil(8);

/// Leading synchronisation byte (0xAA) that precedes every FIFO readout.
pub const SYNC_BYTE_LEN: usize = 1;

/// Bytes one formatted sample occupies (20-bit value in a 32-bit word).
pub const FORMATTED_BYTES_PER_SAMPLE: usize = 4;

/// Number of GP pins on the device.
pub const GPIO_COUNT: usize = 4;

/// Default number of completion polls before a capture is abandoned.
pub const CAPTURE_TIMEOUT_POLLS: u32 = 0xFFFF;

/// Reference voltage in volts.
pub const ADC_REF_VOLTAGE: f32 = 3.3;

/// Largest code the converter produces.
pub const ADC_MAX_CODE: u32 = (1 << ADC_GRANULARITY_BITS) - 1;

/// Millivolts per LSB of the `raw` channel value.
pub const DEFAULT_SCALE_MV: f32 = ADC_REF_VOLTAGE / ADC_MAX_CODE as f32 * 1000.0;

/// Millivolts per LSB of the offset correction field.
pub const OFFSET_LSB_MV: f32 = 0.005_72;

/// Millivolts per LSB of the event detection and hysteresis fields.
pub const EVENT_LSB_MV: f32 = 1.464_84;

/// Formatted samples staged per bulk write into an acquisition buffer.
pub const SUBMIT_CHUNK_SAMPLES: usize = 64;
