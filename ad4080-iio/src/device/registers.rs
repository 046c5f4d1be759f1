//! AD4080 register addresses and bitfield definitions.
//!
//! Register addresses are 15-bit; every register holds one byte. Multi-byte
//! fields are split across consecutive LSB/MSB registers.

// Some registers are defined for completeness (chip grade, gain, etc.)
// but are not yet used by the driver.
#![allow(dead_code)]

// ── SPI instruction phase ──────────────────────────────────────────────────

/// Read flag in the high byte of the 16-bit instruction.
pub const SPI_READ: u8 = 0x80;

/// Address bits carried by the instruction.
pub const SPI_ADDR_MASK: u16 = 0x7FFF;

// ── Interface configuration ────────────────────────────────────────────────

/// Interface configuration A.
/// - Bit 7 — SW_RESET
/// - Bit 5 — ADDR_ASC (address ascension)
/// - Bit 0 — SW_RESETX (mirror of bit 7)
pub const INTERFACE_CONFIG_A: u16 = 0x00;

/// Interface configuration B.
pub const INTERFACE_CONFIG_B: u16 = 0x01;

/// Writing this to INTERFACE_CONFIG_A issues a software reset.
pub const SOFT_RESET: u8 = 0x81;

// ── Device configuration ───────────────────────────────────────────────────

/// Device configuration.
/// - Bits 1:0 — OPERATING_MODES (0=normal, 2=standby, 3=sleep; 1 reserved)
pub const DEVICE_CONFIG: u16 = 0x02;

/// OPERATING_MODES field mask.
pub const OPERATING_MODE_MASK: u8 = 0b11;

// ── Identification ─────────────────────────────────────────────────────────

/// Chip type (read-only).
pub const CHIP_TYPE: u16 = 0x03;

/// Product ID, low byte.
pub const PRODUCT_ID_L: u16 = 0x04;

/// Product ID, high byte.
pub const PRODUCT_ID_H: u16 = 0x05;

/// Expected product ID.
pub const PRODUCT_ID: u16 = 0x0050;

/// Chip grade and revision.
pub const CHIP_GRADE: u16 = 0x06;

/// Scratch pad (free read/write).
pub const SCRATCH_PAD: u16 = 0x0A;

// ── Status ─────────────────────────────────────────────────────────────────

/// Device status.
/// - Bit 7 — FIFO_FULL
/// - Bit 6 — FIFO_READ_DONE
/// - Bit 5 — EVENT_DETECTED_HI
/// - Bit 4 — EVENT_DETECTED_LO
pub const DEVICE_STATUS: u16 = 0x14;

/// FIFO_FULL flag in DEVICE_STATUS.
pub const STATUS_FIFO_FULL: u8 = 1 << 7;

// ── GPIO ───────────────────────────────────────────────────────────────────

/// GPIO configuration A.
/// - Bits 3:0 — GPO_n_EN (1 = GPn is an output)
pub const GPIO_CONFIG_A: u16 = 0x19;

/// GPIO configuration B.
/// - Bits 7:4 — GPIO_1_SEL
/// - Bits 3:0 — GPIO_0_SEL
pub const GPIO_CONFIG_B: u16 = 0x1A;

/// GPIO configuration C.
/// - Bits 7:4 — GPIO_3_SEL
/// - Bits 3:0 — GPIO_2_SEL
pub const GPIO_CONFIG_C: u16 = 0x1B;

// ── FIFO ───────────────────────────────────────────────────────────────────

/// General configuration.
/// - Bits 1:0 — FIFO_MODE
pub const GENERAL_CONFIG: u16 = 0x1C;

/// FIFO_MODE field mask.
pub const FIFO_MODE_MASK: u8 = 0b11;

/// FIFO watermark, low byte.
pub const FIFO_WATERMARK_LSB: u16 = 0x1D;

/// FIFO watermark, high byte (bits 14:8 of the watermark).
pub const FIFO_WATERMARK_MSB: u16 = 0x1E;

/// Valid bits of the watermark field.
pub const FIFO_WATERMARK_MASK: u16 = 0x7FFF;

// ── Event detection ────────────────────────────────────────────────────────

/// Event hysteresis, low byte (10-bit field).
pub const EVENT_HYSTERESIS_LSB: u16 = 0x1F;

/// Event hysteresis, high byte.
pub const EVENT_HYSTERESIS_MSB: u16 = 0x20;

/// Valid bits of the hysteresis field.
pub const EVENT_HYSTERESIS_MASK: u16 = 0x03FF;

/// High event threshold, low byte (12-bit signed field).
pub const EVENT_DETECTION_HI_LSB: u16 = 0x21;

/// High event threshold, high byte.
pub const EVENT_DETECTION_HI_MSB: u16 = 0x22;

/// Low event threshold, low byte (12-bit signed field).
pub const EVENT_DETECTION_LO_LSB: u16 = 0x23;

/// Low event threshold, high byte.
pub const EVENT_DETECTION_LO_MSB: u16 = 0x24;

// ── Offset / gain ──────────────────────────────────────────────────────────

/// Offset correction, low byte (12-bit signed field).
pub const OFFSET_LSB: u16 = 0x25;

/// Offset correction, high byte.
pub const OFFSET_MSB: u16 = 0x26;

/// Gain correction, low byte.
pub const GAIN_LSB: u16 = 0x27;

/// Gain correction, high byte.
pub const GAIN_MSB: u16 = 0x28;

/// Valid bits of the 12-bit signed fields (offset, thresholds).
pub const SIGNED_12_MASK: u16 = 0x0FFF;

/// Sign bit of the 12-bit signed fields.
pub const SIGNED_12_SIGN: u16 = 1 << 11;

// ── Digital filter ─────────────────────────────────────────────────────────

/// Filter configuration.
/// - Bits 6:3 — SINC_DEC_RATE (decimation 2^(n+1))
/// - Bits 1:0 — FILTER_SEL (0=off, 1=sinc1, 2=sinc5, 3=sinc5+compensation)
pub const FILTER_CONFIG: u16 = 0x29;

/// FILTER_SEL field mask.
pub const FILTER_SEL_MASK: u8 = 0b11;

/// SINC_DEC_RATE field mask.
pub const SINC_DEC_RATE_MASK: u8 = 0b0111_1000;

/// SINC_DEC_RATE field shift.
pub const SINC_DEC_RATE_SHIFT: u8 = 3;

/// Highest register address reachable through debug register access.
pub const LAST_REG: u16 = FILTER_CONFIG;
