//! Channel and global attributes.
//!
//! Attribute values travel as ASCII. Integer inputs are decimal or
//! `0x`-prefixed hexadecimal; anything trailing the number is rejected.
//! Millivolt inputs are decimal reals, clamped to the field range and
//! rounded to the nearest code. Reals are shown as `{:10.6}`.

use core::fmt::{self, Write};

use crate::acquisition::Ad4080Iio;
use crate::constants::{DEFAULT_SCALE_MV, EVENT_LSB_MV, FIFO_DEPTH, OFFSET_LSB_MV};
use crate::device::{
    FifoMode, Filter, Gpio, GpioDirection, GpioFunction, OperatingMode, RegisterInterface,
    SincDecimation, Threshold,
};
use crate::error::Error;
use crate::platform::{GpioLine, IrqController};

/// Attribute identifiers, in dispatch-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Attribute {
    Raw,
    Scale,
    Offset,
    Gp0OutputEnable,
    Gp0Func,
    Gp1OutputEnable,
    Gp1Func,
    Gp2OutputEnable,
    Gp2Func,
    Gp3OutputEnable,
    Gp3Func,
    FifoMode,
    FifoWatermark,
    EvtDetectionHysteresis,
    EvtDetectionHigh,
    EvtDetectionLow,
    FilterSelect,
    FilterSincDec,
    DeviceMode,
}

impl Attribute {
    /// Number of attributes.
    pub const COUNT: usize = 19;

    /// All attributes, indexed by [`index()`](Self::index).
    pub const ALL: [Attribute; Self::COUNT] = [
        Attribute::Raw,
        Attribute::Scale,
        Attribute::Offset,
        Attribute::Gp0OutputEnable,
        Attribute::Gp0Func,
        Attribute::Gp1OutputEnable,
        Attribute::Gp1Func,
        Attribute::Gp2OutputEnable,
        Attribute::Gp2Func,
        Attribute::Gp3OutputEnable,
        Attribute::Gp3Func,
        Attribute::FifoMode,
        Attribute::FifoWatermark,
        Attribute::EvtDetectionHysteresis,
        Attribute::EvtDetectionHigh,
        Attribute::EvtDetectionLow,
        Attribute::FilterSelect,
        Attribute::FilterSincDec,
        Attribute::DeviceMode,
    ];

    /// Look up an attribute by dispatch index; `None` at or past [`COUNT`](Self::COUNT).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Dispatch index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Attribute name as exposed to IIO clients.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Raw => "raw",
            Attribute::Scale => "scale",
            Attribute::Offset => "offset",
            Attribute::Gp0OutputEnable => "gp0_output_enable",
            Attribute::Gp0Func => "gp0_func",
            Attribute::Gp1OutputEnable => "gp1_output_enable",
            Attribute::Gp1Func => "gp1_func",
            Attribute::Gp2OutputEnable => "gp2_output_enable",
            Attribute::Gp2Func => "gp2_func",
            Attribute::Gp3OutputEnable => "gp3_output_enable",
            Attribute::Gp3Func => "gp3_func",
            Attribute::FifoMode => "fifo_mode",
            Attribute::FifoWatermark => "fifo_watermark",
            Attribute::EvtDetectionHysteresis => "evt_detection_hysteresis",
            Attribute::EvtDetectionHigh => "evt_detection_high",
            Attribute::EvtDetectionLow => "evt_detection_low",
            Attribute::FilterSelect => "filter_select",
            Attribute::FilterSincDec => "filter_sinc_dec",
            Attribute::DeviceMode => "device_mode",
        }
    }

    /// Whether [`store()`](Self::store) is supported.
    pub fn is_writable(self) -> bool {
        !matches!(self, Attribute::Raw | Attribute::Scale)
    }

    /// The GP pin a per-pin attribute refers to.
    fn gpio(self) -> Option<Gpio> {
        match self {
            Attribute::Gp0OutputEnable | Attribute::Gp0Func => Some(Gpio::Gp0),
            Attribute::Gp1OutputEnable | Attribute::Gp1Func => Some(Gpio::Gp1),
            Attribute::Gp2OutputEnable | Attribute::Gp2Func => Some(Gpio::Gp2),
            Attribute::Gp3OutputEnable | Attribute::Gp3Func => Some(Gpio::Gp3),
            _ => None,
        }
    }

    /// Format the attribute's current value into `out`.
    ///
    /// `raw` runs one immediate-trigger capture and prints its first sample.
    /// A full `out` is reported as [`Error::BufferFull`].
    pub fn show<IFACE, G, C, W>(
        self,
        drv: &Ad4080Iio<IFACE, G, C>,
        out: &mut W,
    ) -> Result<(), Error<IFACE::Error>>
    where
        IFACE: RegisterInterface,
        G: GpioLine,
        C: IrqController,
        W: Write,
    {
        match self {
            Attribute::Raw => {
                drv.immediate_trigger_capture()?;
                let first = drv
                    .with_samples(|s| s.first().copied())
                    .ok_or(Error::InvalidArgument)?;
                emit(out, format_args!("{}", first))
            }
            Attribute::Scale => emit(out, format_args!("{:10.6}", DEFAULT_SCALE_MV)),
            Attribute::Offset => {
                let code = drv.with_device(|adc| adc.offset())?;
                emit(out, format_args!("{:10.6}", code as f32 * OFFSET_LSB_MV))
            }
            Attribute::Gp0OutputEnable
            | Attribute::Gp1OutputEnable
            | Attribute::Gp2OutputEnable
            | Attribute::Gp3OutputEnable => {
                let gpio = self.gpio().ok_or(Error::InvalidArgument)?;
                let direction = drv.with_device(|adc| adc.gpio_direction(gpio))?;
                out_str(
                    out,
                    match direction {
                        GpioDirection::Input => "input",
                        GpioDirection::Output => "output",
                    },
                )
            }
            Attribute::Gp0Func | Attribute::Gp1Func | Attribute::Gp2Func | Attribute::Gp3Func => {
                let gpio = self.gpio().ok_or(Error::InvalidArgument)?;
                let function = drv.with_device(|adc| adc.gpio_function(gpio))?;
                out_str(out, function.map_or("Invalid Function", gpio_function_name))
            }
            Attribute::FifoMode => {
                let mode = drv.with_device(|adc| adc.fifo_mode())?;
                out_str(out, fifo_mode_name(mode))
            }
            Attribute::FifoWatermark => {
                let watermark = drv.with_device(|adc| adc.fifo_watermark())?;
                emit(out, format_args!("{}", watermark))
            }
            Attribute::EvtDetectionHysteresis => {
                let code = drv.with_device(|adc| adc.event_hysteresis())?;
                emit(out, format_args!("{:10.6}", code as f32 * EVENT_LSB_MV))
            }
            Attribute::EvtDetectionHigh | Attribute::EvtDetectionLow => {
                let which = self.threshold();
                let code = drv.with_device(|adc| adc.event_threshold(which))?;
                emit(out, format_args!("{:10.6}", code as f32 * EVENT_LSB_MV))
            }
            Attribute::FilterSelect => {
                let filter = drv.with_device(|adc| adc.filter())?;
                out_str(out, filter_name(filter))
            }
            Attribute::FilterSincDec => {
                let code = drv.with_device(|adc| adc.sinc_decimation_code())?;
                match SincDecimation::from_code(code) {
                    Some(rate) => emit(out, format_args!("{}", rate.factor())),
                    None => out_str(out, "Invalid"),
                }
            }
            Attribute::DeviceMode => {
                let mode = drv.with_device(|adc| adc.operating_mode())?;
                out_str(out, mode.map_or("Reserved", operating_mode_name))
            }
        }
    }

    /// Parse `input` and apply it to the device.
    ///
    /// Malformed or out-of-range input fails with
    /// [`Error::InvalidArgument`] before any register is touched.
    pub fn store<IFACE, G, C>(
        self,
        drv: &Ad4080Iio<IFACE, G, C>,
        input: &str,
    ) -> Result<(), Error<IFACE::Error>>
    where
        IFACE: RegisterInterface,
        G: GpioLine,
        C: IrqController,
    {
        match self {
            Attribute::Raw | Attribute::Scale => Err(Error::InvalidArgument),
            Attribute::Offset => {
                let code = mv_to_code(parse_real(input)?, OFFSET_LSB_MV, -2048, 2047);
                drv.with_device(|adc| adc.set_offset(code))
            }
            Attribute::Gp0OutputEnable
            | Attribute::Gp1OutputEnable
            | Attribute::Gp2OutputEnable
            | Attribute::Gp3OutputEnable => {
                let gpio = self.gpio().ok_or(Error::InvalidArgument)?;
                let direction = match parse_uint(input)? {
                    0 => GpioDirection::Input,
                    1 => GpioDirection::Output,
                    _ => return Err(Error::InvalidArgument),
                };
                drv.with_device(|adc| adc.set_gpio_direction(gpio, direction))
            }
            Attribute::Gp0Func | Attribute::Gp1Func | Attribute::Gp2Func | Attribute::Gp3Func => {
                let gpio = self.gpio().ok_or(Error::InvalidArgument)?;
                let function = u8::try_from(parse_uint(input)?)
                    .ok()
                    .and_then(GpioFunction::from_code)
                    .ok_or(Error::InvalidArgument)?;
                drv.with_device(|adc| adc.set_gpio_function(gpio, function))
            }
            Attribute::FifoMode => {
                let code = parse_uint(input)?;
                if code > FifoMode::EventTriggerFullRead as u32 {
                    return Err(Error::InvalidArgument);
                }
                drv.with_device(|adc| adc.set_fifo_mode(FifoMode::from_bits(code as u8)))
            }
            Attribute::FifoWatermark => {
                let watermark = parse_uint(input)? as usize;
                if !(1..=FIFO_DEPTH).contains(&watermark) {
                    return Err(Error::InvalidArgument);
                }
                drv.set_watermark(watermark)
            }
            Attribute::EvtDetectionHysteresis => {
                let code = mv_to_code(parse_real(input)?, EVENT_LSB_MV, 0, 0x3FF);
                drv.with_device(|adc| adc.set_event_hysteresis(code as u16))
            }
            Attribute::EvtDetectionHigh | Attribute::EvtDetectionLow => {
                let which = self.threshold();
                let code = mv_to_code(parse_real(input)?, EVENT_LSB_MV, -2048, 2047);
                drv.with_device(|adc| adc.set_event_threshold(which, code))
            }
            Attribute::FilterSelect => {
                let code = parse_uint(input)?;
                if code > Filter::Sinc5Compensation as u32 {
                    return Err(Error::InvalidArgument);
                }
                drv.with_device(|adc| adc.set_filter(Filter::from_bits(code as u8)))
            }
            Attribute::FilterSincDec => {
                let rate = u8::try_from(parse_uint(input)?)
                    .ok()
                    .and_then(SincDecimation::from_code)
                    .ok_or(Error::InvalidArgument)?;
                drv.with_device(|adc| adc.set_sinc_decimation(rate))
            }
            Attribute::DeviceMode => {
                let mode = u8::try_from(parse_uint(input)?)
                    .ok()
                    .filter(|&code| code <= OperatingMode::Sleep as u8)
                    .and_then(OperatingMode::from_bits)
                    .ok_or(Error::InvalidArgument)?;
                drv.with_device(|adc| adc.set_operating_mode(mode))
            }
        }
    }

    fn threshold(self) -> Threshold {
        if self == Attribute::EvtDetectionLow {
            Threshold::Low
        } else {
            Threshold::High
        }
    }
}

fn gpio_function_name(function: GpioFunction) -> &'static str {
    match function {
        GpioFunction::SpiSdo => "Cfg SPI SDO",
        GpioFunction::FifoFull => "FIFO Full Flag",
        GpioFunction::FifoReadDone => "FIFO Read Done Flag",
        GpioFunction::FilterResultReady => "Filter Result Ready",
        GpioFunction::HighThresholdDetect => "High Threshold Detect",
        GpioFunction::LowThresholdDetect => "Low Threshold Detect",
        GpioFunction::StatusAlert => "Status Alert",
        GpioFunction::GpioData => "GPIO Data",
        GpioFunction::FilterSyncInput => "Filter Synch Input",
        GpioFunction::ExternalEventTrigger => "Ext Evt Trigger Input",
    }
}

fn fifo_mode_name(mode: FifoMode) -> &'static str {
    match mode {
        FifoMode::Disabled => "FIFO disabled",
        FifoMode::ImmediateTrigger => "Immediate trigger mode",
        FifoMode::EventTriggerWatermark => "Evt trigger capture, read latest watermark",
        FifoMode::EventTriggerFullRead => "Evt trigger capture, read all FIFO",
    }
}

fn filter_name(filter: Filter) -> &'static str {
    match filter {
        Filter::Disabled => "Disabled",
        Filter::Sinc1 => "Sinc1",
        Filter::Sinc5 => "Sinc5",
        Filter::Sinc5Compensation => "Sinc5 Compensation",
    }
}

fn operating_mode_name(mode: OperatingMode) -> &'static str {
    match mode {
        OperatingMode::Normal => "Normal",
        OperatingMode::Standby => "Standby",
        OperatingMode::Sleep => "Sleep",
    }
}

// ── Value conversion ───────────────────────────────────────────────────────

/// Parse a decimal or `0x`-prefixed hexadecimal integer. Only digits of
/// the radix are accepted, so signs are rejected.
pub fn parse_uint<E>(input: &str) -> Result<u32, Error<E>> {
    let (digits, radix) = match input.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (input, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(Error::InvalidArgument);
    }
    u32::from_str_radix(digits, radix).map_err(|_| Error::InvalidArgument)
}

/// Parse a decimal real. NaN is rejected.
pub fn parse_real<E>(input: &str) -> Result<f32, Error<E>> {
    match input.parse::<f32>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(Error::InvalidArgument),
    }
}

/// Convert millivolts to a field code: clamp to `[min, max]` codes, round
/// to nearest.
pub fn mv_to_code(mv: f32, lsb_mv: f32, min: i16, max: i16) -> i16 {
    let clamped = mv.clamp(min as f32 * lsb_mv, max as f32 * lsb_mv);
    (libm::roundf(clamped / lsb_mv) as i16).clamp(min, max)
}

fn emit<E, W: Write>(out: &mut W, args: fmt::Arguments<'_>) -> Result<(), Error<E>> {
    out.write_fmt(args).map_err(|_| Error::BufferFull)
}

fn out_str<E, W: Write>(out: &mut W, s: &str) -> Result<(), Error<E>> {
    out.write_str(s).map_err(|_| Error::BufferFull)
}
