//! IIO channel descriptor and attribute dispatch.
//!
//! The driver exposes one indexed `voltage` input channel. Its attributes
//! (`raw`, `scale`, `offset`) and the global device attributes are
//! addressed by a stable dispatch index, see [`Attribute`]. Values are
//! exchanged as ASCII through [`Ad4080Iio::attr_show`] and
//! [`Ad4080Iio::attr_store`].
//!
//! | Index | Attribute |
//! |-------|-----------|
//! | 0-2 | `raw`, `scale`, `offset` (channel) |
//! | 3-10 | `gpN_output_enable`, `gpN_func` for N = 0..3 |
//! | 11-12 | `fifo_mode`, `fifo_watermark` |
//! | 13-15 | `evt_detection_hysteresis`, `evt_detection_high`, `evt_detection_low` |
//! | 16-18 | `filter_select`, `filter_sinc_dec`, `device_mode` |

mod attr;

pub use attr::{mv_to_code, parse_real, parse_uint, Attribute};

use core::fmt::Write;

use crate::acquisition::Ad4080Iio;
use crate::constants::{ADC_GRANULARITY_BITS, FORMATTED_BYTES_PER_SAMPLE};
use crate::device::RegisterInterface;
use crate::error::Error;
use crate::platform::{GpioLine, IrqController};

/// Sample layout in the acquisition buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanType {
    /// `'s'` for signed, `'u'` for unsigned.
    pub sign: char,
    pub realbits: u8,
    pub storagebits: u8,
    pub shift: u8,
    pub is_big_endian: bool,
}

/// Channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelType {
    Voltage,
}

impl ChannelType {
    pub fn name(self) -> &'static str {
        match self {
            ChannelType::Voltage => "voltage",
        }
    }
}

/// Channel descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub kind: ChannelType,
    pub channel: u8,
    pub scan_index: u8,
    pub indexed: bool,
    pub output: bool,
    pub scan_type: ScanType,
    pub attributes: &'static [Attribute],
}

/// 20 significant bits in a zero-padded little-endian 32-bit word.
pub const SCAN_TYPE: ScanType = ScanType {
    sign: 's',
    realbits: ADC_GRANULARITY_BITS as u8,
    storagebits: (FORMATTED_BYTES_PER_SAMPLE * 8) as u8,
    shift: 0,
    is_big_endian: false,
};

/// Attributes of the voltage channel.
pub const CHANNEL_ATTRIBUTES: [Attribute; 3] =
    [Attribute::Raw, Attribute::Scale, Attribute::Offset];

/// Device-wide attributes, in dispatch order.
pub const GLOBAL_ATTRIBUTES: [Attribute; 16] = [
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

/// The single analog input channel.
pub const CHANNELS: [Channel; 1] = [Channel {
    kind: ChannelType::Voltage,
    channel: 0,
    scan_index: 0,
    indexed: true,
    output: false,
    scan_type: SCAN_TYPE,
    attributes: &CHANNEL_ATTRIBUTES,
}];

impl<IFACE, G, C> Ad4080Iio<IFACE, G, C>
where
    IFACE: RegisterInterface,
    G: GpioLine,
    C: IrqController,
{
    /// Channel descriptors exposed by the driver.
    pub fn channels(&self) -> &'static [Channel] {
        &CHANNELS
    }

    /// Device-wide attributes exposed by the driver.
    pub fn global_attributes(&self) -> &'static [Attribute] {
        &GLOBAL_ATTRIBUTES
    }

    /// Show the attribute at dispatch `index` into `out`.
    pub fn attr_show<W: Write>(
        &self,
        index: usize,
        out: &mut W,
    ) -> Result<(), Error<IFACE::Error>> {
        Attribute::from_index(index)
            .ok_or(Error::InvalidArgument)?
            .show(self, out)
    }

    /// Store `input` into the attribute at dispatch `index`.
    pub fn attr_store(&self, index: usize, input: &str) -> Result<(), Error<IFACE::Error>> {
        let attr = Attribute::from_index(index).ok_or(Error::InvalidArgument)?;
        log::debug!("ad4080: store {} = {:?}", attr.name(), input);
        attr.store(self, input)
    }

    /// Read a device register for debugging; bounded by the last register.
    pub fn debug_reg_read(&self, register: u16) -> Result<u8, Error<IFACE::Error>> {
        self.with_device(|adc| adc.reg_read(register))
    }

    /// Write a device register for debugging; bounded by the last register.
    pub fn debug_reg_write(&self, register: u16, value: u8) -> Result<(), Error<IFACE::Error>> {
        self.with_device(|adc| adc.reg_write(register, value))
    }
}
