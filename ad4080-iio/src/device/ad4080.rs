//! AD4080 register-level driver.
//!
//! Covers the registers that matter for FIFO capture and triggering: FIFO
//! mode and watermark, GP pin routing, event detection, offset, digital
//! filter, and operating mode.
//!
//! The driver is generic over any [`RegisterInterface`]; use
//! [`SpiInterface`](super::SpiInterface) for real hardware.
//!
//! # Example
//!
//! ```ignore
//! let mut adc = Ad4080::new(SpiInterface::new(cfg_spi, data_spi));
//! adc.init()?;                                  // soft reset + product ID check
//! adc.set_fifo_watermark(4096)?;
//! adc.set_fifo_mode(FifoMode::ImmediateTrigger)?;
//! ```

use super::interface::RegisterInterface;
use super::registers as reg;
use crate::constants::{FIFO_DEPTH, GPIO_COUNT};
use crate::error::Error;

// ── Public enums ───────────────────────────────────────────────────────────

/// FIFO operating mode (GENERAL_CONFIG bits 1:0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoMode {
    /// FIFO disabled.
    Disabled = 0,
    /// Start filling as soon as armed.
    ImmediateTrigger = 1,
    /// Fill on event, read the latest watermark worth of samples.
    EventTriggerWatermark = 2,
    /// Fill on event, read the whole FIFO.
    EventTriggerFullRead = 3,
}

impl FifoMode {
    /// Decode a 2-bit field value.
    pub fn from_bits(bits: u8) -> Self {
        match bits & reg::FIFO_MODE_MASK {
            0 => FifoMode::Disabled,
            1 => FifoMode::ImmediateTrigger,
            2 => FifoMode::EventTriggerWatermark,
            _ => FifoMode::EventTriggerFullRead,
        }
    }
}

/// One of the four GP pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gpio {
    Gp0 = 0,
    Gp1 = 1,
    Gp2 = 2,
    Gp3 = 3,
}

impl Gpio {
    /// All pins in index order.
    pub const ALL: [Gpio; GPIO_COUNT] = [Gpio::Gp0, Gpio::Gp1, Gpio::Gp2, Gpio::Gp3];

    /// Look up a pin by index; `None` past the last pin.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Pin index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Function-select register and nibble shift for this pin.
    fn function_field(self) -> (u16, u8) {
        match self {
            Gpio::Gp0 => (reg::GPIO_CONFIG_B, 0),
            Gpio::Gp1 => (reg::GPIO_CONFIG_B, 4),
            Gpio::Gp2 => (reg::GPIO_CONFIG_C, 0),
            Gpio::Gp3 => (reg::GPIO_CONFIG_C, 4),
        }
    }
}

/// GP pin direction (GPIO_CONFIG_A).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioDirection {
    Input,
    Output,
}

/// Function routed to a GP pin (4-bit select field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioFunction {
    /// Configuration SPI SDO.
    SpiSdo = 0,
    FifoFull = 1,
    FifoReadDone = 2,
    FilterResultReady = 3,
    HighThresholdDetect = 4,
    LowThresholdDetect = 5,
    StatusAlert = 6,
    GpioData = 7,
    FilterSyncInput = 8,
    ExternalEventTrigger = 9,
}

impl GpioFunction {
    /// Decode a select code; `None` for codes above 9.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => GpioFunction::SpiSdo,
            1 => GpioFunction::FifoFull,
            2 => GpioFunction::FifoReadDone,
            3 => GpioFunction::FilterResultReady,
            4 => GpioFunction::HighThresholdDetect,
            5 => GpioFunction::LowThresholdDetect,
            6 => GpioFunction::StatusAlert,
            7 => GpioFunction::GpioData,
            8 => GpioFunction::FilterSyncInput,
            9 => GpioFunction::ExternalEventTrigger,
            _ => return None,
        })
    }
}

/// Digital filter selection (FILTER_CONFIG bits 1:0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Filter {
    Disabled = 0,
    Sinc1 = 1,
    Sinc5 = 2,
    Sinc5Compensation = 3,
}

impl Filter {
    /// Decode a 2-bit field value.
    pub fn from_bits(bits: u8) -> Self {
        match bits & reg::FILTER_SEL_MASK {
            0 => Filter::Disabled,
            1 => Filter::Sinc1,
            2 => Filter::Sinc5,
            _ => Filter::Sinc5Compensation,
        }
    }
}

/// Sinc decimation rate (FILTER_CONFIG bits 6:3); code `n` decimates by 2^(n+1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SincDecimation(u8);

impl SincDecimation {
    /// Number of valid codes (2 through 1024).
    pub const COUNT: u8 = 10;

    /// Build from a field code; `None` for codes above 9.
    pub fn from_code(code: u8) -> Option<Self> {
        (code < Self::COUNT).then_some(SincDecimation(code))
    }

    /// Field code.
    pub fn code(self) -> u8 {
        self.0
    }

    /// Decimation factor.
    pub fn factor(self) -> u32 {
        2 << self.0
    }
}

/// Device operating mode (DEVICE_CONFIG bits 1:0). Code 1 is reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    Normal = 0,
    Standby = 2,
    Sleep = 3,
}

impl OperatingMode {
    /// Decode a field value; `None` for the reserved code.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & reg::OPERATING_MODE_MASK {
            0 => Some(OperatingMode::Normal),
            2 => Some(OperatingMode::Standby),
            3 => Some(OperatingMode::Sleep),
            _ => None,
        }
    }
}

/// Which event-detection threshold to access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Threshold {
    High,
    Low,
}

impl Threshold {
    fn lsb_register(self) -> u16 {
        match self {
            Threshold::High => reg::EVENT_DETECTION_HI_LSB,
            Threshold::Low => reg::EVENT_DETECTION_LO_LSB,
        }
    }
}

// ── Driver struct ──────────────────────────────────────────────────────────

/// AD4080 register driver.
pub struct Ad4080<IFACE> {
    iface: IFACE,
}

impl<IFACE> Ad4080<IFACE> {
    /// Wrap a register interface.
    pub fn new(iface: IFACE) -> Self {
        Self { iface }
    }

    /// Consume the driver and return the interface.
    pub fn release(self) -> IFACE {
        self.iface
    }

    /// Mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.iface
    }
}

impl<IFACE> Ad4080<IFACE>
where
    IFACE: RegisterInterface,
{
    // ── Low-level register helpers ─────────────────────────────────────

    /// Read one register.
    pub fn read(&mut self, register: u16) -> Result<u8, Error<IFACE::Error>> {
        self.iface.read_register(register).map_err(Error::Bus)
    }

    /// Write one register.
    pub fn write(&mut self, register: u16, value: u8) -> Result<(), Error<IFACE::Error>> {
        self.iface.write_register(register, value).map_err(Error::Bus)
    }

    /// Read-modify-write: `new = (current & !mask) | (value & mask)`.
    fn modify(&mut self, register: u16, value: u8, mask: u8) -> Result<u8, Error<IFACE::Error>> {
        let current = self.read(register)?;
        let new_val = (current & !mask) | (value & mask);
        self.write(register, new_val)?;
        Ok(new_val)
    }

    /// Read a two-byte field: high byte first, then low.
    fn read_u16(&mut self, lsb_register: u16, mask: u16) -> Result<u16, Error<IFACE::Error>> {
        let hi = self.read(lsb_register + 1)?;
        let lo = self.read(lsb_register)?;
        Ok(u16::from_be_bytes([hi, lo]) & mask)
    }

    /// Write a two-byte field: low byte first, then the masked high byte.
    fn write_u16(
        &mut self,
        lsb_register: u16,
        value: u16,
        mask: u16,
    ) -> Result<(), Error<IFACE::Error>> {
        let [hi, lo] = (value & mask).to_be_bytes();
        self.write(lsb_register, lo)?;
        self.write(lsb_register + 1, hi)
    }

    /// Read a 12-bit two's-complement field, sign-extended.
    fn read_i12(&mut self, lsb_register: u16) -> Result<i16, Error<IFACE::Error>> {
        let raw = self.read_u16(lsb_register, reg::SIGNED_12_MASK)?;
        // Shift the sign bit into bit 15, then arithmetic-shift back.
        Ok(((raw << 4) as i16) >> 4)
    }

    /// Write a 12-bit two's-complement field.
    fn write_i12(&mut self, lsb_register: u16, value: i16) -> Result<(), Error<IFACE::Error>> {
        if !(-2048..=2047).contains(&value) {
            return Err(Error::InvalidArgument);
        }
        self.write_u16(lsb_register, value as u16, reg::SIGNED_12_MASK)
    }

    // ── Identification ─────────────────────────────────────────────────

    /// Soft-reset the device and verify the product ID.
    pub fn init(&mut self) -> Result<(), Error<IFACE::Error>> {
        self.write(reg::INTERFACE_CONFIG_A, reg::SOFT_RESET)?;
        let id = self.product_id()?;
        if id != reg::PRODUCT_ID {
            log::warn!("ad4080: unexpected product id {:#06x}", id);
            return Err(Error::UnknownDevice(id));
        }
        Ok(())
    }

    /// Read the 16-bit product ID.
    pub fn product_id(&mut self) -> Result<u16, Error<IFACE::Error>> {
        self.read_u16(reg::PRODUCT_ID_L, 0xFFFF)
    }

    /// Debug register read, bounded to the documented register map.
    pub fn reg_read(&mut self, register: u16) -> Result<u8, Error<IFACE::Error>> {
        if register > reg::LAST_REG {
            return Err(Error::InvalidArgument);
        }
        self.read(register)
    }

    /// Debug register write, bounded to the documented register map.
    pub fn reg_write(&mut self, register: u16, value: u8) -> Result<(), Error<IFACE::Error>> {
        if register > reg::LAST_REG {
            return Err(Error::InvalidArgument);
        }
        self.write(register, value)
    }

    // ── FIFO ───────────────────────────────────────────────────────────

    /// Current FIFO mode.
    pub fn fifo_mode(&mut self) -> Result<FifoMode, Error<IFACE::Error>> {
        Ok(FifoMode::from_bits(self.read(reg::GENERAL_CONFIG)?))
    }

    /// Select the FIFO mode.
    pub fn set_fifo_mode(&mut self, mode: FifoMode) -> Result<(), Error<IFACE::Error>> {
        self.modify(reg::GENERAL_CONFIG, mode as u8, reg::FIFO_MODE_MASK)?;
        Ok(())
    }

    /// Current FIFO watermark in samples.
    pub fn fifo_watermark(&mut self) -> Result<u16, Error<IFACE::Error>> {
        self.read_u16(reg::FIFO_WATERMARK_LSB, reg::FIFO_WATERMARK_MASK)
    }

    /// Program the FIFO watermark (1 to [`FIFO_DEPTH`] samples).
    pub fn set_fifo_watermark(&mut self, watermark: u16) -> Result<(), Error<IFACE::Error>> {
        if watermark == 0 || watermark as usize > FIFO_DEPTH {
            return Err(Error::InvalidArgument);
        }
        self.write_u16(reg::FIFO_WATERMARK_LSB, watermark, reg::FIFO_WATERMARK_MASK)
    }

    /// Raw DEVICE_STATUS byte.
    pub fn status(&mut self) -> Result<u8, Error<IFACE::Error>> {
        self.read(reg::DEVICE_STATUS)
    }

    /// Whether the FIFO_FULL status flag is set.
    pub fn fifo_full(&mut self) -> Result<bool, Error<IFACE::Error>> {
        Ok(self.status()? & reg::STATUS_FIFO_FULL != 0)
    }

    /// Read FIFO contents (sync byte first) into `buf`.
    pub fn read_data(&mut self, buf: &mut [u8]) -> Result<(), Error<IFACE::Error>> {
        self.iface.read_data(buf).map_err(Error::Bus)
    }

    // ── GP pins ────────────────────────────────────────────────────────

    /// Direction of a GP pin.
    pub fn gpio_direction(&mut self, gpio: Gpio) -> Result<GpioDirection, Error<IFACE::Error>> {
        let config_a = self.read(reg::GPIO_CONFIG_A)?;
        Ok(if config_a & (1 << gpio.index()) != 0 {
            GpioDirection::Output
        } else {
            GpioDirection::Input
        })
    }

    /// Set the direction of a GP pin.
    pub fn set_gpio_direction(
        &mut self,
        gpio: Gpio,
        direction: GpioDirection,
    ) -> Result<(), Error<IFACE::Error>> {
        let bit = 1 << gpio.index();
        let value = match direction {
            GpioDirection::Output => bit,
            GpioDirection::Input => 0,
        };
        self.modify(reg::GPIO_CONFIG_A, value, bit)?;
        Ok(())
    }

    /// Raw 4-bit function code of a GP pin.
    pub fn gpio_function_code(&mut self, gpio: Gpio) -> Result<u8, Error<IFACE::Error>> {
        let (register, shift) = gpio.function_field();
        Ok((self.read(register)? >> shift) & 0x0F)
    }

    /// Function routed to a GP pin; `None` if the field holds an undefined code.
    pub fn gpio_function(
        &mut self,
        gpio: Gpio,
    ) -> Result<Option<GpioFunction>, Error<IFACE::Error>> {
        Ok(GpioFunction::from_code(self.gpio_function_code(gpio)?))
    }

    /// Route a function to a GP pin.
    pub fn set_gpio_function(
        &mut self,
        gpio: Gpio,
        function: GpioFunction,
    ) -> Result<(), Error<IFACE::Error>> {
        let (register, shift) = gpio.function_field();
        self.modify(register, (function as u8) << shift, 0x0F << shift)?;
        Ok(())
    }

    // ── Offset / event detection ───────────────────────────────────────

    /// Offset correction code (12-bit signed).
    pub fn offset(&mut self) -> Result<i16, Error<IFACE::Error>> {
        self.read_i12(reg::OFFSET_LSB)
    }

    /// Program the offset correction code (-2048..=2047).
    pub fn set_offset(&mut self, code: i16) -> Result<(), Error<IFACE::Error>> {
        self.write_i12(reg::OFFSET_LSB, code)
    }

    /// Event hysteresis code (10-bit).
    pub fn event_hysteresis(&mut self) -> Result<u16, Error<IFACE::Error>> {
        self.read_u16(reg::EVENT_HYSTERESIS_LSB, reg::EVENT_HYSTERESIS_MASK)
    }

    /// Program the event hysteresis code; bits above the field are dropped.
    pub fn set_event_hysteresis(&mut self, code: u16) -> Result<(), Error<IFACE::Error>> {
        self.write_u16(reg::EVENT_HYSTERESIS_LSB, code, reg::EVENT_HYSTERESIS_MASK)
    }

    /// Event detection threshold code (12-bit signed).
    pub fn event_threshold(&mut self, which: Threshold) -> Result<i16, Error<IFACE::Error>> {
        self.read_i12(which.lsb_register())
    }

    /// Program an event detection threshold code (-2048..=2047).
    pub fn set_event_threshold(
        &mut self,
        which: Threshold,
        code: i16,
    ) -> Result<(), Error<IFACE::Error>> {
        self.write_i12(which.lsb_register(), code)
    }

    // ── Digital filter ─────────────────────────────────────────────────

    /// Selected digital filter.
    pub fn filter(&mut self) -> Result<Filter, Error<IFACE::Error>> {
        Ok(Filter::from_bits(self.read(reg::FILTER_CONFIG)?))
    }

    /// Select the digital filter.
    pub fn set_filter(&mut self, filter: Filter) -> Result<(), Error<IFACE::Error>> {
        self.modify(reg::FILTER_CONFIG, filter as u8, reg::FILTER_SEL_MASK)?;
        Ok(())
    }

    /// Raw SINC_DEC_RATE code (0-15).
    pub fn sinc_decimation_code(&mut self) -> Result<u8, Error<IFACE::Error>> {
        let config = self.read(reg::FILTER_CONFIG)?;
        Ok((config & reg::SINC_DEC_RATE_MASK) >> reg::SINC_DEC_RATE_SHIFT)
    }

    /// Program the sinc decimation rate.
    pub fn set_sinc_decimation(
        &mut self,
        rate: SincDecimation,
    ) -> Result<(), Error<IFACE::Error>> {
        self.modify(
            reg::FILTER_CONFIG,
            rate.code() << reg::SINC_DEC_RATE_SHIFT,
            reg::SINC_DEC_RATE_MASK,
        )?;
        Ok(())
    }

    // ── Operating mode ─────────────────────────────────────────────────

    /// Raw OPERATING_MODES field.
    pub fn operating_mode_bits(&mut self) -> Result<u8, Error<IFACE::Error>> {
        Ok(self.read(reg::DEVICE_CONFIG)? & reg::OPERATING_MODE_MASK)
    }

    /// Current operating mode; `None` if the reserved code is set.
    pub fn operating_mode(&mut self) -> Result<Option<OperatingMode>, Error<IFACE::Error>> {
        Ok(OperatingMode::from_bits(self.operating_mode_bits()?))
    }

    /// Select the operating mode.
    pub fn set_operating_mode(&mut self, mode: OperatingMode) -> Result<(), Error<IFACE::Error>> {
        self.modify(reg::DEVICE_CONFIG, mode as u8, reg::OPERATING_MODE_MASK)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBus;

    fn make_adc() -> Ad4080<MockBus> {
        Ad4080::new(MockBus::new())
    }

    // ── Two-byte field tests ──────────────────────────────────────────

    #[test]
    fn offset_round_trip_negative() {
        let mut adc = make_adc();
        adc.set_offset(-100).unwrap();
        assert_eq!(adc.offset().unwrap(), -100);
    }

    #[test]
    fn offset_extremes() {
        let mut adc = make_adc();
        for code in [-2048i16, -1, 0, 1, 2047] {
            adc.set_offset(code).unwrap();
            assert_eq!(adc.offset().unwrap(), code, "code {code}");
        }
    }

    #[test]
    fn offset_out_of_range_rejected() {
        let mut adc = make_adc();
        assert_eq!(adc.set_offset(2048), Err(Error::InvalidArgument));
        assert_eq!(adc.set_offset(-2049), Err(Error::InvalidArgument));
        assert!(adc.release().writes.is_empty());
    }

    #[test]
    fn two_byte_write_is_low_then_high() {
        let mut adc = make_adc();
        adc.set_offset(-100).unwrap();
        let bus = adc.release();
        // -100 as 12-bit two's complement = 0xF9C
        assert_eq!(bus.writes, [(reg::OFFSET_LSB, 0x9C), (reg::OFFSET_MSB, 0x0F)]);
    }

    #[test]
    fn two_byte_read_is_high_then_low() {
        let mut adc = make_adc();
        adc.interface_mut().set_reg(reg::EVENT_DETECTION_HI_LSB, 0x34);
        adc.interface_mut().set_reg(reg::EVENT_DETECTION_HI_MSB, 0x02);
        assert_eq!(adc.event_threshold(Threshold::High).unwrap(), 0x234);
        let bus = adc.release();
        assert_eq!(bus.reads, [reg::EVENT_DETECTION_HI_MSB, reg::EVENT_DETECTION_HI_LSB]);
    }

    #[test]
    fn sign_extension_ignores_upper_nibble() {
        let mut adc = make_adc();
        // Garbage in the upper nibble of the MSB must not leak into the value.
        adc.interface_mut().set_reg(reg::OFFSET_LSB, 0xFF);
        adc.interface_mut().set_reg(reg::OFFSET_MSB, 0xF7);
        assert_eq!(adc.offset().unwrap(), 2047);
        adc.interface_mut().set_reg(reg::OFFSET_MSB, 0x08);
        adc.interface_mut().set_reg(reg::OFFSET_LSB, 0x00);
        assert_eq!(adc.offset().unwrap(), -2048);
    }

    #[test]
    fn thresholds_are_independent() {
        let mut adc = make_adc();
        adc.set_event_threshold(Threshold::High, 1000).unwrap();
        adc.set_event_threshold(Threshold::Low, -1000).unwrap();
        assert_eq!(adc.event_threshold(Threshold::High).unwrap(), 1000);
        assert_eq!(adc.event_threshold(Threshold::Low).unwrap(), -1000);
    }

    #[test]
    fn hysteresis_masks_to_ten_bits() {
        let mut adc = make_adc();
        adc.set_event_hysteresis(0xFFFF).unwrap();
        assert_eq!(adc.event_hysteresis().unwrap(), 0x3FF);
        assert_eq!(adc.release().read_reg(reg::EVENT_HYSTERESIS_MSB), 0x03);
    }

    // ── FIFO tests ────────────────────────────────────────────────────

    #[test]
    fn fifo_mode_preserves_other_bits() {
        let mut adc = make_adc();
        adc.interface_mut().set_reg(reg::GENERAL_CONFIG, 0xF0);
        adc.set_fifo_mode(FifoMode::ImmediateTrigger).unwrap();
        assert_eq!(adc.fifo_mode().unwrap(), FifoMode::ImmediateTrigger);
        assert_eq!(adc.release().read_reg(reg::GENERAL_CONFIG), 0xF1);
    }

    #[test]
    fn watermark_split_across_registers() {
        let mut adc = make_adc();
        adc.set_fifo_watermark(16_384).unwrap();
        assert_eq!(adc.fifo_watermark().unwrap(), 16_384);
        let bus = adc.release();
        assert_eq!(bus.read_reg(reg::FIFO_WATERMARK_LSB), 0x00);
        assert_eq!(bus.read_reg(reg::FIFO_WATERMARK_MSB), 0x40);
    }

    #[test]
    fn watermark_range_checked() {
        let mut adc = make_adc();
        assert_eq!(adc.set_fifo_watermark(0), Err(Error::InvalidArgument));
        assert_eq!(adc.set_fifo_watermark(16_385), Err(Error::InvalidArgument));
    }

    #[test]
    fn fifo_full_flag() {
        let mut adc = make_adc();
        assert!(!adc.fifo_full().unwrap());
        adc.interface_mut().set_reg(reg::DEVICE_STATUS, reg::STATUS_FIFO_FULL);
        assert!(adc.fifo_full().unwrap());
    }

    // ── GP pin tests ──────────────────────────────────────────────────

    #[test]
    fn gpio_function_nibbles() {
        let mut adc = make_adc();
        adc.set_gpio_function(Gpio::Gp0, GpioFunction::FifoFull).unwrap();
        adc.set_gpio_function(Gpio::Gp1, GpioFunction::StatusAlert).unwrap();
        adc.set_gpio_function(Gpio::Gp2, GpioFunction::GpioData).unwrap();
        adc.set_gpio_function(Gpio::Gp3, GpioFunction::ExternalEventTrigger).unwrap();
        assert_eq!(adc.gpio_function(Gpio::Gp1).unwrap(), Some(GpioFunction::StatusAlert));
        let bus = adc.release();
        assert_eq!(bus.read_reg(reg::GPIO_CONFIG_B), 0x61);
        assert_eq!(bus.read_reg(reg::GPIO_CONFIG_C), 0x97);
    }

    #[test]
    fn gpio_function_undefined_code() {
        let mut adc = make_adc();
        adc.interface_mut().set_reg(reg::GPIO_CONFIG_C, 0xF0);
        assert_eq!(adc.gpio_function(Gpio::Gp3).unwrap(), None);
        assert_eq!(adc.gpio_function_code(Gpio::Gp3).unwrap(), 0x0F);
    }

    #[test]
    fn gpio_direction_bits() {
        let mut adc = make_adc();
        adc.set_gpio_direction(Gpio::Gp2, GpioDirection::Output).unwrap();
        adc.set_gpio_direction(Gpio::Gp0, GpioDirection::Output).unwrap();
        adc.set_gpio_direction(Gpio::Gp0, GpioDirection::Input).unwrap();
        assert_eq!(adc.gpio_direction(Gpio::Gp2).unwrap(), GpioDirection::Output);
        assert_eq!(adc.gpio_direction(Gpio::Gp0).unwrap(), GpioDirection::Input);
        assert_eq!(adc.release().read_reg(reg::GPIO_CONFIG_A), 0b0100);
    }

    #[test]
    fn gpio_index_lookup() {
        assert_eq!(Gpio::from_index(3), Some(Gpio::Gp3));
        assert_eq!(Gpio::from_index(4), None);
    }

    // ── Filter / mode tests ───────────────────────────────────────────

    #[test]
    fn filter_and_decimation_share_register() {
        let mut adc = make_adc();
        adc.set_filter(Filter::Sinc5).unwrap();
        adc.set_sinc_decimation(SincDecimation::from_code(9).unwrap()).unwrap();
        assert_eq!(adc.filter().unwrap(), Filter::Sinc5);
        assert_eq!(adc.sinc_decimation_code().unwrap(), 9);
        assert_eq!(adc.release().read_reg(reg::FILTER_CONFIG), (9 << 3) | 2);
    }

    #[test]
    fn decimation_factors() {
        assert_eq!(SincDecimation::from_code(0).unwrap().factor(), 2);
        assert_eq!(SincDecimation::from_code(9).unwrap().factor(), 1024);
        assert!(SincDecimation::from_code(10).is_none());
    }

    #[test]
    fn operating_mode_reserved_code() {
        let mut adc = make_adc();
        adc.set_operating_mode(OperatingMode::Sleep).unwrap();
        assert_eq!(adc.operating_mode().unwrap(), Some(OperatingMode::Sleep));
        adc.interface_mut().set_reg(reg::DEVICE_CONFIG, 0x01);
        assert_eq!(adc.operating_mode().unwrap(), None);
    }

    // ── Identification / debug access ─────────────────────────────────

    #[test]
    fn init_resets_and_checks_id() {
        let mut adc = Ad4080::new(MockBus::with_product_id());
        adc.init().unwrap();
        assert_eq!(adc.release().writes[0], (reg::INTERFACE_CONFIG_A, reg::SOFT_RESET));
    }

    #[test]
    fn init_rejects_foreign_part() {
        let mut adc = make_adc();
        adc.interface_mut().set_reg(reg::PRODUCT_ID_L, 0x51);
        assert_eq!(adc.init(), Err(Error::UnknownDevice(0x0051)));
    }

    #[test]
    fn debug_access_bounded() {
        let mut adc = make_adc();
        adc.reg_write(reg::LAST_REG, 0x12).unwrap();
        assert_eq!(adc.reg_read(reg::LAST_REG).unwrap(), 0x12);
        assert_eq!(adc.reg_read(reg::LAST_REG + 1), Err(Error::InvalidArgument));
        assert_eq!(adc.reg_write(reg::LAST_REG + 1, 0), Err(Error::InvalidArgument));
    }

    #[test]
    fn bus_errors_propagate() {
        let mut adc = make_adc();
        adc.interface_mut().fail_write_to = Some(reg::GENERAL_CONFIG);
        assert!(matches!(adc.set_fifo_mode(FifoMode::Disabled), Err(Error::Bus(_))));
    }
}
