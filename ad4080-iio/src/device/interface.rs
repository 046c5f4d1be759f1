//! Register bus abstraction.
//!
//! The driver only needs byte-wide register access plus a bulk read of the
//! FIFO contents. [`SpiInterface`] provides both over two
//! [`embedded_hal::spi::SpiDevice`]s: the configuration SPI for registers and
//! the data SPI for FIFO readout.

use core::fmt::Debug;

use embedded_hal::spi::{Error as _, ErrorKind, Operation, SpiDevice};

use super::registers as reg;

/// Low-level bus access required by the driver.
pub trait RegisterInterface {
    /// Error type produced by the concrete bus implementation.
    type Error: Debug + Copy;

    /// Read a single register.
    fn read_register(&mut self, register: u16) -> Result<u8, Self::Error>;

    /// Write a single register.
    fn write_register(&mut self, register: u16, value: u8) -> Result<(), Self::Error>;

    /// Read `buf.len()` bytes of FIFO data, sync byte included.
    fn read_data(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// SPI transport: configuration bus for registers, data bus for the FIFO.
pub struct SpiInterface<CFG, DATA> {
    cfg: CFG,
    data: DATA,
}

impl<CFG, DATA> SpiInterface<CFG, DATA> {
    /// Wrap the two SPI devices.
    pub fn new(cfg: CFG, data: DATA) -> Self {
        Self { cfg, data }
    }

    /// Consume the interface and return both SPI devices.
    pub fn release(self) -> (CFG, DATA) {
        (self.cfg, self.data)
    }

    fn instruction(register: u16, read: bool) -> [u8; 2] {
        let addr = register & reg::SPI_ADDR_MASK;
        let hi = (addr >> 8) as u8;
        [if read { hi | reg::SPI_READ } else { hi }, addr as u8]
    }
}

impl<CFG, DATA> RegisterInterface for SpiInterface<CFG, DATA>
where
    CFG: SpiDevice,
    DATA: SpiDevice,
{
    type Error = ErrorKind;

    fn read_register(&mut self, register: u16) -> Result<u8, Self::Error> {
        let instr = Self::instruction(register, true);
        let mut value = [0u8; 1];
        self.cfg
            .transaction(&mut [Operation::Write(&instr), Operation::Read(&mut value)])
            .map_err(|e| e.kind())?;
        Ok(value[0])
    }

    fn write_register(&mut self, register: u16, value: u8) -> Result<(), Self::Error> {
        let [hi, lo] = Self::instruction(register, false);
        self.cfg.write(&[hi, lo, value]).map_err(|e| e.kind())
    }

    fn read_data(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.data.read(buf).map_err(|e| e.kind())
    }
}
