//! Host-side mocks for the register bus and the platform capabilities.

extern crate std;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::vec;
use std::vec::Vec;

use crate::acquisition::Ad4080Iio;
use crate::config::Ad4080IioConfig;
use crate::device::registers as reg;
use crate::device::RegisterInterface;
use crate::io::{AcquisitionBuffer, BufferFull};
use crate::platform::{GpioLine, IrqController, TriggerLevel};

// ── Register bus ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

/// Register-file bus with a read/write log and failure injection.
///
/// With `fill_on_arm` set, DEVICE_STATUS reports FIFO_FULL whenever the FIFO
/// mode field is non-zero, i.e. the FIFO fills the instant it is armed.
pub struct MockBus {
    regs: [u8; 0x80],
    /// Writes in chronological order.
    pub writes: Vec<(u16, u8)>,
    /// Register reads in chronological order.
    pub reads: Vec<u16>,
    /// Bytes served by `read_data`, sync byte first.
    pub fifo_data: Vec<u8>,
    pub fill_on_arm: bool,
    pub fail_write_to: Option<u16>,
    pub fail_read_from: Option<u16>,
    pub fail_data: bool,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            regs: [0; 0x80],
            writes: Vec::new(),
            reads: Vec::new(),
            fifo_data: Vec::new(),
            fill_on_arm: false,
            fail_write_to: None,
            fail_read_from: None,
            fail_data: false,
        }
    }

    /// A bus whose product ID registers identify an AD4080.
    pub fn with_product_id() -> Self {
        let mut bus = Self::new();
        let [hi, lo] = reg::PRODUCT_ID.to_be_bytes();
        bus.set_reg(reg::PRODUCT_ID_L, lo);
        bus.set_reg(reg::PRODUCT_ID_H, hi);
        bus
    }

    /// An AD4080 whose FIFO fills with `samples` as soon as it is armed.
    pub fn with_samples(samples: &[u32]) -> Self {
        let mut bus = Self::with_product_id();
        bus.fill_on_arm = true;
        bus.fifo_data = pack_samples(samples);
        bus
    }

    /// Current register value; 0 if never written.
    pub fn read_reg(&self, register: u16) -> u8 {
        self.regs.get(register as usize).copied().unwrap_or(0)
    }

    /// Preload a register without logging.
    pub fn set_reg(&mut self, register: u16, value: u8) {
        if let Some(slot) = self.regs.get_mut(register as usize) {
            *slot = value;
        }
    }

    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.reads.clear();
    }

    /// Whether any logged write targeted `register`.
    pub fn wrote_to(&self, register: u16) -> bool {
        self.writes.iter().any(|&(r, _)| r == register)
    }
}

impl RegisterInterface for MockBus {
    type Error = MockBusError;

    fn read_register(&mut self, register: u16) -> Result<u8, Self::Error> {
        if self.fail_read_from == Some(register) {
            return Err(MockBusError);
        }
        self.reads.push(register);
        let mut value = self.read_reg(register);
        if register == reg::DEVICE_STATUS && self.fill_on_arm {
            if self.read_reg(reg::GENERAL_CONFIG) & reg::FIFO_MODE_MASK != 0 {
                value |= reg::STATUS_FIFO_FULL;
            } else {
                value &= !reg::STATUS_FIFO_FULL;
            }
        }
        Ok(value)
    }

    fn write_register(&mut self, register: u16, value: u8) -> Result<(), Self::Error> {
        if self.fail_write_to == Some(register) {
            return Err(MockBusError);
        }
        self.writes.push((register, value));
        self.set_reg(register, value);
        Ok(())
    }

    fn read_data(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        if self.fail_data {
            return Err(MockBusError);
        }
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.fifo_data.get(i).copied().unwrap_or(0);
        }
        Ok(())
    }
}

/// Raw FIFO stream: 0xAA sync byte then big-endian 24-bit triplets.
pub fn pack_samples(samples: &[u32]) -> Vec<u8> {
    let mut raw = vec![0xAA];
    for s in samples {
        raw.extend_from_slice(&s.to_be_bytes()[1..]);
    }
    raw
}

// ── Platform ───────────────────────────────────────────────────────────────

/// Platform call, as recorded in the shared log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    GpioAcquire,
    GpioSetInput,
    GpioRelease,
    IrqInit,
    IrqRegister(u32),
    IrqUnregister(u32),
    IrqTrigger(u32, TriggerLevel),
    IrqEnable(u32),
    IrqDisable(u32),
    IrqRemove,
}

/// Shared call log plus the call that should fail, if any.
#[derive(Clone, Default)]
pub struct CallLog {
    inner: Arc<Mutex<LogState>>,
}

#[derive(Default)]
struct LogState {
    calls: Vec<Call>,
    fail_on: Option<Call>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next occurrence of `call` fail (it is not logged).
    pub fn fail_on(&self, call: Call) {
        self.lock().fail_on = Some(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear(&self) {
        self.lock().calls.clear();
    }

    fn record(&self, call: Call) -> Result<(), MockPlatformError> {
        let mut state = self.lock();
        if state.fail_on == Some(call) {
            state.fail_on = None;
            return Err(MockPlatformError(call));
        }
        state.calls.push(call);
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LogState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPlatformError(pub Call);

/// GPIO line parameters: the log to record into and the interrupt number.
#[derive(Clone)]
pub struct MockGpioParams {
    pub log: CallLog,
    pub irq: u32,
}

pub struct MockGpio {
    log: CallLog,
    irq: u32,
}

impl GpioLine for MockGpio {
    type Params = MockGpioParams;
    type Error = MockPlatformError;

    fn acquire(params: &Self::Params) -> Result<Self, Self::Error> {
        params.log.record(Call::GpioAcquire)?;
        Ok(Self {
            log: params.log.clone(),
            irq: params.irq,
        })
    }

    fn set_input(&mut self) -> Result<(), Self::Error> {
        self.log.record(Call::GpioSetInput)
    }

    fn irq_number(&self) -> u32 {
        self.irq
    }

    fn release(self) {
        let _ = self.log.record(Call::GpioRelease);
    }
}

#[derive(Clone)]
pub struct MockIrqOps {
    pub log: CallLog,
}

pub struct MockIrq {
    log: CallLog,
}

impl IrqController for MockIrq {
    type Ops = MockIrqOps;
    type Error = MockPlatformError;

    fn init(ops: &Self::Ops) -> Result<Self, Self::Error> {
        ops.log.record(Call::IrqInit)?;
        Ok(Self {
            log: ops.log.clone(),
        })
    }

    fn register_callback(&mut self, irq: u32) -> Result<(), Self::Error> {
        self.log.record(Call::IrqRegister(irq))
    }

    fn unregister_callback(&mut self, irq: u32) -> Result<(), Self::Error> {
        self.log.record(Call::IrqUnregister(irq))
    }

    fn set_trigger_level(&mut self, irq: u32, level: TriggerLevel) -> Result<(), Self::Error> {
        self.log.record(Call::IrqTrigger(irq, level))
    }

    fn enable(&mut self, irq: u32) -> Result<(), Self::Error> {
        self.log.record(Call::IrqEnable(irq))
    }

    fn disable(&mut self, irq: u32) -> Result<(), Self::Error> {
        self.log.record(Call::IrqDisable(irq))
    }

    fn remove(self) {
        let _ = self.log.record(Call::IrqRemove);
    }
}

/// Interrupt number used by [`platform()`].
pub const MOCK_IRQ: u32 = 7;

/// GPIO params and IRQ ops sharing one call log.
pub fn platform() -> (MockGpioParams, MockIrqOps, CallLog) {
    let log = CallLog::new();
    (
        MockGpioParams {
            log: log.clone(),
            irq: MOCK_IRQ,
        },
        MockIrqOps { log: log.clone() },
        log,
    )
}

// ── Acquisition sink ───────────────────────────────────────────────────────

/// Growable sink with a declared capacity that counts bulk writes.
pub struct VecSink {
    pub data: Vec<u8>,
    pub capacity: usize,
    pub writes: usize,
}

impl VecSink {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::new(),
            capacity,
            writes: 0,
        }
    }
}

impl AcquisitionBuffer for VecSink {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn free(&self) -> usize {
        self.capacity.saturating_sub(self.data.len())
    }

    fn bulk_write(&mut self, data: &[u8]) -> Result<(), BufferFull> {
        if self.data.len() + data.len() > self.capacity {
            return Err(BufferFull);
        }
        self.data.extend_from_slice(data);
        self.writes += 1;
        Ok(())
    }
}

// ── Driver fixtures ────────────────────────────────────────────────────────

pub type MockDriver = Ad4080Iio<MockBus, MockGpio, MockIrq>;

/// Driver on `bus` with FIFO-full on GP0 and an effectively unbounded timeout.
pub fn mock_driver(bus: MockBus, watermark: usize) -> (MockDriver, CallLog) {
    let (params, ops, log) = platform();
    let config = Ad4080IioConfig::new(params, ops)
        .fifo_full_gpio(0)
        .watermark(watermark)
        .capture_timeout(u32::MAX);
    match Ad4080Iio::init(bus, config) {
        Ok(drv) => (drv, log),
        Err(e) => panic!("driver init failed: {e:?}"),
    }
}

/// Call the interrupt handler in a loop on a second thread while `body`
/// runs, like a level-triggered GPIO interrupt would.
pub fn with_isr<R>(drv: &MockDriver, body: impl FnOnce() -> R) -> R {
    let stop = AtomicBool::new(false);
    std::thread::scope(|s| {
        s.spawn(|| {
            while !stop.load(Ordering::Acquire) {
                drv.on_interrupt();
                std::thread::yield_now();
            }
        });
        let r = body();
        stop.store(true, Ordering::Release);
        r
    })
}
