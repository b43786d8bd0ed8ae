//! dwfspi-dummy - In-memory loopback SPI device for testing
//!
//! This crate provides a dummy backend that records every call made to it
//! and loops MOSI back to MISO. It's useful for testing and development
//! without a Digital Discovery attached.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use dwfspi_core::backend::SpiBackend;
use dwfspi_core::error::{Error, Result};
use dwfspi_core::spi::{BitOrder, DqMode, IdleMode, SpiMode, TriggerConfig};

/// A call received by the dummy device, with its arguments
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call {
    /// `set_auto_configure`
    AutoConfigure(bool),
    /// `set_frequency`
    Frequency(f64),
    /// `set_clock_pin`
    ClockPin(u8),
    /// `set_data_pin` (dq, pin)
    DataPin(u8, u8),
    /// `set_idle` (dq, idle)
    Idle(u8, IdleMode),
    /// `set_mode`
    Mode(SpiMode),
    /// `set_bit_order`
    BitOrder(BitOrder),
    /// `set_trigger`
    Trigger(TriggerConfig),
    /// `set_select_idle` (pin, idle high)
    SelectIdle(u8, bool),
    /// `select` (pin, level high)
    Select(u8, bool),
    /// `write_one` (lines, bits, value)
    WriteOne(DqMode, u8, u32),
    /// `read_one` (lines, bits)
    ReadOne(DqMode, u8),
    /// `write_read` (lines, bits, length)
    WriteRead(DqMode, u8, usize),
}

/// Configuration for the dummy device
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Loop MOSI back to MISO; otherwise MISO reads `fill`
    pub loopback: bool,
    /// Byte read while nothing drives MISO
    pub fill: u8,
    /// Value returned by `read_one`
    pub read_one_value: u32,
    /// Make the n-th call (zero-based) fail
    pub fail_call: Option<usize>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            loopback: true,
            fill: 0xFF,
            read_one_value: 0,
            fail_call: None,
        }
    }
}

/// Dummy SPI device
///
/// Emulates just enough of the vendor runtime's state to be useful: MISO
/// only echoes MOSI once the bus has been primed with a write and
/// chip-select has been driven.
#[cfg(feature = "alloc")]
pub struct DummyDevice {
    config: DummyConfig,
    calls: Vec<Call>,
    mode: Option<SpiMode>,
    bit_order: Option<BitOrder>,
    frequency_hz: Option<f64>,
    driving: bool,
    selected: bool,
}

#[cfg(feature = "alloc")]
impl DummyDevice {
    /// Create a new dummy device with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            calls: Vec::new(),
            mode: None,
            bit_order: None,
            frequency_hz: None,
            driving: false,
            selected: false,
        }
    }

    /// Create a new loopback device
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Last SPI mode set
    pub fn mode(&self) -> Option<SpiMode> {
        self.mode
    }

    /// Last bit order set
    pub fn bit_order(&self) -> Option<BitOrder> {
        self.bit_order
    }

    /// Last clock frequency set
    pub fn frequency_hz(&self) -> Option<f64> {
        self.frequency_hz
    }

    fn record(&mut self, call: Call) -> Result<()> {
        let index = self.calls.len();
        self.calls.push(call);
        if self.config.fail_call == Some(index) {
            log::warn!("dummy: failing call #{} ({:?})", index, call);
            return Err(Error::VendorCallFailed);
        }
        log::trace!("dummy: {:?}", call);
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl SpiBackend for DummyDevice {
    fn name(&self) -> &'static str {
        "dummy"
    }

    fn set_auto_configure(&mut self, enable: bool) -> Result<()> {
        self.record(Call::AutoConfigure(enable))
    }

    fn set_frequency(&mut self, hz: f64) -> Result<()> {
        self.record(Call::Frequency(hz))?;
        self.frequency_hz = Some(hz);
        Ok(())
    }

    fn set_clock_pin(&mut self, pin: u8) -> Result<()> {
        self.record(Call::ClockPin(pin))
    }

    fn set_data_pin(&mut self, dq: u8, pin: u8) -> Result<()> {
        self.record(Call::DataPin(dq, pin))
    }

    fn set_idle(&mut self, dq: u8, idle: IdleMode) -> Result<()> {
        self.record(Call::Idle(dq, idle))
    }

    fn set_mode(&mut self, mode: SpiMode) -> Result<()> {
        self.record(Call::Mode(mode))?;
        self.mode = Some(mode);
        Ok(())
    }

    fn set_bit_order(&mut self, order: BitOrder) -> Result<()> {
        self.record(Call::BitOrder(order))?;
        self.bit_order = Some(order);
        Ok(())
    }

    fn set_trigger(&mut self, trigger: &TriggerConfig) -> Result<()> {
        self.record(Call::Trigger(*trigger))
    }

    fn set_select_idle(&mut self, pin: u8, idle_high: bool) -> Result<()> {
        self.record(Call::SelectIdle(pin, idle_high))
    }

    fn select(&mut self, pin: u8, level_high: bool) -> Result<()> {
        self.record(Call::Select(pin, level_high))?;
        self.selected = true;
        Ok(())
    }

    fn write_one(&mut self, lines: DqMode, bits: u8, value: u32) -> Result<()> {
        self.record(Call::WriteOne(lines, bits, value))?;
        self.driving = true;
        Ok(())
    }

    fn read_one(&mut self, lines: DqMode, bits: u8) -> Result<u32> {
        self.record(Call::ReadOne(lines, bits))?;
        Ok(self.config.read_one_value)
    }

    fn write_read(&mut self, lines: DqMode, bits: u8, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        self.record(Call::WriteRead(lines, bits, tx.len()))?;

        if self.config.loopback && self.driving && self.selected {
            for (r, t) in rx.iter_mut().zip(tx) {
                *r = *t;
            }
        } else {
            if self.config.loopback {
                log::debug!("dummy: bus not primed, MISO left idle");
            }
            rx.fill(self.config.fill);
        }
        Ok(())
    }
}
