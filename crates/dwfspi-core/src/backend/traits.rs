//! Backend trait definitions

use crate::error::Result;
use crate::spi::{BitOrder, DqMode, IdleMode, SpiMode, TriggerConfig};

/// SPI backend trait
///
/// One method per vendor primitive. Each call is applied to the device
/// immediately and in the order it is made; the vendor runtime is stateful,
/// so ordering is the caller's responsibility (see [`crate::session`]).
///
/// A backend that owns a device handle must release it when dropped.
///
/// Methods return [`Error::VendorCallFailed`](crate::Error::VendorCallFailed)
/// when the device rejects a call. Backends should log the vendor's own
/// message before returning.
pub trait SpiBackend {
    /// Short backend name used in log messages
    fn name(&self) -> &'static str;

    /// Enable or disable automatic device configuration
    fn set_auto_configure(&mut self, enable: bool) -> Result<()>;

    /// Set the SPI clock frequency in Hz
    fn set_frequency(&mut self, hz: f64) -> Result<()>;

    /// Assign the clock to a DIO pin
    fn set_clock_pin(&mut self, pin: u8) -> Result<()>;

    /// Assign data line `dq` (0 = MOSI/SISO, 1 = MISO) to a DIO pin
    fn set_data_pin(&mut self, dq: u8, pin: u8) -> Result<()>;

    /// Set the idle-output policy of data line `dq`
    fn set_idle(&mut self, dq: u8, idle: IdleMode) -> Result<()>;

    /// Set clock polarity and phase
    fn set_mode(&mut self, mode: SpiMode) -> Result<()>;

    /// Set the bit order
    fn set_bit_order(&mut self, order: BitOrder) -> Result<()>;

    /// Arm the digital-in trigger
    fn set_trigger(&mut self, trigger: &TriggerConfig) -> Result<()>;

    /// Assign chip-select to a DIO pin with the given idle level
    fn set_select_idle(&mut self, pin: u8, idle_high: bool) -> Result<()>;

    /// Drive chip-select on `pin` to `level_high`
    fn select(&mut self, pin: u8, level_high: bool) -> Result<()>;

    /// Clock out a single word of `bits` bits
    fn write_one(&mut self, lines: DqMode, bits: u8, value: u32) -> Result<()>;

    /// Clock in a single word of `bits` bits
    fn read_one(&mut self, lines: DqMode, bits: u8) -> Result<u32>;

    /// Full-duplex transfer of `tx` while capturing into `rx`
    ///
    /// Callers pass buffers of equal length.
    fn write_read(&mut self, lines: DqMode, bits: u8, tx: &[u8], rx: &mut [u8]) -> Result<()>;
}

// Blanket impl for boxed backends to allow trait objects
#[cfg(feature = "alloc")]
impl<B: SpiBackend + ?Sized> SpiBackend for alloc::boxed::Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn set_auto_configure(&mut self, enable: bool) -> Result<()> {
        (**self).set_auto_configure(enable)
    }

    fn set_frequency(&mut self, hz: f64) -> Result<()> {
        (**self).set_frequency(hz)
    }

    fn set_clock_pin(&mut self, pin: u8) -> Result<()> {
        (**self).set_clock_pin(pin)
    }

    fn set_data_pin(&mut self, dq: u8, pin: u8) -> Result<()> {
        (**self).set_data_pin(dq, pin)
    }

    fn set_idle(&mut self, dq: u8, idle: IdleMode) -> Result<()> {
        (**self).set_idle(dq, idle)
    }

    fn set_mode(&mut self, mode: SpiMode) -> Result<()> {
        (**self).set_mode(mode)
    }

    fn set_bit_order(&mut self, order: BitOrder) -> Result<()> {
        (**self).set_bit_order(order)
    }

    fn set_trigger(&mut self, trigger: &TriggerConfig) -> Result<()> {
        (**self).set_trigger(trigger)
    }

    fn set_select_idle(&mut self, pin: u8, idle_high: bool) -> Result<()> {
        (**self).set_select_idle(pin, idle_high)
    }

    fn select(&mut self, pin: u8, level_high: bool) -> Result<()> {
        (**self).select(pin, level_high)
    }

    fn write_one(&mut self, lines: DqMode, bits: u8, value: u32) -> Result<()> {
        (**self).write_one(lines, bits, value)
    }

    fn read_one(&mut self, lines: DqMode, bits: u8) -> Result<u32> {
        (**self).read_one(lines, bits)
    }

    fn write_read(&mut self, lines: DqMode, bits: u8, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        (**self).write_read(lines, bits, tx, rx)
    }
}
