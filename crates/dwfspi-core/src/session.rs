//! Session sequencing
//!
//! A session drives a backend through the configuration profile and one
//! transfer. The vendor runtime keeps state between calls and is sensitive
//! to their order, so `configure()` always issues them in this sequence:
//!
//! 1. enable auto-configuration
//! 2. clock frequency
//! 3. clock pin
//! 4. DQ0 and DQ1 pins
//! 5. DQ0 and DQ1 idle policy
//! 6. SPI mode
//! 7. bit order
//! 8. digital-in trigger
//! 9. chip-select pin and idle level
//! 10. a zero-bit write that starts driving clock and data
//! 11. chip-select
//!
//! By default a failing call is logged and the sequence carries on, which
//! matches how the vendor runtime is normally scripted. A strict session
//! stops at the first failure instead.

#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};

use crate::backend::SpiBackend;
use crate::error::{Error, Result, Step};
use crate::spi::SpiConfig;

/// One configured SPI session on a backend
pub struct SpiSession<'a, B: SpiBackend + ?Sized> {
    backend: &'a mut B,
    config: &'a SpiConfig,
    strict: bool,
}

impl<'a, B: SpiBackend + ?Sized> SpiSession<'a, B> {
    /// Create a lenient session
    pub fn new(backend: &'a mut B, config: &'a SpiConfig) -> Self {
        Self {
            backend,
            config,
            strict: false,
        }
    }

    /// Abort on the first failed vendor call instead of logging it
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Run one backend call, applying the failure policy
    fn apply<T>(
        &mut self,
        step: Step,
        call: impl FnOnce(&mut B) -> Result<T>,
    ) -> Result<Option<T>> {
        match call(&mut *self.backend) {
            Ok(value) => Ok(Some(value)),
            Err(e) if self.strict => {
                log::error!("{}: {} failed: {}", self.backend.name(), step, e);
                Err(Error::StepFailed(step))
            }
            Err(e) => {
                log::warn!(
                    "{}: {} failed ({}), continuing",
                    self.backend.name(),
                    step,
                    e
                );
                Ok(None)
            }
        }
    }

    /// Apply the configuration profile
    pub fn configure(&mut self) -> Result<()> {
        let config = self.config;
        let pins = config.pins;

        log::debug!(
            "{}: configuring SPI (mode {}, {:?}, {} Hz, CS={} CLK={} MOSI={} MISO={})",
            self.backend.name(),
            config.mode.index(),
            config.bit_order,
            config.frequency_hz,
            pins.cs,
            pins.clk,
            pins.mosi,
            pins.miso
        );

        self.apply(Step::AutoConfigure, |b| b.set_auto_configure(true))?;
        self.apply(Step::Frequency, |b| {
            b.set_frequency(config.frequency_hz as f64)
        })?;
        self.apply(Step::ClockPin, |b| b.set_clock_pin(pins.clk))?;
        self.apply(Step::DataPin, |b| b.set_data_pin(0, pins.mosi))?;
        self.apply(Step::DataPin, |b| b.set_data_pin(1, pins.miso))?;
        self.apply(Step::Idle, |b| b.set_idle(0, config.idle[0]))?;
        self.apply(Step::Idle, |b| b.set_idle(1, config.idle[1]))?;
        self.apply(Step::Mode, |b| b.set_mode(config.mode))?;
        self.apply(Step::BitOrder, |b| b.set_bit_order(config.bit_order))?;
        self.apply(Step::Trigger, |b| b.set_trigger(&config.trigger))?;
        self.apply(Step::SelectIdle, |b| {
            b.set_select_idle(pins.cs, config.cs_idle_high)
        })?;
        self.apply(Step::PrimeWrite, |b| b.write_one(config.lines, 0, 0))?;
        self.apply(Step::Select, |b| b.select(pins.cs, true))?;

        Ok(())
    }

    /// Transfer `tx` and capture the same number of bytes into `rx`
    pub fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        if tx.is_empty() {
            return Err(Error::EmptyData);
        }
        if tx.len() != rx.len() {
            return Err(Error::LengthMismatch {
                tx: tx.len(),
                rx: rx.len(),
            });
        }

        let config = self.config;

        if config.prime_read {
            if let Some(value) =
                self.apply(Step::PrimeRead, |b| b.read_one(config.lines, config.word_bits))?
            {
                log::trace!("{}: prime read returned 0x{:08X}", self.backend.name(), value);
            }
        }

        self.apply(Step::WriteRead, |b| {
            b.write_read(config.lines, config.word_bits, tx, rx)
        })?;

        log::debug!(
            "{}: transferred {} byte{}",
            self.backend.name(),
            tx.len(),
            if tx.len() == 1 { "" } else { "s" }
        );

        Ok(())
    }

    /// Transfer `tx` and return the captured bytes
    #[cfg(feature = "alloc")]
    pub fn transfer_vec(&mut self, tx: &[u8]) -> Result<Vec<u8>> {
        let mut rx = vec![0u8; tx.len()];
        self.transfer(tx, &mut rx)?;
        Ok(rx)
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use crate::spi::{BitOrder, DqMode, IdleMode, SpiMode, TriggerConfig};
    use alloc::string::{String, ToString};

    /// Records calls by name and fails the ones listed in `fail`
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        fail: Vec<&'static str>,
    }

    impl Recorder {
        fn record(&mut self, call: &'static str) -> Result<()> {
            self.calls.push(call.to_string());
            if self.fail.contains(&call) {
                Err(Error::VendorCallFailed)
            } else {
                Ok(())
            }
        }
    }

    impl SpiBackend for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }
        fn set_auto_configure(&mut self, _enable: bool) -> Result<()> {
            self.record("auto")
        }
        fn set_frequency(&mut self, _hz: f64) -> Result<()> {
            self.record("freq")
        }
        fn set_clock_pin(&mut self, _pin: u8) -> Result<()> {
            self.record("clk")
        }
        fn set_data_pin(&mut self, dq: u8, _pin: u8) -> Result<()> {
            self.record(if dq == 0 { "dq0" } else { "dq1" })
        }
        fn set_idle(&mut self, dq: u8, _idle: IdleMode) -> Result<()> {
            self.record(if dq == 0 { "idle0" } else { "idle1" })
        }
        fn set_mode(&mut self, _mode: SpiMode) -> Result<()> {
            self.record("mode")
        }
        fn set_bit_order(&mut self, _order: BitOrder) -> Result<()> {
            self.record("order")
        }
        fn set_trigger(&mut self, _trigger: &TriggerConfig) -> Result<()> {
            self.record("trigger")
        }
        fn set_select_idle(&mut self, _pin: u8, _idle_high: bool) -> Result<()> {
            self.record("cs_idle")
        }
        fn select(&mut self, _pin: u8, _level_high: bool) -> Result<()> {
            self.record("select")
        }
        fn write_one(&mut self, _lines: DqMode, _bits: u8, _value: u32) -> Result<()> {
            self.record("write_one")
        }
        fn read_one(&mut self, _lines: DqMode, _bits: u8) -> Result<u32> {
            self.record("read_one").map(|_| 0)
        }
        fn write_read(
            &mut self,
            _lines: DqMode,
            _bits: u8,
            tx: &[u8],
            rx: &mut [u8],
        ) -> Result<()> {
            self.record("write_read")?;
            rx.copy_from_slice(tx);
            Ok(())
        }
    }

    const CONFIGURE_ORDER: [&str; 13] = [
        "auto", "freq", "clk", "dq0", "dq1", "idle0", "idle1", "mode", "order", "trigger",
        "cs_idle", "write_one", "select",
    ];

    #[test]
    fn test_configure_order() {
        let mut backend = Recorder::default();
        let config = SpiConfig::default();
        SpiSession::new(&mut backend, &config).configure().unwrap();
        assert_eq!(backend.calls, CONFIGURE_ORDER);
    }

    #[test]
    fn test_transfer_with_prime_read() {
        let mut backend = Recorder::default();
        let config = SpiConfig::default();
        let rx = SpiSession::new(&mut backend, &config)
            .transfer_vec(&[0x40, 0x82])
            .unwrap();
        assert_eq!(rx, [0x40, 0x82]);
        assert_eq!(backend.calls, ["read_one", "write_read"]);
    }

    #[test]
    fn test_transfer_without_prime_read() {
        let mut backend = Recorder::default();
        let config = SpiConfig::default().with_prime_read(false);
        SpiSession::new(&mut backend, &config)
            .transfer_vec(&[0xAA])
            .unwrap();
        assert_eq!(backend.calls, ["write_read"]);
    }

    #[test]
    fn test_transfer_length_checks() {
        let mut backend = Recorder::default();
        let config = SpiConfig::default();
        let mut session = SpiSession::new(&mut backend, &config);

        let mut rx = [0u8; 2];
        assert_eq!(
            session.transfer(&[1, 2, 3], &mut rx),
            Err(Error::LengthMismatch { tx: 3, rx: 2 })
        );
        assert_eq!(session.transfer(&[], &mut []), Err(Error::EmptyData));
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn test_lenient_continues_after_failure() {
        let mut backend = Recorder {
            fail: vec!["mode"],
            ..Default::default()
        };
        let config = SpiConfig::default();
        SpiSession::new(&mut backend, &config).configure().unwrap();
        assert_eq!(backend.calls, CONFIGURE_ORDER);
    }

    #[test]
    fn test_strict_stops_at_failure() {
        let mut backend = Recorder {
            fail: vec!["mode"],
            ..Default::default()
        };
        let config = SpiConfig::default();
        let result = SpiSession::new(&mut backend, &config)
            .strict(true)
            .configure();
        assert_eq!(result, Err(Error::StepFailed(Step::Mode)));
        assert_eq!(backend.calls, CONFIGURE_ORDER[..8]);
    }

    #[test]
    fn test_strict_transfer_failure() {
        let mut backend = Recorder {
            fail: vec!["write_read"],
            ..Default::default()
        };
        let config = SpiConfig::default();
        let result = SpiSession::new(&mut backend, &config)
            .strict(true)
            .transfer_vec(&[0x01]);
        assert_eq!(result, Err(Error::StepFailed(Step::WriteRead)));
    }
}
