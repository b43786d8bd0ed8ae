//! WaveForms device implementation
//!
//! This module provides the `DwfDevice` struct that implements the
//! `SpiBackend` trait on top of the runtime's digital SPI protocol calls.

use std::ffi::c_int;

use dwfspi_core::backend::SpiBackend;
use dwfspi_core::error::{Error as CoreError, Result as CoreResult};
use dwfspi_core::spi::{BitOrder, DqMode, IdleMode, SpiMode, TriggerConfig};

use crate::error::{DwfError, Result};
use crate::library::{DwfLibrary, Hdwf, DEFAULT_LIBRARY, FIRST_DEVICE};

/// Configuration for opening a device
#[derive(Debug, Clone)]
pub struct DwfConfig {
    /// Runtime library path (default: platform runtime)
    pub library: String,
    /// Device index, -1 for the first available device
    pub device: i32,
    /// Device configuration index, if a specific one is wanted
    pub device_config: Option<i32>,
}

impl Default for DwfConfig {
    fn default() -> Self {
        Self {
            library: DEFAULT_LIBRARY.to_string(),
            device: FIRST_DEVICE,
            device_config: None,
        }
    }
}

impl DwfConfig {
    /// Create a configuration that opens the first available device
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the runtime from a specific path
    pub fn with_library(mut self, path: impl Into<String>) -> Self {
        self.library = path.into();
        self
    }

    /// Open the device with the given index
    pub fn with_device(mut self, index: i32) -> Self {
        self.device = index;
        self
    }

    /// Open the device with a specific configuration index
    pub fn with_device_config(mut self, config: Option<i32>) -> Self {
        self.device_config = config;
        self
    }
}

/// WaveForms device used as an SPI master
///
/// Owns both the loaded runtime and the device handle. The handle is closed
/// when the device is dropped.
pub struct DwfDevice {
    hdwf: Hdwf,
    // Dropped after the handle is closed
    lib: DwfLibrary,
}

impl DwfDevice {
    /// Load the runtime and open a device
    pub fn open(config: &DwfConfig) -> Result<Self> {
        let lib = DwfLibrary::load(&config.library)?;

        match lib.version() {
            Some(version) => log::debug!("dwf: Runtime {} ({})", version, lib.path()),
            None => log::debug!("dwf: Runtime version unknown ({})", lib.path()),
        }

        let hdwf = lib.open_handle(config.device, config.device_config)?;

        log::info!(
            "dwf: Opened device {} (handle {}{})",
            if config.device == FIRST_DEVICE {
                "first available".to_string()
            } else {
                format!("#{}", config.device)
            },
            hdwf,
            config
                .device_config
                .map(|c| format!(", configuration {}", c))
                .unwrap_or_default()
        );

        Ok(Self { hdwf, lib })
    }

    /// Turn a runtime return value into a core result, logging the vendor
    /// message on failure
    fn check(&self, call: &'static str, ok: c_int) -> CoreResult<()> {
        if ok != 0 {
            log::trace!("dwf: {} ok", call);
            return Ok(());
        }
        let err = DwfError::CallFailed {
            call,
            message: self.lib.last_error(),
        };
        log::warn!("dwf: {}", err);
        Err(CoreError::VendorCallFailed)
    }
}

impl Drop for DwfDevice {
    fn drop(&mut self) {
        // SAFETY: the handle came from a successful open and is closed once
        let ok = unsafe { (self.lib.api.device_close)(self.hdwf) };
        if ok == 0 {
            log::warn!("dwf: Failed to close device: {}", self.lib.last_error());
        } else {
            log::debug!("dwf: Closed device (handle {})", self.hdwf);
        }
    }
}

impl SpiBackend for DwfDevice {
    fn name(&self) -> &'static str {
        "dwf"
    }

    fn set_auto_configure(&mut self, enable: bool) -> CoreResult<()> {
        // SAFETY: `hdwf` is an open handle owned by this device
        let ok = unsafe { (self.lib.api.device_auto_configure_set)(self.hdwf, enable as c_int) };
        self.check("FDwfDeviceAutoConfigureSet", ok)
    }

    fn set_frequency(&mut self, hz: f64) -> CoreResult<()> {
        // SAFETY: `hdwf` is an open handle owned by this device
        let ok = unsafe { (self.lib.api.spi_frequency_set)(self.hdwf, hz) };
        self.check("FDwfDigitalSpiFrequencySet", ok)
    }

    fn set_clock_pin(&mut self, pin: u8) -> CoreResult<()> {
        // SAFETY: `hdwf` is an open handle owned by this device
        let ok = unsafe { (self.lib.api.spi_clock_set)(self.hdwf, pin as c_int) };
        self.check("FDwfDigitalSpiClockSet", ok)
    }

    fn set_data_pin(&mut self, dq: u8, pin: u8) -> CoreResult<()> {
        // SAFETY: `hdwf` is an open handle owned by this device
        let ok = unsafe { (self.lib.api.spi_data_set)(self.hdwf, dq as c_int, pin as c_int) };
        self.check("FDwfDigitalSpiDataSet", ok)
    }

    fn set_idle(&mut self, dq: u8, idle: IdleMode) -> CoreResult<()> {
        // SAFETY: `hdwf` is an open handle owned by this device
        let ok = unsafe { (self.lib.api.spi_idle_set)(self.hdwf, dq as c_int, idle.raw()) };
        self.check("FDwfDigitalSpiIdleSet", ok)
    }

    fn set_mode(&mut self, mode: SpiMode) -> CoreResult<()> {
        // SAFETY: `hdwf` is an open handle owned by this device
        let ok = unsafe { (self.lib.api.spi_mode_set)(self.hdwf, mode.index() as c_int) };
        self.check("FDwfDigitalSpiModeSet", ok)
    }

    fn set_bit_order(&mut self, order: BitOrder) -> CoreResult<()> {
        // SAFETY: `hdwf` is an open handle owned by this device
        let ok = unsafe { (self.lib.api.spi_order_set)(self.hdwf, order.flag() as c_int) };
        self.check("FDwfDigitalSpiOrderSet", ok)
    }

    fn set_trigger(&mut self, trigger: &TriggerConfig) -> CoreResult<()> {
        // SAFETY: `hdwf` is an open handle owned by this device
        let ok = unsafe {
            (self.lib.api.digital_in_trigger_set)(
                self.hdwf,
                trigger.level_low.bits(),
                trigger.level_high.bits(),
                trigger.edge_rise.bits(),
                trigger.edge_fall.bits(),
            )
        };
        self.check("FDwfDigitalInTriggerSet", ok)
    }

    fn set_select_idle(&mut self, pin: u8, idle_high: bool) -> CoreResult<()> {
        // SAFETY: `hdwf` is an open handle owned by this device
        let ok =
            unsafe { (self.lib.api.spi_select_set)(self.hdwf, pin as c_int, idle_high as c_int) };
        self.check("FDwfDigitalSpiSelectSet", ok)
    }

    fn select(&mut self, pin: u8, level_high: bool) -> CoreResult<()> {
        // SAFETY: `hdwf` is an open handle owned by this device
        let ok = unsafe { (self.lib.api.spi_select)(self.hdwf, pin as c_int, level_high as c_int) };
        self.check("FDwfDigitalSpiSelect", ok)
    }

    fn write_one(&mut self, lines: DqMode, bits: u8, value: u32) -> CoreResult<()> {
        // SAFETY: `hdwf` is an open handle owned by this device
        let ok = unsafe {
            (self.lib.api.spi_write_one)(self.hdwf, lines.raw(), bits as c_int, value)
        };
        self.check("FDwfDigitalSpiWriteOne", ok)
    }

    fn read_one(&mut self, lines: DqMode, bits: u8) -> CoreResult<u32> {
        let mut value = 0u32;
        // SAFETY: `value` outlives the call
        let ok = unsafe {
            (self.lib.api.spi_read_one)(self.hdwf, lines.raw(), bits as c_int, &mut value)
        };
        self.check("FDwfDigitalSpiReadOne", ok)?;
        Ok(value)
    }

    fn write_read(
        &mut self,
        lines: DqMode,
        bits: u8,
        tx: &[u8],
        rx: &mut [u8],
    ) -> CoreResult<()> {
        if tx.len() != rx.len() {
            return Err(CoreError::LengthMismatch {
                tx: tx.len(),
                rx: rx.len(),
            });
        }
        let len = c_int::try_from(tx.len()).map_err(|_| {
            log::error!("dwf: Transfer of {} bytes is too large", tx.len());
            CoreError::VendorCallFailed
        })?;

        // SAFETY: both buffers hold `len` bytes and outlive the call
        let ok = unsafe {
            (self.lib.api.spi_write_read)(
                self.hdwf,
                lines.raw(),
                bits as c_int,
                tx.as_ptr(),
                len,
                rx.as_mut_ptr(),
                len,
            )
        };
        self.check("FDwfDigitalSpiWriteRead", ok)
    }
}
