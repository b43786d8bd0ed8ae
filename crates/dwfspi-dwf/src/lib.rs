//! dwfspi-dwf - Digilent WaveForms runtime backend
//!
//! This crate drives the digital SPI protocol engine of Digilent devices
//! (Digital Discovery, Analog Discovery) through the vendor's WaveForms
//! runtime. The runtime is loaded at run time with `libloading`; nothing is
//! linked at build time, so the crate builds on machines without the SDK.
//!
//! # Example
//!
//! ```no_run
//! use dwfspi_dwf::{DwfConfig, DwfDevice};
//! use dwfspi_core::session::SpiSession;
//! use dwfspi_core::spi::SpiConfig;
//!
//! // Open the first available device using the platform runtime
//! let mut dev = DwfDevice::open(&DwfConfig::default())?;
//!
//! let config = SpiConfig::default();
//! let mut session = SpiSession::new(&mut dev, &config);
//! session.configure()?;
//! let rx = session.transfer_vec(&[0x40, 0x82, 0x00])?;
//! println!("RX: {:02X?}", rx);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Runtime location
//!
//! | Platform | Default |
//! |----------|---------|
//! | Windows  | `dwf.dll` |
//! | macOS    | `/Library/Frameworks/dwf.framework/dwf` |
//! | Linux    | `libdwf.so` |
//!
//! # Pin numbering
//!
//! SPI pin indices refer to the device's digital I/O bank. On the Digital
//! Discovery index 0 is DIO-24, index 1 is DIO-25 and so on.

pub mod device;
pub mod error;
pub mod library;

// Re-exports
pub use device::{DwfConfig, DwfDevice};
pub use error::{DwfError, Result};
pub use library::{DwfLibrary, Hdwf, DEFAULT_LIBRARY, FIRST_DEVICE};

/// Open a device and return it as a boxed `SpiBackend`
///
/// This is a convenience function for use in the CLI backend dispatch.
pub fn open_dwf(
    config: &DwfConfig,
) -> std::result::Result<Box<dyn dwfspi_core::backend::SpiBackend>, Box<dyn std::error::Error>> {
    let dev = DwfDevice::open(config)?;
    Ok(Box::new(dev))
}
