//! SPI types and the session configuration profile
//!
//! This module provides the enumerations that map one-to-one onto the
//! vendor runtime's integer parameters, and `SpiConfig`, the immutable
//! profile that a session applies before its transfer.

mod config;
mod lines;
mod mode;

pub use config::{DioMask, PinMap, SpiConfig, TriggerConfig};
pub use lines::{DqMode, IdleMode};
pub use mode::{BitOrder, SpiMode};

/// Default SPI clock frequency in Hz (8 MHz)
pub const DEFAULT_FREQUENCY_HZ: u32 = 8_000_000;

/// Word width used for every transfer
pub const WORD_BITS: u8 = 8;
