//! Error types for dwfspi-core
//!
//! This module provides a no_std compatible error type that is shared by
//! the session sequencer and every backend.

use core::fmt;

/// One step of the session sequence
///
/// Used to report which vendor call failed. The order of the variants is
/// the order in which the session issues them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Enable device auto-configuration
    AutoConfigure,
    /// Set the SPI clock frequency
    Frequency,
    /// Assign the clock pin
    ClockPin,
    /// Assign a data line (DQ) to a pin
    DataPin,
    /// Set the idle-output policy of a data line
    Idle,
    /// Set CPOL/CPHA
    Mode,
    /// Set MSB/LSB first
    BitOrder,
    /// Arm the digital-in trigger
    Trigger,
    /// Assign the chip-select pin and its idle level
    SelectIdle,
    /// Single write that starts driving clock and data
    PrimeWrite,
    /// Drive chip-select
    Select,
    /// Single read issued before the transfer
    PrimeRead,
    /// Full-duplex write/read transfer
    WriteRead,
}

impl Step {
    /// Short human readable name of the step
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AutoConfigure => "auto-configure",
            Self::Frequency => "clock frequency",
            Self::ClockPin => "clock pin",
            Self::DataPin => "data pin",
            Self::Idle => "data idle policy",
            Self::Mode => "SPI mode",
            Self::BitOrder => "bit order",
            Self::Trigger => "trigger",
            Self::SelectIdle => "chip-select idle",
            Self::PrimeWrite => "prime write",
            Self::Select => "chip-select",
            Self::PrimeRead => "prime read",
            Self::WriteRead => "write/read transfer",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Argument errors
    /// SPI mode outside 0-3
    InvalidMode(i64),
    /// Bit order other than 0 (LSB first) or 1 (MSB first)
    InvalidBitOrder(i64),
    /// Clock frequency of zero
    InvalidFrequency,
    /// No data to transfer
    EmptyData,
    /// A hex token could not be parsed
    InvalidHexToken {
        /// Zero-based position of the token in the input
        index: usize,
    },
    /// DIO channel index does not fit a 32-bit channel mask
    InvalidChannel(u8),

    // Transfer errors
    /// Receive buffer length differs from transmit length
    LengthMismatch {
        /// Transmit length
        tx: usize,
        /// Receive length
        rx: usize,
    },

    // Backend errors
    /// A vendor call reported failure
    VendorCallFailed,
    /// A session step failed (strict mode)
    StepFailed(Step),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMode(m) => {
                write!(f, "invalid SPI mode {} (must be one of 0, 1, 2, 3)", m)
            }
            Self::InvalidBitOrder(b) => {
                write!(f, "invalid bit order {} (1 = MSB first, 0 = LSB first)", b)
            }
            Self::InvalidFrequency => write!(f, "SPI frequency must be greater than 0 Hz"),
            Self::EmptyData => write!(f, "no data to transfer"),
            Self::InvalidHexToken { index } => {
                write!(f, "invalid hex byte at position {}", index + 1)
            }
            Self::InvalidChannel(ch) => write!(f, "DIO channel {} out of range (0-31)", ch),
            Self::LengthMismatch { tx, rx } => write!(
                f,
                "receive buffer length {} does not match transmit length {}",
                rx, tx
            ),
            Self::VendorCallFailed => write!(f, "vendor call failed"),
            Self::StepFailed(step) => write!(f, "{} failed", step),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
