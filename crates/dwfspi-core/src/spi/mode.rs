//! SPI clock mode and bit order

use crate::error::{Error, Result};

/// SPI mode (clock polarity and phase)
///
/// | Mode | CPOL | CPHA |
/// |------|------|------|
/// | 0    | 0    | 0    |
/// | 1    | 0    | 1    |
/// | 2    | 1    | 0    |
/// | 3    | 1    | 1    |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpiMode {
    /// CPOL=0, CPHA=0
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    #[default]
    Mode3,
}

impl SpiMode {
    /// Build a mode from its number, `None` outside 0-3
    pub const fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::Mode0),
            1 => Some(Self::Mode1),
            2 => Some(Self::Mode2),
            3 => Some(Self::Mode3),
            _ => None,
        }
    }

    /// Mode number as passed to the vendor runtime
    pub const fn index(&self) -> u8 {
        match self {
            Self::Mode0 => 0,
            Self::Mode1 => 1,
            Self::Mode2 => 2,
            Self::Mode3 => 3,
        }
    }

    /// Clock idles high
    pub const fn cpol(&self) -> bool {
        matches!(self, Self::Mode2 | Self::Mode3)
    }

    /// Data is sampled on the trailing clock edge
    pub const fn cpha(&self) -> bool {
        matches!(self, Self::Mode1 | Self::Mode3)
    }
}

impl TryFrom<i64> for SpiMode {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::from_index(value).ok_or(Error::InvalidMode(value))
    }
}

/// Bit order on the wire
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BitOrder {
    /// Least significant bit first (vendor value 0)
    LsbFirst,
    /// Most significant bit first (vendor value 1)
    #[default]
    MsbFirst,
}

impl BitOrder {
    /// Value of the vendor's MSB/LSB flag
    pub const fn flag(&self) -> u8 {
        match self {
            Self::LsbFirst => 0,
            Self::MsbFirst => 1,
        }
    }
}

impl TryFrom<i64> for BitOrder {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::LsbFirst),
            1 => Ok(Self::MsbFirst),
            other => Err(Error::InvalidBitOrder(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_index() {
        for i in 0..4 {
            let mode = SpiMode::from_index(i).unwrap();
            assert_eq!(mode.index() as i64, i);
        }
        assert_eq!(SpiMode::from_index(4), None);
        assert_eq!(SpiMode::from_index(-1), None);
        assert_eq!(SpiMode::try_from(7), Err(Error::InvalidMode(7)));
    }

    #[test]
    fn test_mode_polarity_phase() {
        assert!(!SpiMode::Mode0.cpol() && !SpiMode::Mode0.cpha());
        assert!(!SpiMode::Mode1.cpol() && SpiMode::Mode1.cpha());
        assert!(SpiMode::Mode2.cpol() && !SpiMode::Mode2.cpha());
        assert!(SpiMode::Mode3.cpol() && SpiMode::Mode3.cpha());
    }

    #[test]
    fn test_bit_order() {
        assert_eq!(BitOrder::try_from(1), Ok(BitOrder::MsbFirst));
        assert_eq!(BitOrder::try_from(0), Ok(BitOrder::LsbFirst));
        assert_eq!(BitOrder::try_from(2), Err(Error::InvalidBitOrder(2)));
        assert_eq!(BitOrder::default().flag(), 1);
    }
}
