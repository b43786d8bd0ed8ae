//! Session configuration profile

use bitflags::bitflags;

use super::{BitOrder, DqMode, IdleMode, SpiMode, DEFAULT_FREQUENCY_HZ, WORD_BITS};
use crate::error::{Error, Result};

bitflags! {
    /// Digital-in channel mask
    ///
    /// Bit N selects DIO channel N, as in the vendor's trigger masks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DioMask: u32 {
        /// Channel 0
        const CH0 = 1 << 0;
        /// Channel 1
        const CH1 = 1 << 1;
        /// Channel 2
        const CH2 = 1 << 2;
        /// Channel 3
        const CH3 = 1 << 3;

        const _ = !0;
    }
}

impl DioMask {
    /// Mask selecting a single channel
    pub fn channel(index: u8) -> Result<Self> {
        1u32.checked_shl(index as u32)
            .map(Self::from_bits_retain)
            .ok_or(Error::InvalidChannel(index))
    }
}

/// Digital-in trigger masks
///
/// Each mask selects the channels that fire the trigger on the given
/// condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerConfig {
    /// Trigger while the channel is low
    pub level_low: DioMask,
    /// Trigger while the channel is high
    pub level_high: DioMask,
    /// Trigger on a rising edge
    pub edge_rise: DioMask,
    /// Trigger on a falling edge
    pub edge_fall: DioMask,
}

impl TriggerConfig {
    /// Trigger on the rising edge of a single channel
    pub fn rising_edge(channel: u8) -> Result<Self> {
        Ok(Self {
            level_low: DioMask::empty(),
            level_high: DioMask::empty(),
            edge_rise: DioMask::channel(channel)?,
            edge_fall: DioMask::empty(),
        })
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            level_low: DioMask::empty(),
            level_high: DioMask::empty(),
            edge_rise: DioMask::CH0,
            edge_fall: DioMask::empty(),
        }
    }
}

/// Pin assignment (indices into the device's DIO bank)
///
/// On the Digital Discovery index 0 is DIO-24, so the defaults map to
/// CS=DIO-24, CLK=DIO-25, MOSI=DIO-26, MISO=DIO-27.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    /// Chip select
    pub cs: u8,
    /// Clock
    pub clk: u8,
    /// DQ0 (MOSI / SISO)
    pub mosi: u8,
    /// DQ1 (MISO)
    pub miso: u8,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            cs: 0,
            clk: 1,
            mosi: 2,
            miso: 3,
        }
    }
}

/// Configuration applied by a session before its transfer
#[derive(Debug, Clone, PartialEq)]
pub struct SpiConfig {
    /// SPI clock frequency in Hz (default: 8 MHz)
    pub frequency_hz: u32,
    /// Pin assignment
    pub pins: PinMap,
    /// Idle policy for DQ0 and DQ1
    pub idle: [IdleMode; 2],
    /// Clock polarity/phase (default: mode 3)
    pub mode: SpiMode,
    /// Bit order (default: MSB first)
    pub bit_order: BitOrder,
    /// Digital-in trigger (default: rising edge on channel 0)
    pub trigger: TriggerConfig,
    /// Chip-select idle level (default: high)
    pub cs_idle_high: bool,
    /// Data lines used for transfers
    pub lines: DqMode,
    /// Bits per word
    pub word_bits: u8,
    /// Issue a single read before the write/read transfer
    pub prime_read: bool,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            pins: PinMap::default(),
            idle: [IdleMode::Zet, IdleMode::Zet],
            mode: SpiMode::Mode3,
            bit_order: BitOrder::MsbFirst,
            trigger: TriggerConfig::default(),
            cs_idle_high: true,
            lines: DqMode::MosiMiso,
            word_bits: WORD_BITS,
            prime_read: true,
        }
    }
}

impl SpiConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SPI clock frequency in Hz
    pub fn with_frequency(mut self, hz: u32) -> Result<Self> {
        if hz == 0 {
            return Err(Error::InvalidFrequency);
        }
        self.frequency_hz = hz;
        Ok(self)
    }

    /// Set the SPI mode
    pub fn with_mode(mut self, mode: SpiMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the bit order
    pub fn with_bit_order(mut self, order: BitOrder) -> Self {
        self.bit_order = order;
        self
    }

    /// Set the pin assignment
    pub fn with_pins(mut self, pins: PinMap) -> Self {
        self.pins = pins;
        self
    }

    /// Enable or disable the single read before the transfer
    pub fn with_prime_read(mut self, enable: bool) -> Self {
        self.prime_read = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpiConfig::default();
        assert_eq!(config.frequency_hz, 8_000_000);
        assert_eq!(config.mode, SpiMode::Mode3);
        assert_eq!(config.bit_order, BitOrder::MsbFirst);
        assert_eq!(config.pins, PinMap { cs: 0, clk: 1, mosi: 2, miso: 3 });
        assert_eq!(config.idle, [IdleMode::Zet; 2]);
        assert_eq!(config.lines.raw(), 1);
        assert_eq!(config.word_bits, 8);
        assert!(config.cs_idle_high);
        assert!(config.prime_read);
    }

    #[test]
    fn test_zero_frequency_rejected() {
        assert_eq!(
            SpiConfig::new().with_frequency(0),
            Err(Error::InvalidFrequency)
        );
        let config = SpiConfig::new().with_frequency(1_000_000).unwrap();
        assert_eq!(config.frequency_hz, 1_000_000);
    }

    #[test]
    fn test_channel_mask() {
        assert_eq!(DioMask::channel(0).unwrap(), DioMask::CH0);
        assert_eq!(DioMask::channel(31).unwrap().bits(), 0x8000_0000);
        assert_eq!(DioMask::channel(32), Err(Error::InvalidChannel(32)));
    }

    #[test]
    fn test_default_trigger_is_rising_edge_ch0() {
        let trigger = TriggerConfig::default();
        assert_eq!(trigger, TriggerConfig::rising_edge(0).unwrap());
        assert_eq!(trigger.edge_rise.bits(), 1);
        assert!(trigger.level_low.is_empty());
        assert!(trigger.level_high.is_empty());
        assert!(trigger.edge_fall.is_empty());
    }
}
