//! CLI argument parsing

use clap::Parser;
use dwfspi_core::spi::{BitOrder, PinMap, SpiMode};

/// Parse an SPI mode number (0-3)
fn parse_mode(s: &str) -> Result<SpiMode, String> {
    s.trim()
        .parse::<i64>()
        .ok()
        .and_then(SpiMode::from_index)
        .ok_or_else(|| "Please provide a valid mode (0, 1, 2, 3)".to_string())
}

/// Parse a bit order flag (1 = MSB first, 0 = LSB first)
fn parse_bit_order(s: &str) -> Result<BitOrder, String> {
    let value: i64 = s
        .trim()
        .parse()
        .map_err(|e| format!("Invalid number: {}", e))?;
    BitOrder::try_from(value).map_err(|e| e.to_string())
}

/// Parse a clock frequency in Hz
fn parse_frequency(s: &str) -> Result<u32, String> {
    let hz: u32 = s
        .trim()
        .parse()
        .map_err(|e| format!("Invalid frequency: {}", e))?;
    if hz == 0 {
        return Err("Frequency must be greater than 0 Hz".to_string());
    }
    Ok(hz)
}

const MODE_HELP: &str = "SPI mode (0, 1, 2, 3)

Mode  CPOL  CPHA
 0     0     0
 1     0     1
 2     1     0
 3     1     1";

#[derive(Parser, Debug)]
#[command(name = "dwfspi")]
#[command(
    author,
    version,
    about = "SPI write/read transaction on a Digilent Digital Discovery",
    long_about = "Performs one SPI write/read transaction and prints the bytes read back. \
                  With the slave looping MOSI to MISO the output equals the input data."
)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(
        long,
        default_value = "3",
        value_parser = parse_mode,
        allow_negative_numbers = true,
        help = "SPI mode (0, 1, 2, 3)",
        long_help = MODE_HELP
    )]
    pub mode: SpiMode,

    /// Data to transfer in hex, e.g. "40,82,00,00,00,00"
    #[arg(long)]
    pub data: Option<String>,

    /// Bit order: 1 = MSB first, 0 = LSB first
    #[arg(long = "FirstBit", default_value = "1", value_parser = parse_bit_order)]
    pub first_bit: BitOrder,

    /// SPI clock frequency in Hz
    #[arg(long = "FreqHz", default_value = "8000000", value_parser = parse_frequency)]
    pub freq_hz: u32,

    #[command(flatten)]
    pub pins: PinArgs,

    #[command(flatten)]
    pub device: DeviceArgs,

    /// Skip the single read issued before the transfer
    #[arg(long)]
    pub no_prime_read: bool,

    /// Abort on the first failed device call instead of continuing
    #[arg(long)]
    pub strict: bool,
}

/// Pin assignment (DIO indices, 0 = DIO-24 on the Digital Discovery)
#[derive(clap::Args, Debug, Clone)]
pub struct PinArgs {
    /// Chip-select pin
    #[arg(long, default_value_t = 0)]
    pub cs_pin: u8,

    /// Clock pin
    #[arg(long, default_value_t = 1)]
    pub clk_pin: u8,

    /// MOSI (DQ0) pin
    #[arg(long, default_value_t = 2)]
    pub mosi_pin: u8,

    /// MISO (DQ1) pin
    #[arg(long, default_value_t = 3)]
    pub miso_pin: u8,
}

impl PinArgs {
    /// Pin map for the session configuration
    pub fn pin_map(&self) -> PinMap {
        PinMap {
            cs: self.cs_pin,
            clk: self.clk_pin,
            mosi: self.mosi_pin,
            miso: self.miso_pin,
        }
    }
}

/// Device selection
#[derive(clap::Args, Debug, Clone)]
pub struct DeviceArgs {
    /// Path to the WaveForms runtime (dwf.dll / libdwf.so)
    #[arg(long, env = "DWFSPI_LIBRARY")]
    pub library: Option<String>,

    /// Device index (-1 opens the first available device)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub device: i32,

    /// Device configuration index
    #[arg(long)]
    pub device_config: Option<i32>,

    /// Use the in-memory loopback device instead of hardware
    #[arg(long)]
    pub dummy: bool,
}
