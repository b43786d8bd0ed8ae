//! dwfspi - SPI write/read over a Digilent Digital Discovery
//!
//! Configures the SPI protocol engine of a WaveForms device, performs one
//! full-duplex transfer of the bytes given on the command line and prints
//! what came back.
//!
//! # Architecture
//!
//! All device access goes through the `SpiBackend` trait from
//! `dwfspi-core`. The session sequencer in that crate issues the vendor
//! calls in their fixed order; this binary only parses arguments, picks a
//! backend (the WaveForms runtime or the in-memory loopback device) and
//! prints the report.

mod backends;
mod cli;
mod commands;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use log::LevelFilter;
use dwfspi_core::hex::parse_hex_bytes;
use dwfspi_core::spi::SpiConfig;

/// Log level for the number of `-v` flags
fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logger for the given verbosity; `RUST_LOG` still takes precedence
fn logger(verbose: u8) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log_level(verbose))
        .parse_env(env_logger::Env::default());
    builder
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logger(cli.verbose).init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    // Everything that owns the device lives inside run(), so the handle is
    // released before the process exits on every path.
    match run(&cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = out.flush();
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Build the session configuration from the command line
fn spi_config(cli: &Cli) -> Result<SpiConfig, Box<dyn std::error::Error>> {
    let config = SpiConfig::new()
        .with_mode(cli.mode)
        .with_bit_order(cli.first_bit)
        .with_frequency(cli.freq_hz)?
        .with_pins(cli.pins.pin_map())
        .with_prime_read(!cli.no_prime_read);
    Ok(config)
}

fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), Box<dyn std::error::Error>> {
    writeln!(out, "Using MODE, {}!", cli.mode.index())?;
    writeln!(out, "DATA, {}!", cli.data.as_deref().unwrap_or("None"))?;

    let data = cli
        .data
        .as_deref()
        .ok_or("No data given (use --data, e.g. --data \"40,82,00,00,00,00\")")?;
    let tx = parse_hex_bytes(data)?;
    let config = spi_config(cli)?;

    log::debug!(
        "Transfer of {} byte{} at {} Hz, mode {}, {:?}",
        tx.len(),
        if tx.len() == 1 { "" } else { "s" },
        config.frequency_hz,
        config.mode.index(),
        config.bit_order
    );

    writeln!(out, "{}", backends::opening_message(&cli.device))?;
    out.flush()?;

    let mut backend = backends::open_backend(&cli.device)?;
    commands::run_transfer(&mut backend, &config, cli.strict, &tx, out)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dwfspi_core::spi::{BitOrder, PinMap, SpiMode};
    use log::{Level, Log};

    fn run_args(args: &[&str]) -> (Result<(), String>, String) {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        let result = run(&cli, &mut out).map_err(|e| e.to_string());
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(log_level(0), LevelFilter::Info);
        assert_eq!(log_level(1), LevelFilter::Debug);
        assert_eq!(log_level(2), LevelFilter::Trace);
        assert_eq!(log_level(5), LevelFilter::Trace);
    }

    #[test]
    fn test_verbose_logger_enables_debug() {
        let debug = log::Metadata::builder().level(Level::Debug).build();
        let trace = log::Metadata::builder().level(Level::Trace).build();

        let quiet = env_logger::Builder::new().filter_level(log_level(0)).build();
        assert!(!quiet.enabled(&debug));

        let verbose = env_logger::Builder::new().filter_level(log_level(1)).build();
        assert_eq!(verbose.filter(), LevelFilter::Debug);
        assert!(verbose.enabled(&debug));
        assert!(!verbose.enabled(&trace));

        let very_verbose = env_logger::Builder::new().filter_level(log_level(2)).build();
        assert!(very_verbose.enabled(&trace));
    }

    #[test]
    fn test_env_filter_overrides_verbosity() {
        let logger = env_logger::Builder::new()
            .filter_level(log_level(2))
            .parse_filters("warn")
            .build();
        assert_eq!(logger.filter(), LevelFilter::Warn);
    }

    #[test]
    fn test_missing_data_fails_before_open() {
        for args in [&["dwfspi"][..], &["dwfspi", "--dummy"][..]] {
            let (result, out) = run_args(args);
            assert!(result.unwrap_err().contains("--data"));
            assert_eq!(out, "Using MODE, 3!\nDATA, None!\n");
        }
    }

    #[test]
    fn test_bad_hex_fails_before_open() {
        let (result, out) = run_args(&["dwfspi", "--dummy", "--mode", "0", "--data", "40,zz"]);
        assert!(result.is_err());
        assert_eq!(out, "Using MODE, 0!\nDATA, 40,zz!\n");
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_dummy_transfer_report() {
        let (result, out) = run_args(&["dwfspi", "--dummy", "--data", "40,82,00"]);
        result.unwrap();
        assert_eq!(
            out,
            "Using MODE, 3!\n\
             DATA, 40,82,00!\n\
             Opening dummy device\n\
             Configuring SPI...\n\
             TX: [ 64 130   0]\n\
             RX: [ 64 130   0]\n\
             Return (Hex): 40, 82, 00\n"
        );
    }

    #[test]
    fn test_spi_config_from_cli() {
        let cli = Cli::try_parse_from([
            "dwfspi",
            "--mode",
            "1",
            "--FirstBit",
            "0",
            "--FreqHz",
            "250000",
            "--cs-pin",
            "5",
            "--no-prime-read",
        ])
        .unwrap();
        let config = spi_config(&cli).unwrap();
        assert_eq!(config.mode.index(), 1);
        assert_eq!(config.bit_order.flag(), 0);
        assert_eq!(config.frequency_hz, 250_000);
        assert_eq!(config.pins.cs, 5);
        assert!(!config.prime_read);
    }

    #[test]
    fn test_default_spi_config() {
        let cli = Cli::try_parse_from(["dwfspi", "--data", "AA"]).unwrap();
        assert_eq!(spi_config(&cli).unwrap(), SpiConfig::default());
    }


    #[test]
    fn test_defaults_with_data_only() {
        let cli = Cli::try_parse_from(["dwfspi", "--data", "AA"]).unwrap();
        assert_eq!(cli.mode, SpiMode::Mode3);
        assert_eq!(cli.first_bit, BitOrder::MsbFirst);
        assert_eq!(cli.freq_hz, 8_000_000);
        assert_eq!(cli.data.as_deref(), Some("AA"));
        assert_eq!(cli.pins.pin_map(), PinMap::default());
        assert_eq!(cli.device.device, -1);
        assert!(!cli.no_prime_read);
        assert!(!cli.strict);
        assert!(!cli.device.dummy);
    }

    #[test]
    fn test_invalid_modes_rejected() {
        for mode in ["4", "7", "-1", "100", "x"] {
            assert!(
                Cli::try_parse_from(["dwfspi", "--mode", mode, "--data", "00"]).is_err(),
                "mode {} should be rejected",
                mode
            );
        }
    }

    #[test]
    fn test_valid_modes() {
        for (arg, mode) in [
            ("0", SpiMode::Mode0),
            ("1", SpiMode::Mode1),
            ("2", SpiMode::Mode2),
            ("3", SpiMode::Mode3),
        ] {
            let cli = Cli::try_parse_from(["dwfspi", "--mode", arg]).unwrap();
            assert_eq!(cli.mode, mode);
        }
    }

    #[test]
    fn test_mixed_case_flag_names() {
        let cli = Cli::try_parse_from([
            "dwfspi",
            "--mode",
            "0",
            "--data",
            "40,82,00,00,00,00",
            "--FirstBit",
            "0",
            "--FreqHz",
            "1000000",
        ])
        .unwrap();
        assert_eq!(cli.mode, SpiMode::Mode0);
        assert_eq!(cli.first_bit, BitOrder::LsbFirst);
        assert_eq!(cli.freq_hz, 1_000_000);
    }

    #[test]
    fn test_invalid_bit_order_and_frequency() {
        assert!(Cli::try_parse_from(["dwfspi", "--FirstBit", "2"]).is_err());
        assert!(Cli::try_parse_from(["dwfspi", "--FreqHz", "0"]).is_err());
        assert!(Cli::try_parse_from(["dwfspi", "--FreqHz", "fast"]).is_err());
    }

    #[test]
    fn test_device_selection() {
        let cli = Cli::try_parse_from([
            "dwfspi",
            "--device",
            "1",
            "--device-config",
            "3",
            "--library",
            "/opt/libdwf.so",
        ])
        .unwrap();
        assert_eq!(cli.device.device, 1);
        assert_eq!(cli.device.device_config, Some(3));
        assert_eq!(cli.device.library.as_deref(), Some("/opt/libdwf.so"));
    }
}
