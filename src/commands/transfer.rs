//! Transfer command implementation

use std::io::Write;

use dwfspi_core::backend::SpiBackend;
use dwfspi_core::hex::format_hex_bytes;
use dwfspi_core::session::SpiSession;
use dwfspi_core::spi::SpiConfig;

/// Format bytes as a bracketed list of right-aligned decimal values
///
/// Every value is padded to the width of the widest one, e.g.
/// `[ 64 130   0]`.
pub fn format_byte_array(bytes: &[u8]) -> String {
    let width = bytes
        .iter()
        .map(|b| b.to_string().len())
        .max()
        .unwrap_or(0);
    let items: Vec<String> = bytes
        .iter()
        .map(|b| format!("{:>width$}", b, width = width))
        .collect();
    format!("[{}]", items.join(" "))
}

/// Configure the backend, run one transfer and write the report to `out`
///
/// Returns the received bytes.
pub fn run_transfer<B: SpiBackend + ?Sized, W: Write>(
    backend: &mut B,
    config: &SpiConfig,
    strict: bool,
    tx: &[u8],
    out: &mut W,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    writeln!(out, "Configuring SPI...")?;

    let mut session = SpiSession::new(backend, config).strict(strict);
    session.configure()?;
    let rx = session.transfer_vec(tx)?;

    writeln!(out, "TX: {}", format_byte_array(tx))?;
    writeln!(out, "RX: {}", format_byte_array(&rx))?;
    writeln!(out, "Return (Hex): {}", format_hex_bytes(&rx))?;

    Ok(rx)
}
