//! Hex byte lists as used on the command line
//!
//! Data is given as comma-separated hex bytes, e.g. `40,82,00,00`, and the
//! received bytes are printed back as `40, 82, 00, 00`.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::error::{Error, Result};

/// Parse a single hex byte token
///
/// Surrounding whitespace and an optional `0x`/`0X` prefix are accepted;
/// the digits must be one or two hex characters.
fn parse_token(token: &str) -> Option<u8> {
    let token = token.trim();
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);

    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    u8::from_str_radix(digits, 16).ok()
}

/// Parse a comma-separated list of hex bytes
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>> {
    if s.trim().is_empty() {
        return Err(Error::EmptyData);
    }

    s.split(',')
        .enumerate()
        .map(|(index, token)| parse_token(token).ok_or(Error::InvalidHexToken { index }))
        .collect()
}

/// Format bytes as uppercase two-digit hex joined by `", "`
pub fn format_hex_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        // Writing to a String cannot fail
        let _ = write!(out, "{:02X}", byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_example_payload() {
        let bytes = parse_hex_bytes("40,82,00,00,00,00").unwrap();
        assert_eq!(bytes, [0x40, 0x82, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_parse_lenient_tokens() {
        assert_eq!(parse_hex_bytes("aa").unwrap(), [0xAA]);
        assert_eq!(parse_hex_bytes(" 0x1f , F ,ff").unwrap(), [0x1F, 0x0F, 0xFF]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_hex_bytes(""), Err(Error::EmptyData));
        assert_eq!(parse_hex_bytes("   "), Err(Error::EmptyData));
        assert_eq!(
            parse_hex_bytes("40,,00"),
            Err(Error::InvalidHexToken { index: 1 })
        );
        assert_eq!(
            parse_hex_bytes("40,100"),
            Err(Error::InvalidHexToken { index: 1 })
        );
        assert_eq!(
            parse_hex_bytes("zz"),
            Err(Error::InvalidHexToken { index: 0 })
        );
        assert_eq!(
            parse_hex_bytes("+1"),
            Err(Error::InvalidHexToken { index: 0 })
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(format_hex_bytes(&[0x40, 0x82, 0x0A]), "40, 82, 0A");
        assert_eq!(format_hex_bytes(&[0xff]), "FF");
        assert_eq!(format_hex_bytes(&[]), "");
    }

    #[test]
    fn test_token_count_preserved() {
        let input = "de,ad,be,ef,00";
        let formatted = format_hex_bytes(&parse_hex_bytes(input).unwrap());
        assert_eq!(formatted.split(", ").count(), input.split(',').count());
        assert_eq!(formatted, "DE, AD, BE, EF, 00");
    }
}
