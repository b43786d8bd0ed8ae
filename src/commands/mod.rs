//! CLI command implementations
//!
//! The `transfer` module runs the configure-then-transfer sequence against
//! any `SpiBackend` and prints the report.

mod transfer;

pub use transfer::run_transfer;
