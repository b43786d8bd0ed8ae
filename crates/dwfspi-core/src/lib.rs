//! dwfspi-core - Core types for single-shot SPI transactions
//!
//! This crate holds everything about a dwfspi run that does not touch the
//! vendor runtime: the SPI configuration profile, the `SpiBackend` trait
//! that backends implement, the session sequencer that drives a backend
//! through the fixed configuration order, and hex token handling for the
//! command line.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`)
//! - `alloc` - Enable heap allocation for hex parsing and owned transfers
//!
//! # Example
//!
//! ```ignore
//! use dwfspi_core::{session::SpiSession, spi::SpiConfig, backend::SpiBackend};
//!
//! fn echo<B: SpiBackend>(backend: &mut B, tx: &[u8]) -> dwfspi_core::Result<Vec<u8>> {
//!     let config = SpiConfig::default();
//!     let mut session = SpiSession::new(backend, &config);
//!     session.configure()?;
//!     session.transfer_vec(tx)
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod error;
#[cfg(feature = "alloc")]
pub mod hex;
pub mod session;
pub mod spi;

pub use error::{Error, Result, Step};
