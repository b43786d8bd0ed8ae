//! Backend traits and abstractions
//!
//! This module defines the capability interface that isolates every vendor
//! call. The session sequencer only talks to a device through it.

mod traits;

pub use traits::*;
