//! Error types for the WaveForms backend

use thiserror::Error;

/// WaveForms runtime errors
#[derive(Debug, Error)]
pub enum DwfError {
    /// The runtime library could not be loaded
    #[error("Failed to load {path}: {source}")]
    LoadFailed {
        path: String,
        #[source]
        source: libloading::Error,
    },

    /// The runtime library lacks an entry point
    #[error("Missing symbol {name} in WaveForms runtime: {source}")]
    MissingSymbol {
        name: &'static str,
        #[source]
        source: libloading::Error,
    },

    /// The device could not be opened
    #[error("Failed to open device: {0}")]
    OpenFailed(String),

    /// A runtime call returned FALSE
    #[error("{call} failed: {message}")]
    CallFailed { call: &'static str, message: String },
}

/// Result type for WaveForms operations
pub type Result<T> = std::result::Result<T, DwfError>;
