//! Error types
//!
//! Sanitizing never fails; only loading options from outside can.

use std::path::PathBuf;

/// Errors raised while loading [`crate::CleanOptions`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read options file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid options: {0}")]
    Parse(#[from] toml::de::Error),
}
