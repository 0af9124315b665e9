use std::path::PathBuf;

use thiserror::Error;
use uom::si::f64::Length;

use crate::support::constraint::ConstraintError;

/// Errors that can occur while loading a [`BoardConfig`](super::BoardConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path:?}")]
    Io {
        /// Path that was being read.
        path: PathBuf,

        #[source]
        source: std::io::Error,
    },

    /// The document is not valid TOML or does not match the expected keys.
    #[error("malformed configuration")]
    Parse(#[from] toml::de::Error),

    /// A value is outside its physical range.
    #[error("invalid {field}: {source}")]
    Invalid {
        /// Configuration key of the offending value.
        field: &'static str,

        #[source]
        source: ConstraintError,
    },

    /// A magnetorquer needs at least a front and a back layer.
    #[error("at least 2 copper layers are required, got {0}")]
    TooFewLayers(usize),

    /// The inner radius bound leaves no room for a spiral.
    #[error("inner radius {inner:?} must be smaller than outer radius {outer:?}")]
    InnerRadiusTooLarge { inner: Length, outer: Length },
}
