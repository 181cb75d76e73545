use std::path::PathBuf;

use thiserror::Error;

use crate::support::constraint::ConstraintError;

/// Errors raised while loading or querying a humidifier catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),

    #[error("unknown product `{0}`")]
    UnknownProduct(String),

    #[error("unknown life cycle stage `{0}`")]
    UnknownLifeCycle(String),

    #[error("invalid value for `{key}`")]
    InvalidValue {
        key: String,
        #[source]
        source: ConstraintError,
    },

    /// The channel counts do not give a usable square grid.
    #[error(
        "degenerate mesh: {dry_channels} dry and {wet_channels} wet channels give grid size {size}"
    )]
    DegenerateMesh {
        dry_channels: usize,
        wet_channels: usize,
        size: usize,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: impl Into<String>, source: ConstraintError) -> Self {
        Self::InvalidValue {
            key: key.into(),
            source,
        }
    }
}
