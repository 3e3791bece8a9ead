use std::path::PathBuf;

use thiserror::Error;

/// Configuration problems detected while loading or validating a [`crate::LocomotionConfig`].
///
/// These are startup errors. Once a controller has been built, ticking never fails.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read locomotion config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locomotion config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid locomotion config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
