use std::path::{Path, PathBuf};

use thiserror::Error;

/// An artifact could not be persisted.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read plotly.js bundle {path}: {source}")]
    Bundle {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize chart for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl WriteError {
    /// File the failed operation was aimed at.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Bundle { path, .. } | Self::Serialize { path, .. } => {
                path
            }
        }
    }
}
