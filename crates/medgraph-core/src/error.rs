//! Top-level import errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::loader::LoadError;
use crate::store::StoreError;

/// Errors that end an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Load(#[from] LoadError),

    /// The input file could not be read.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
