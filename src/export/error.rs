use std::path::PathBuf;
use thiserror::Error;

/// A write to the destination failed. Export errors abort the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize JSON to '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write CSV to '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl Error {
    pub fn path(&self) -> &PathBuf {
        match self {
            Error::CreateDir { path, .. }
            | Error::Io { path, .. }
            | Error::Json { path, .. }
            | Error::Csv { path, .. } => path,
        }
    }
}
