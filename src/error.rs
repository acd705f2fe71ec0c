/// Typed errors for the build pipeline and the hover runtime
///
/// Per-item scan problems are not errors: they are reported as
/// `Diagnostic` values on the scan outcome. The enums here cover only
/// failures that stop an operation outright.
use std::path::PathBuf;

/// Failures while reading content or writing the manifest
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0} item(s) have invalid metadata, manifest not written")]
    InvalidItems(usize),
}

impl ContentError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Failures of a runtime metadata fetch
///
/// None of these are ever cached; the next visit to the cell retries.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("no metadata location for cell {0}")]
    UnknownCell(String),

    #[error("metadata unavailable at {url}: {source}")]
    Unavailable {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed metadata at {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures loading a build configuration file
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error(transparent)]
    Content(#[from] ContentError),
}
