//! Error type shared by the parser, the file layer and both entry points.

use std::path::PathBuf;

use thiserror::Error;

use crate::env::EnvMap;

/// Everything that can stop a `load` or `parse` call.
#[derive(Error, Debug)]
pub enum Error {
    /// A bare `export NAME` line names a key the same content never assigned.
    ///
    /// `parsed` holds the assignments resolved before validation failed. It is
    /// diagnostic only.
    #[error("line {line} has an unset variable")]
    UnsetExport { line: String, parsed: EnvMap },

    /// Required keys still absent from the environment after loading.
    #[error("missing required configuration key(s): {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    /// A file was missing while all files were required.
    #[error("environment variables file was not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// A search path does not exist or is not a directory.
    #[error("path does not exist or is not a directory: {}", .0.display())]
    InvalidSearchPath(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The host environment cannot hold this value (it contains a NUL byte).
    #[error("value for {key} cannot be stored in the environment")]
    InvalidValue { key: String },
}

pub type Result<T> = std::result::Result<T, Error>;
