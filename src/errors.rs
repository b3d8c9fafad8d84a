use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in `resub`.
///
/// Configuration-time variants abort the run; per-file variants are reported
/// and counted by the walker without stopping it.
#[derive(Error, Debug)]
pub enum Error {
    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A pattern that failed to compile.
    #[error("invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A glob filter that failed to compile.
    #[error("invalid glob: {0}")]
    Glob(#[from] glob::PatternError),

    /// An error that occurred while parsing a YAML rules file.
    #[error("Rules parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A general configuration-related error.
    #[error("{0}")]
    Config(String),

    /// Required positional arguments are missing.
    #[error("missing required arguments")]
    Usage,

    /// An error that occurred during the processing of a single file.
    #[error("File processing failed for {path}: {source}")]
    Processing {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An error that occurred while building the Rayon thread pool.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// An error related to persisting a temporary file.
    #[error("Tempfile error: {0}")]
    TempFile(#[from] tempfile::PersistError),
}

/// A convenient type alias for `Result<T, resub::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps an error with the path of the file it happened on.
    pub fn processing(path: impl Into<PathBuf>, source: impl Into<Error>) -> Self {
        Error::Processing {
            path: path.into(),
            source: Box::new(source.into()),
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
