use std::path::PathBuf;

/// Errors that can occur while scanning a codebase and writing its documentation.
///
/// Library crates use this type directly; the binary converts to
/// `miette::Report` at the boundary.
///
/// # Examples
///
/// ```
/// use docgenny_core::DocgenError;
///
/// let err = DocgenError::Parse("unexpected indent".into());
/// assert!(err.to_string().contains("unexpected indent"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DocgenError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Source code parsing failure.
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The scan root is missing or is not a directory.
    #[error("Path '{}' {reason}", .path.display())]
    InvalidRoot {
        /// The path as given by the caller.
        path: PathBuf,
        /// Why the path was rejected.
        reason: &'static str,
    },

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
