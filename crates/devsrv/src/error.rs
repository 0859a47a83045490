//! Error types for the development server.
//!
//! Each subsystem gets its own `thiserror` enum; the top-level [`Error`]
//! unifies them via `#[from]` conversions so `?` works across module
//! boundaries. Lifecycle misuse (double start, double stop) is reported as a
//! dedicated variant rather than folded into I/O errors, since it signals a
//! caller bug and is never retried.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Server lifecycle and listener errors
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// File watching errors
    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    /// Bundler invocation errors
    #[error("Bundle error: {0}")]
    Bundle(#[from] BundleError),

    /// Configuration validation errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Server lifecycle errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// `start()` was called while the server is running
    #[error("Server is already running.")]
    AlreadyRunning,

    /// `stop()` was called while the server is stopped
    #[error("Server is not running.")]
    NotRunning,

    /// The listening socket could not be bound
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        /// The address that could not be bound
        addr: String,
        /// The underlying socket error
        source: std::io::Error,
    },
}

/// File watcher lifecycle errors.
#[derive(Debug, Error)]
pub enum WatchError {
    /// `start()` was called while the watcher is running
    #[error("Watcher is already running.")]
    AlreadyRunning,

    /// `stop()` was called while the watcher is stopped
    #[error("Watcher is not running.")]
    NotRunning,

    /// The underlying filesystem subscription failed
    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),
}

/// Bundler invocation errors.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The bundler executable could not be launched
    #[error("Failed to launch bundler: {0}")]
    Spawn(#[source] std::io::Error),

    /// The bundler ran but reported a build failure
    #[error("Bundling failed: {message}")]
    Failed {
        /// Diagnostic output captured from the bundler
        message: String,
    },
}

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration field holds an unusable value
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with the invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Guidance for a correct value
        hint: String,
    },

    /// The document root does not exist or is not a directory
    #[error("Document root is not a directory: {}", .0.display())]
    DocumentRootNotFound(PathBuf),
}

/// Result type alias using [`Error`] as the default error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
