//! devsrv - local development web server.
//!
//! Serves static files from a document root, bundles TypeScript entry points
//! on demand into browser-loadable scripts, pushes live-reload notifications
//! over a server-sent event stream when files change, and hosts an
//! in-browser playground page with a nested, step-based test runner.
//!
//! # Architecture
//!
//! - [`server`] - HTTP server lifecycle, request routing, live-reload channel
//! - [`watcher`] - debounced recursive filesystem watching
//! - [`bundler`] - module bundling behind a trait boundary
//! - [`playground`] - the playground page and its headless test-runner model
//! - [`config`] - server configuration and validation
//! - [`error`] - structured error types with a shared `Result` alias
//!
//! # Example
//!
//! ```no_run
//! use devsrv::{Server, ServerConfig};
//!
//! # async fn run() -> devsrv::Result<()> {
//! let server = Server::new(ServerConfig::default());
//! server.start().await?;
//! # Ok(())
//! # }
//! ```

pub mod bundler;
pub mod config;
pub mod error;
pub mod mime;
pub mod playground;
pub mod server;
pub mod watcher;

// Re-export commonly used types
pub use bundler::{BundleOptions, Bundler, EsbuildBundler};
pub use config::ServerConfig;
pub use error::{BundleError, ConfigError, Error, Result, ServerError, WatchError};
pub use playground::Playground;
pub use server::{LiveReloadState, Server};
pub use watcher::{ChangeEvent, ChangeKind, ChangeWatcher};
