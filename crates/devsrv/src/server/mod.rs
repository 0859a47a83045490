//! HTTP server lifecycle.
//!
//! [`Server`] owns the listening socket, the shutdown signal and the change
//! watcher. It moves Stopped → Running → Stopped; `start()` from Running and
//! `stop()` from Stopped are contract violations and fail immediately.

mod events;
mod handler;

pub use events::LiveReloadState;

use crate::bundler::{Bundler, EsbuildBundler};
use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::watcher::ChangeWatcher;
use axum::Router;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

/// State shared with the request handler.
pub(crate) struct ServerContext {
    pub(crate) config: ServerConfig,
    pub(crate) bundler: Arc<dyn Bundler>,
    pub(crate) live_reload: Arc<LiveReloadState>,
    /// Flips to `true` when shutdown is signalled; open event streams
    /// subscribe so they terminate instead of stalling teardown.
    pub(crate) shutdown: watch::Receiver<bool>,
}

/// Handle to a running server.
///
/// Exists only between `start()` and socket-close completion; the shutdown
/// sender is the cancellation token for the serve loop. A fresh pair is
/// allocated on every `start()`.
struct RunningServerHandle {
    addr: SocketAddr,
    shutdown: Option<watch::Sender<bool>>,
    done: watch::Receiver<bool>,
}

/// Local development web server.
///
/// # Example
///
/// ```no_run
/// use devsrv::{Server, ServerConfig};
///
/// # async fn run() -> devsrv::Result<()> {
/// let server = Server::new(ServerConfig {
///     hostname: "localhost".to_string(),
///     port: 3000,
///     document_root: "./public".into(),
///     ..Default::default()
/// });
///
/// server.start().await?;
/// // ...
/// server.stop()?;
/// server.wait_until_stopped().await;
/// # Ok(())
/// # }
/// ```
pub struct Server {
    config: ServerConfig,
    bundler: Arc<dyn Bundler>,
    running: Arc<Mutex<Option<RunningServerHandle>>>,
}

impl Server {
    /// Create a server with the default esbuild-backed bundler.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_bundler(config, Arc::new(EsbuildBundler::new()))
    }

    /// Create a server with a caller-supplied bundler.
    pub fn with_bundler(config: ServerConfig, bundler: Arc<dyn Bundler>) -> Self {
        Self {
            config,
            bundler,
            running: Arc::new(Mutex::new(None)),
        }
    }

    /// Check whether the server is running.
    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// The bound address, while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().as_ref().map(|handle| handle.addr)
    }

    /// Start the server and return the bound address.
    ///
    /// Binds the listener, wires the request handler, and, when live reload
    /// is enabled, starts a change watcher over the document root whose
    /// settled events feed the `.events` stream.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::AlreadyRunning`] if the server is running, a
    /// configuration error if validation fails, or a bind error.
    pub async fn start(&self) -> Result<SocketAddr> {
        if self.running.lock().is_some() {
            return Err(ServerError::AlreadyRunning.into());
        }

        self.config.validate()?;

        if self.config.tls_cert.is_some() {
            tracing::warn!("TLS material is configured but termination is delegated; serving plain HTTP");
        }

        let live_reload = Arc::new(LiveReloadState::new());

        let mut watcher = None;
        if self.config.live_reload {
            let state = Arc::clone(&live_reload);
            let mut change_watcher = ChangeWatcher::new(vec![self.config.document_root.clone()]);
            change_watcher.on_change(move |event| {
                tracing::debug!("files changed: {:?} {:?}", event.kind, event.paths);
                state.mark_changed();
            });
            change_watcher.start()?;
            live_reload.post_message("Live reload enabled");
            watcher = Some(change_watcher);
        }

        let bind_addr = (self.config.hostname.as_str(), self.config.port);
        let listener = TcpListener::bind(bind_addr).await.map_err(|source| {
            ServerError::Bind {
                addr: format!("{}:{}", self.config.hostname, self.config.port),
                source,
            }
        })?;
        let addr = listener.local_addr().map_err(|source| ServerError::Bind {
            addr: format!("{}:{}", self.config.hostname, self.config.port),
            source,
        })?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (done_tx, done_rx) = watch::channel(false);

        let context = Arc::new(ServerContext {
            config: self.config.clone(),
            bundler: Arc::clone(&self.bundler),
            live_reload,
            shutdown: shutdown_rx.clone(),
        });

        let app = Router::new()
            .fallback(handler::handle_request)
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(context);

        // The handle must be in place before the serve task can possibly
        // complete, so teardown always finds it. Re-check the slot here: a
        // concurrent start() may have won it while this one was binding.
        {
            let mut slot = self.running.lock();
            if slot.is_some() {
                return Err(ServerError::AlreadyRunning.into());
            }
            slot.replace(RunningServerHandle {
                addr,
                shutdown: Some(shutdown_tx),
                done: done_rx,
            });
        }

        let running = Arc::clone(&self.running);
        tokio::spawn(async move {
            let mut shutdown_rx = shutdown_rx;
            let serve_result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    // Completes on the stop signal, or when the handle (and
                    // its sender) is gone.
                    let _ = shutdown_rx.changed().await;
                })
                .await;

            if let Err(error) = serve_result {
                tracing::error!("server task failed: {}", error);
            }

            if let Some(mut change_watcher) = watcher {
                if let Err(error) = change_watcher.stop() {
                    tracing::warn!("failed to stop change watcher: {}", error);
                }
            }

            running.lock().take();
            let _ = done_tx.send(true);
        });

        tracing::info!("listening on {}", addr);
        Ok(addr)
    }

    /// Signal the server to stop and return immediately.
    ///
    /// In-flight requests finish; no new connections are accepted. Teardown
    /// completes asynchronously and is observed with
    /// [`wait_until_stopped`](Self::wait_until_stopped). Repeated calls while
    /// teardown is in flight are no-ops.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::NotRunning`] if the server is not running.
    pub fn stop(&self) -> Result<()> {
        let mut slot = self.running.lock();
        let handle = slot.as_mut().ok_or(ServerError::NotRunning)?;

        if let Some(shutdown) = handle.shutdown.take() {
            let _ = shutdown.send(true);
        }

        Ok(())
    }

    /// Wait until a previously signalled shutdown has fully completed.
    ///
    /// Returns immediately when the server is already stopped.
    pub async fn wait_until_stopped(&self) {
        let done = self
            .running
            .lock()
            .as_ref()
            .map(|handle| handle.done.clone());

        if let Some(mut done) = done {
            while !*done.borrow() {
                if done.changed().await.is_err() {
                    break;
                }
            }
        }
    }
}
