//! Filesystem change watching with burst coalescing.
//!
//! [`ChangeWatcher`] subscribes to recursive filesystem notifications for a
//! path set and funnels them through a debouncer: every in-set event restarts
//! a quiet window, and only the event that lets the window elapse reaches the
//! callback. A burst of rapid writes therefore produces exactly one callback
//! invocation carrying the last event, not one per write.

use crate::error::WatchError;
use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default quiet window after which a coalesced event is delivered.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Kind of filesystem change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// A file or directory was created
    Create,
    /// File contents or metadata changed
    Modify,
    /// A file or directory was renamed
    Rename,
    /// A file or directory was removed
    Remove,
}

/// A coalesced filesystem change.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    /// Kind of change
    pub kind: ChangeKind,
    /// Paths affected by the change
    pub paths: Vec<PathBuf>,
}

/// Callback invoked once per settled burst of changes.
pub type ChangeCallback = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

struct Running {
    // Dropping the watcher closes the subscription, which in turn closes the
    // channel feeding the debouncer task.
    _watcher: RecommendedWatcher,
    _task: JoinHandle<()>,
}

/// Debouncing filesystem watcher.
///
/// # Example
///
/// ```no_run
/// use devsrv::watcher::ChangeWatcher;
///
/// let mut watcher = ChangeWatcher::new(vec!["./src".into()]);
/// watcher.on_change(|event| {
///     println!("{:?}", event.kind);
/// });
/// watcher.start().unwrap();
/// // ...
/// watcher.stop().unwrap();
/// ```
pub struct ChangeWatcher {
    paths: Vec<PathBuf>,
    debounce: Duration,
    callback: Arc<RwLock<ChangeCallback>>,
    running: Option<Running>,
}

impl ChangeWatcher {
    /// Create a watcher over `paths` with the default debounce window.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self::with_debounce(paths, DEFAULT_DEBOUNCE)
    }

    /// Create a watcher over `paths` with a custom debounce window.
    pub fn with_debounce(paths: Vec<PathBuf>, debounce: Duration) -> Self {
        Self {
            paths,
            debounce,
            callback: Arc::new(RwLock::new(Arc::new(|_| {}))),
            running: None,
        }
    }

    /// Set the callback invoked once per settled burst.
    ///
    /// Replaces any previous callback; takes effect immediately, including
    /// while the watcher is running.
    pub fn on_change<F>(&mut self, callback: F)
    where
        F: Fn(ChangeEvent) + Send + Sync + 'static,
    {
        *self.callback.write() = Arc::new(callback);
    }

    /// Check whether the watcher is running.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Start watching for file changes.
    ///
    /// Must be called from within a tokio runtime; the debouncer runs as a
    /// spawned task.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::AlreadyRunning`] if the watcher is running, or a
    /// subscription error from the underlying notifier.
    pub fn start(&mut self) -> Result<(), WatchError> {
        if self.running.is_some() {
            return Err(WatchError::AlreadyRunning);
        }

        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
            if let Ok(event) = result {
                if let Some(kind) = translate_kind(&event.kind) {
                    let _ = tx.send(ChangeEvent {
                        kind,
                        paths: event.paths,
                    });
                }
            }
        })?;

        for path in &self.paths {
            watcher.watch(path, RecursiveMode::Recursive)?;
        }

        let task = spawn_debouncer(rx, self.debounce, Arc::clone(&self.callback));

        self.running = Some(Running {
            _watcher: watcher,
            _task: task,
        });

        Ok(())
    }

    /// Stop watching for file changes.
    ///
    /// A burst still inside its quiet window at this point delivers its final
    /// event before the debouncer exits.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::NotRunning`] if the watcher is not running.
    pub fn stop(&mut self) -> Result<(), WatchError> {
        if self.running.take().is_none() {
            return Err(WatchError::NotRunning);
        }
        Ok(())
    }
}

/// Map a notifier event kind onto [`ChangeKind`].
///
/// Access events and other out-of-set kinds return `None` and never reach the
/// debouncer.
fn translate_kind(kind: &EventKind) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(_) => Some(ChangeKind::Create),
        EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Rename),
        EventKind::Modify(_) => Some(ChangeKind::Modify),
        EventKind::Remove(_) => Some(ChangeKind::Remove),
        _ => None,
    }
}

/// Spawn the debouncer task: coalesce bursts and deliver the final event of
/// each settled burst to the callback.
fn spawn_debouncer(
    mut rx: mpsc::UnboundedReceiver<ChangeEvent>,
    window: Duration,
    callback: Arc<RwLock<ChangeCallback>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(first) = rx.recv().await {
            let mut last = first;
            loop {
                match tokio::time::timeout(window, rx.recv()).await {
                    // Another event inside the window supersedes the pending one.
                    Ok(Some(event)) => last = event,
                    // Channel closed mid-burst: deliver what we have and exit.
                    Ok(None) => {
                        let callback = Arc::clone(&*callback.read());
                        callback(last);
                        return;
                    }
                    // Quiet window elapsed: the burst has settled.
                    Err(_) => break,
                }
            }
            let callback = Arc::clone(&*callback.read());
            callback(last);
        }
    })
}
