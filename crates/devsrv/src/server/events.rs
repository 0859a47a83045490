//! Live-reload event channel.
//!
//! A single-slot mailbox couples the change watcher (producer) to the
//! `.events` stream (consumer). The stream drains the mailbox on a periodic
//! tick and emits at most one `message` and one `fsChanged` frame per tick;
//! writes between ticks overwrite each other, which is the intended
//! coalescing for reload signals. The tick timer lives inside the stream, so
//! a client disconnect drops the stream and its timer together.

use axum::http::HeaderValue;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tokio_stream::Stream;

/// Interval between mailbox drains on an open event stream.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct Slots {
    pending_message: Option<String>,
    last_change: Option<u64>,
}

/// Shared single-slot mailbox between the watcher callback and the event
/// stream.
///
/// One instance exists per server; multiple servers in one process never
/// share state.
#[derive(Debug, Default)]
pub struct LiveReloadState {
    slots: Mutex<Slots>,
}

impl LiveReloadState {
    /// Create an empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an informational message, replacing any pending one.
    pub fn post_message(&self, message: impl Into<String>) {
        self.slots.lock().pending_message = Some(message.into());
    }

    /// Record that files changed now, replacing any pending timestamp.
    pub fn mark_changed(&self) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        self.slots.lock().last_change = Some(now);
    }

    /// Take the pending message, leaving the slot empty.
    pub fn take_message(&self) -> Option<String> {
        self.slots.lock().pending_message.take()
    }

    /// Take the pending change timestamp, leaving the slot empty.
    pub fn take_change(&self) -> Option<u64> {
        self.slots.lock().last_change.take()
    }
}

/// Frames drained from the mailbox in one tick, as (event name, data) pairs.
fn drain(state: &LiveReloadState) -> Vec<(&'static str, String)> {
    let mut frames = Vec::new();
    if let Some(message) = state.take_message() {
        frames.push(("message", message));
    }
    if let Some(timestamp) = state.take_change() {
        frames.push(("fsChanged", timestamp.to_string()));
    }
    frames
}

/// The frame stream behind an event-stream response.
///
/// Runs until the client disconnects (the stream is dropped) or the server
/// signals shutdown; either way the tick timer goes down with the stream, so
/// an open tab can neither leak an interval nor stall server teardown.
fn event_stream(
    state: Arc<LiveReloadState>,
    tick: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        let mut interval = tokio::time::interval(tick);
        loop {
            let ticked = tokio::select! {
                biased;
                _ = shutdown.changed() => false,
                _ = interval.tick() => true,
            };
            if !ticked {
                break;
            }
            for (name, data) in drain(&state) {
                yield Ok(Event::default().event(name).data(data));
            }
        }
    }
}

/// Build the `.events` response: a keep-alive `text/event-stream` that drains
/// the mailbox every `tick`.
pub(crate) fn sse_response(
    state: Arc<LiveReloadState>,
    tick: Duration,
    shutdown: watch::Receiver<bool>,
) -> Response {
    let sse = Sse::new(event_stream(state, tick, shutdown)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    );

    let mut response = sse.into_response();
    let headers = response.headers_mut();
    headers.insert(
        axum::http::header::CONNECTION,
        HeaderValue::from_static("keep-alive"),
    );
    headers.insert(
        "Cross-Origin-Resource-Policy",
        HeaderValue::from_static("cross-origin"),
    );
    headers.insert(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    );
    headers.insert(
        axum::http::header::PRAGMA,
        HeaderValue::from_static("no-cache"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    #[test]
    fn test_mailbox_starts_empty() {
        let state = LiveReloadState::new();
        assert!(state.take_message().is_none());
        assert!(state.take_change().is_none());
    }

    #[test]
    fn test_newer_message_overwrites_older() {
        let state = LiveReloadState::new();
        state.post_message("first");
        state.post_message("second");

        assert_eq!(state.take_message().as_deref(), Some("second"));
        assert!(state.take_message().is_none());
    }

    #[test]
    fn test_change_slot_is_single() {
        let state = LiveReloadState::new();
        state.mark_changed();
        state.mark_changed();

        assert!(state.take_change().is_some());
        assert!(state.take_change().is_none());
    }

    #[test]
    fn test_drain_order_and_clearing() {
        let state = LiveReloadState::new();
        state.post_message("hello");
        state.mark_changed();

        let frames = drain(&state);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].0, "message");
        assert_eq!(frames[0].1, "hello");
        assert_eq!(frames[1].0, "fsChanged");

        assert!(drain(&state).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_emits_pending_frames_per_tick() {
        let state = Arc::new(LiveReloadState::new());
        state.post_message("connected");

        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let stream = event_stream(Arc::clone(&state), Duration::from_secs(1), shutdown_rx);
        tokio::pin!(stream);

        // The queued message drains on the first tick and empties its slot.
        assert!(stream.next().await.is_some());
        assert!(state.take_message().is_none());

        // A change recorded between ticks surfaces as the next frame.
        state.mark_changed();
        assert!(stream.next().await.is_some());
        assert!(state.take_change().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_ends_on_shutdown_signal() {
        let state = Arc::new(LiveReloadState::new());

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let stream = event_stream(state, Duration::from_secs(1), shutdown_rx);
        tokio::pin!(stream);

        shutdown_tx.send(true).unwrap();
        // Skip frames already due; the stream must terminate, not hang.
        let next = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if stream.next().await.is_none() {
                    break;
                }
            }
        })
        .await;
        assert!(next.is_ok());
    }
}
