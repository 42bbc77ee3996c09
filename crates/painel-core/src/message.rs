// ── Transient status messages ──
//
// One live message per page, cleared automatically after a fixed delay.
// A single timer is owned by the bus and reset on every `show`, so a
// message is always visible for its full delay and a stale timer can
// never clear a newer message.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// How long a message stays up unless replaced or dismissed.
pub const DEFAULT_MESSAGE_DELAY: Duration = Duration::from_millis(3000);

/// Message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A status message as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

/// Holds the page's current message and expires it.
///
/// Cheaply cloneable; clones share the same slot and timer. `show` must
/// be called from within a Tokio runtime.
#[derive(Clone)]
pub struct MessageBus {
    inner: Arc<BusInner>,
}

struct BusInner {
    current: watch::Sender<Option<Message>>,
    delay: Duration,
    /// Bumped on every show/dismiss; a timer only clears its own generation.
    generation: AtomicU64,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_DELAY)
    }
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBus")
            .field("current", &*self.inner.current.borrow())
            .field("delay", &self.inner.delay)
            .finish_non_exhaustive()
    }
}

impl MessageBus {
    pub fn new(delay: Duration) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            inner: Arc::new(BusInner {
                current,
                delay,
                generation: AtomicU64::new(0),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Replace the current message and restart the expiry timer.
    pub fn show(&self, text: impl Into<String>, kind: MessageKind) {
        let message = Message {
            text: text.into(),
            kind,
            created_at: Utc::now(),
        };
        trace!(%kind, text = %message.text, "showing message");

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.current.send_replace(Some(message));

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            if inner.generation.load(Ordering::SeqCst) == generation {
                inner.current.send_replace(None);
            }
        });
        self.replace_timer(Some(handle));
    }

    pub fn show_success(&self, text: impl Into<String>) {
        self.show(text, MessageKind::Success);
    }

    pub fn show_error(&self, text: impl Into<String>) {
        self.show(text, MessageKind::Error);
    }

    pub fn show_warning(&self, text: impl Into<String>) {
        self.show(text, MessageKind::Warning);
    }

    pub fn show_info(&self, text: impl Into<String>) {
        self.show(text, MessageKind::Info);
    }

    /// Clear the message now and cancel its timer.
    pub fn dismiss(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.replace_timer(None);
        self.inner.current.send_replace(None);
    }

    /// The message currently on display, if any.
    pub fn current(&self) -> Option<Message> {
        self.inner.current.borrow().clone()
    }

    /// Subscribe to message changes (set, replaced, expired, dismissed).
    pub fn subscribe(&self) -> watch::Receiver<Option<Message>> {
        self.inner.current.subscribe()
    }

    fn replace_timer(&self, next: Option<JoinHandle<()>>) {
        let mut slot = self
            .inner
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = std::mem::replace(&mut *slot, next) {
            previous.abort();
        }
    }
}
