// ── Reactive queue stream ──
//
// Subscription type for consuming queue snapshots from the store.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::QueueSnapshot;

/// A subscription to the queue state.
///
/// Provides point-in-time snapshot access and change notification via
/// [`changed()`](Self::changed) or by converting into a `Stream`.
pub struct QueueStream {
    current: Arc<QueueSnapshot>,
    receiver: watch::Receiver<Arc<QueueSnapshot>>,
}

impl QueueStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<QueueSnapshot>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time (or at the last `changed()`).
    pub fn current(&self) -> &Arc<QueueSnapshot> {
        &self.current
    }

    /// The latest snapshot.
    pub fn latest(&self) -> Arc<QueueSnapshot> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. Returns `None` once the store is dropped.
    pub async fn changed(&mut self) -> Option<Arc<QueueSnapshot>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    pub fn into_stream(self) -> QueueWatchStream {
        QueueWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`. Yields the current
/// snapshot first, then one item per change.
pub struct QueueWatchStream {
    inner: WatchStream<Arc<QueueSnapshot>>,
}

impl Stream for QueueWatchStream {
    type Item = Arc<QueueSnapshot>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
