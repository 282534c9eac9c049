// ── Reactive queue store ──
//
// Holds the reducer state behind a mutex and publishes an immutable
// snapshot after every effective action.

mod state;

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::stream::QueueStream;
use crate::view::DisplayOptions;

pub use state::{Action, LoadOrigin, Phase, QueueSnapshot, QueueState, SessionToken};

pub struct QueueStore {
    state: Mutex<QueueState>,
    snapshot: watch::Sender<Arc<QueueSnapshot>>,
}

impl QueueStore {
    pub fn new(display: DisplayOptions, reorder_enabled: bool) -> Self {
        let state = QueueState::new(display, reorder_enabled);
        let (snapshot, _) = watch::channel(Arc::new(state.snapshot()));
        Self {
            state: Mutex::new(state),
            snapshot,
        }
    }

    /// Reduce `action` and publish if anything changed.
    pub fn dispatch(&self, action: Action) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let changed = state.reduce(action);
        if changed {
            self.snapshot.send_replace(Arc::new(state.snapshot()));
        }
        changed
    }

    pub fn snapshot(&self) -> Arc<QueueSnapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> QueueStream {
        QueueStream::new(self.snapshot.subscribe())
    }

    pub fn token(&self) -> SessionToken {
        self.with_state(QueueState::token)
    }

    pub fn pending(&self) -> usize {
        self.with_state(QueueState::pending)
    }

    fn with_state<T>(&self, f: impl FnOnce(&QueueState) -> T) -> T {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineId;

    #[tokio::test]
    async fn dispatch_notifies_subscribers() {
        let store = QueueStore::new(DisplayOptions::default(), true);
        let mut stream = store.subscribe();

        store.dispatch(Action::SelectLine {
            line: LineId::new(3),
            token: SessionToken::new(1),
        });

        let snap = stream.changed().await;
        assert_eq!(snap.and_then(|s| s.line), Some(LineId::new(3)));
    }

    #[test]
    fn ineffective_action_is_not_published() {
        let store = QueueStore::new(DisplayOptions::default(), true);
        let rx = store.snapshot.subscribe();
        assert!(!store.dispatch(Action::DismissError));
        assert!(!rx.has_changed().unwrap_or(true));
    }
}
