// ── Queue session ──
//
// Lifecycle of one operator connection: line selection, background
// polling, optimistic reordering and command routing. Every state change
// goes through the store's reducer.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::QueueBackend;
use crate::command::{Command, CommandResult};
use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::model::{Line, LineId};
use crate::order::MoveIntent;
use crate::store::{Action, LoadOrigin, QueueSnapshot, QueueStore, SessionToken};
use crate::stream::QueueStream;
use crate::view::DisplayOptions;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<SessionInner>`. Background work (polling,
/// reorder reconciliation) runs on spawned Tokio tasks, so methods that
/// spawn must be called from within a runtime.
pub struct QueueSession<B: QueueBackend> {
    inner: Arc<SessionInner<B>>,
}

impl<B: QueueBackend> Clone for QueueSession<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct SessionInner<B> {
    backend: B,
    config: SessionConfig,
    store: QueueStore,
    cancel: CancellationToken,
    /// Cancels the poller of the currently selected line.
    line_cancel: Mutex<Option<CancellationToken>>,
    last_token: AtomicU64,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<B: QueueBackend> QueueSession<B> {
    pub fn new(backend: B, config: SessionConfig) -> Self {
        let store = QueueStore::new(config.display, config.reorder_enabled);
        Self {
            inner: Arc::new(SessionInner {
                backend,
                config,
                store,
                cancel: CancellationToken::new(),
                line_cancel: Mutex::new(None),
                last_token: AtomicU64::new(0),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// One-shot: build a session without polling, run `f`, close.
    pub async fn oneshot<F, Fut, T>(backend: B, config: SessionConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(QueueSession<B>) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.poll_interval = Duration::ZERO;

        let session = Self::new(backend, cfg);
        let result = f(session.clone()).await;
        session.close().await;
        result
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    pub fn store(&self) -> &QueueStore {
        &self.inner.store
    }

    pub fn snapshot(&self) -> Arc<QueueSnapshot> {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> QueueStream {
        self.inner.store.subscribe()
    }

    // ── Lines ────────────────────────────────────────────────────────

    pub async fn load_lines(&self) -> Result<Vec<Line>, CoreError> {
        let lines = self.inner.backend.list_lines().await?;
        debug!(count = lines.len(), "lines loaded");
        self.inner.store.dispatch(Action::LinesLoaded(lines.clone()));
        Ok(lines)
    }

    /// Switch to `line`: start a new session token, load its queue and
    /// restart the poller. Responses still in flight for the previous
    /// line are ignored from here on.
    pub async fn select_line(&self, line: LineId) -> Result<(), CoreError> {
        let token = SessionToken::new(self.inner.last_token.fetch_add(1, Ordering::SeqCst) + 1);
        self.inner.store.dispatch(Action::SelectLine { line, token });
        info!(%line, token = token.get(), "line selected");

        let line_cancel = self.inner.cancel.child_token();
        if let Some(previous) = lock(&self.inner.line_cancel).replace(line_cancel.clone()) {
            previous.cancel();
        }

        let result = self.load_reporting(line, token, LoadOrigin::Selection).await;

        let period = self.inner.config.poll_interval;
        if !period.is_zero() {
            let handle = tokio::spawn(poll_task(self.clone(), line, token, period, line_cancel));
            self.track(handle);
        }
        result
    }

    /// Re-fetch the selected line on demand.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let snap = self.inner.store.snapshot();
        let line = snap.line.ok_or(CoreError::NoLineSelected)?;
        self.load_reporting(line, snap.token, LoadOrigin::Manual)
            .await
    }

    async fn load(
        &self,
        line: LineId,
        token: SessionToken,
        origin: LoadOrigin,
    ) -> Result<(), CoreError> {
        let entries = self.inner.backend.list_queue(line).await?;
        debug!(%line, ?origin, count = entries.len(), "queue list fetched");
        self.inner.store.dispatch(Action::ListLoaded {
            token,
            origin,
            entries,
        });
        Ok(())
    }

    /// Like `load`, but failures also land in the error banner.
    async fn load_reporting(
        &self,
        line: LineId,
        token: SessionToken,
        origin: LoadOrigin,
    ) -> Result<(), CoreError> {
        let result = self.load(line, token, origin).await;
        if let Err(ref e) = result {
            self.inner.store.dispatch(Action::RequestFailed {
                token,
                message: e.user_message().into(),
            });
        }
        result
    }

    // ── Reordering ───────────────────────────────────────────────────

    /// Apply `intent` to local state immediately and reconcile with the
    /// backend in the background.
    ///
    /// Returns `None` when the move was refused (reordering disabled, no
    /// line selected, unknown ids, or a rollback in progress). The handle
    /// resolves to the backend's verdict; dropping it does not cancel the
    /// reconciliation.
    pub fn move_entry(&self, intent: MoveIntent) -> Option<JoinHandle<Result<(), CoreError>>> {
        let snap = self.inner.store.snapshot();
        let line = snap.line?;
        let token = snap.token;

        if !self.inner.store.dispatch(Action::MoveEntry(intent)) {
            debug!(?intent, "move ignored");
            return None;
        }
        debug!(
            moved = %intent.moved,
            target = %intent.target,
            direction = ?intent.direction,
            "move applied locally"
        );

        let session = self.clone();
        let cancel = self.inner.cancel.clone();
        Some(tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => Err(CoreError::SessionClosed),
                result = session.reconcile(line, token, intent) => result,
            }
        }))
    }

    async fn reconcile(
        &self,
        line: LineId,
        token: SessionToken,
        intent: MoveIntent,
    ) -> Result<(), CoreError> {
        match self.inner.backend.reorder(line, intent).await {
            Ok(()) => {
                self.inner.store.dispatch(Action::ReconcileSuccess { token });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, moved = %intent.moved, "reorder failed, restoring server order");
                self.inner.store.dispatch(Action::ReconcileFailure {
                    token,
                    message: e.user_message().into(),
                });
                if let Err(refetch) = self.load(line, token, LoadOrigin::Recovery).await {
                    warn!(error = %refetch, "re-fetch after failed reorder failed");
                    self.inner.store.dispatch(Action::RequestFailed {
                        token,
                        message: refetch.user_message().into(),
                    });
                }
                Err(e)
            }
        }
    }

    // ── Display toggles ──────────────────────────────────────────────

    pub fn set_display(&self, display: DisplayOptions) {
        self.inner.store.dispatch(Action::SetDisplay(display));
    }

    pub fn set_reorder_enabled(&self, enabled: bool) {
        self.inner.store.dispatch(Action::SetReorderEnabled(enabled));
    }

    pub fn dismiss_error(&self) {
        self.inner.store.dispatch(Action::DismissError);
    }

    // ── Command execution ────────────────────────────────────────────

    /// Run a write command. Entry commands re-fetch the selected line
    /// afterwards; line commands re-fetch the line list if one is loaded.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let touches_queue = cmd.touches_queue();
        let backend = &self.inner.backend;

        let result = match cmd {
            Command::AddAttendee(request) => {
                request.validate()?;
                CommandResult::Entry(backend.add_attendee(request).await?)
            }
            Command::EditAttendee { id, update } => {
                if update.is_empty() {
                    return Err(CoreError::ValidationFailed {
                        message: "nothing to update".into(),
                    });
                }
                backend.edit_attendee(id, update).await?;
                CommandResult::Ok
            }
            Command::SetStatus { id, status } => {
                backend.set_status(id, status).await?;
                CommandResult::Ok
            }
            Command::RemoveEntry { id } => {
                backend.remove_entry(id).await?;
                CommandResult::Ok
            }
            Command::CreateLine { name } => {
                let name = name.trim().to_owned();
                if name.is_empty() {
                    return Err(CoreError::ValidationFailed {
                        message: "line name must not be empty".into(),
                    });
                }
                CommandResult::Line(backend.create_line(name).await?)
            }
            Command::DeleteLine { id } => {
                backend.delete_line(id).await?;
                CommandResult::Ok
            }
        };

        let snap = self.inner.store.snapshot();
        if touches_queue {
            if let Some(line) = snap.line {
                if let Err(e) = self.load(line, snap.token, LoadOrigin::Manual).await {
                    warn!(error = %e, "refresh after command failed");
                }
            }
        } else if !snap.lines.is_empty() {
            if let Err(e) = self.load_lines().await {
                warn!(error = %e, "line list refresh failed");
            }
        }

        Ok(result)
    }

    // ── Teardown ─────────────────────────────────────────────────────

    /// Cancel background tasks and wait for them to finish.
    pub async fn close(&self) {
        self.inner.cancel.cancel();
        let handles: Vec<_> = lock(&self.inner.task_handles).drain(..).collect();
        for handle in handles {
            let _ = handle.await;
        }
        debug!("session closed");
    }

    fn track(&self, handle: JoinHandle<()>) {
        let mut handles = lock(&self.inner.task_handles);
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Periodically replace the selected line's list with the server's.
/// Ticks are skipped while a reorder is in flight.
async fn poll_task<B: QueueBackend>(
    session: QueueSession<B>,
    line: LineId,
    token: SessionToken,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if session.inner.store.pending() > 0 {
                    debug!("reorder in flight, skipping poll");
                } else if let Err(e) = session.load(line, token, LoadOrigin::Poll).await {
                    warn!(error = %e, "queue poll failed");
                }
            }
        }
    }
}
