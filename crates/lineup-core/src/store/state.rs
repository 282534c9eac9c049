// ── Queue state reducer ──
//
// All queue state transitions go through `QueueState::reduce`. The
// reducer is synchronous and side-effect free; the session decides which
// network calls follow from an action.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::model::{EntryId, Line, LineId, QueueEntry};
use crate::order::{MoveIntent, apply_move};
use crate::view::{DisplayOptions, VisibleEntry, visible_entries};

/// Identifies one line-selection session. Responses tagged with an older
/// token are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionToken(u64);

impl SessionToken {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Reconciliation phase of the selected line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Local order equals the last authoritative order.
    #[default]
    Idle,
    /// At least one speculative move awaits the backend.
    SpeculativeApplied,
    /// A move failed; waiting for the authoritative list to replace state.
    Reconciling,
}

/// Why an authoritative list was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadOrigin {
    Selection,
    Poll,
    Manual,
    Recovery,
}

#[derive(Debug, Clone)]
pub enum Action {
    SelectLine {
        line: LineId,
        token: SessionToken,
    },
    LinesLoaded(Vec<Line>),
    ListLoaded {
        token: SessionToken,
        origin: LoadOrigin,
        entries: Vec<QueueEntry>,
    },
    MoveEntry(MoveIntent),
    ReconcileSuccess {
        token: SessionToken,
    },
    ReconcileFailure {
        token: SessionToken,
        message: String,
    },
    RequestFailed {
        token: SessionToken,
        message: String,
    },
    SetDisplay(DisplayOptions),
    SetReorderEnabled(bool),
    DismissError,
}

/// Immutable view of the state, published to subscribers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueueSnapshot {
    pub token: SessionToken,
    pub line: Option<LineId>,
    pub lines: Vec<Arc<Line>>,
    /// Every entry of the selected line, in queue order.
    pub entries: Vec<Arc<QueueEntry>>,
    /// `entries` after filtering and numbering.
    pub visible: Vec<VisibleEntry>,
    pub phase: Phase,
    pub pending: usize,
    pub loaded: bool,
    pub display: DisplayOptions,
    pub reorder_enabled: bool,
    pub last_error: Option<String>,
}

impl QueueSnapshot {
    pub fn selected_line(&self) -> Option<&Arc<Line>> {
        let id = self.line?;
        self.lines.iter().find(|line| line.id == id)
    }

    pub fn order(&self) -> Vec<EntryId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    pub fn rendered_ids(&self) -> Vec<EntryId> {
        crate::view::rendered_ids(&self.visible)
    }

    pub fn entry(&self, id: EntryId) -> Option<&Arc<QueueEntry>> {
        self.entries.iter().find(|entry| entry.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueueState {
    token: SessionToken,
    line: Option<LineId>,
    lines: Vec<Arc<Line>>,
    entries: HashMap<EntryId, Arc<QueueEntry>>,
    order: Vec<EntryId>,
    /// Last order the backend confirmed; the rollback target.
    confirmed: Vec<EntryId>,
    pending: usize,
    phase: Phase,
    loaded: bool,
    display: DisplayOptions,
    reorder_enabled: bool,
    last_error: Option<String>,
}

impl QueueState {
    pub fn new(display: DisplayOptions, reorder_enabled: bool) -> Self {
        Self {
            display,
            reorder_enabled,
            ..Self::default()
        }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn line(&self) -> Option<LineId> {
        self.line
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn order(&self) -> &[EntryId] {
        &self.order
    }

    /// Apply an action. Returns `true` if observable state changed.
    pub fn reduce(&mut self, action: Action) -> bool {
        match action {
            Action::SelectLine { line, token } => {
                self.token = token;
                self.line = Some(line);
                self.entries.clear();
                self.order.clear();
                self.confirmed.clear();
                self.pending = 0;
                self.phase = Phase::Idle;
                self.loaded = false;
                self.last_error = None;
                true
            }
            Action::LinesLoaded(lines) => {
                self.lines = lines.into_iter().map(Arc::new).collect();
                true
            }
            Action::ListLoaded {
                token,
                origin,
                entries,
            } => self.list_loaded(token, origin, entries),
            Action::MoveEntry(intent) => self.move_entry(&intent),
            Action::ReconcileSuccess { token } => {
                if token != self.token || self.pending == 0 {
                    return false;
                }
                self.pending -= 1;
                if self.pending == 0 && self.phase == Phase::SpeculativeApplied {
                    self.confirmed.clone_from(&self.order);
                    self.phase = Phase::Idle;
                }
                true
            }
            Action::ReconcileFailure { token, message } => {
                if token != self.token {
                    debug!(?token, "dropping stale reorder failure");
                    return false;
                }
                self.pending = self.pending.saturating_sub(1);
                self.order.clone_from(&self.confirmed);
                self.phase = Phase::Reconciling;
                self.last_error = Some(message);
                true
            }
            Action::RequestFailed { token, message } => {
                if token != self.token {
                    return false;
                }
                // The recovery load is gone; let in-flight moves settle the phase.
                if self.phase == Phase::Reconciling {
                    self.phase = if self.pending == 0 {
                        Phase::Idle
                    } else {
                        Phase::SpeculativeApplied
                    };
                }
                self.last_error = Some(message);
                true
            }
            Action::SetDisplay(display) => {
                let changed = self.display != display;
                self.display = display;
                changed
            }
            Action::SetReorderEnabled(enabled) => {
                let changed = self.reorder_enabled != enabled;
                self.reorder_enabled = enabled;
                changed
            }
            Action::DismissError => self.last_error.take().is_some(),
        }
    }

    fn list_loaded(
        &mut self,
        token: SessionToken,
        origin: LoadOrigin,
        entries: Vec<QueueEntry>,
    ) -> bool {
        if token != self.token {
            debug!(?token, current = ?self.token, "dropping stale queue list");
            return false;
        }
        if origin == LoadOrigin::Poll && self.pending > 0 {
            debug!(pending = self.pending, "discarding poll result during reorder");
            return false;
        }

        self.order = entries.iter().map(|entry| entry.id).collect();
        self.confirmed.clone_from(&self.order);
        self.entries = entries
            .into_iter()
            .map(|entry| (entry.id, Arc::new(entry)))
            .collect();
        self.loaded = true;
        self.phase = if self.pending == 0 {
            Phase::Idle
        } else {
            Phase::SpeculativeApplied
        };
        true
    }

    fn move_entry(&mut self, intent: &MoveIntent) -> bool {
        if !self.reorder_enabled || self.phase == Phase::Reconciling {
            return false;
        }
        if intent.moved == intent.target {
            return false;
        }
        let Some(next) = apply_move(&self.order, intent) else {
            return false;
        };
        self.order = next;
        self.pending += 1;
        self.phase = Phase::SpeculativeApplied;
        true
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        let entries: Vec<Arc<QueueEntry>> = self
            .order
            .iter()
            .filter_map(|id| self.entries.get(id).cloned())
            .collect();
        let visible = visible_entries(&entries, self.display);

        QueueSnapshot {
            token: self.token,
            line: self.line,
            lines: self.lines.clone(),
            entries,
            visible,
            phase: self.phase,
            pending: self.pending,
            loaded: self.loaded,
            display: self.display,
            reorder_enabled: self.reorder_enabled,
            last_error: self.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::EntryStatus;
    use crate::order::Direction;
    use crate::view::tests::entry;

    const LINE: LineId = LineId::new(7);

    fn ids(raw: &[i64]) -> Vec<EntryId> {
        raw.iter().copied().map(EntryId::new).collect()
    }

    fn waiting(raw: &[i64]) -> Vec<QueueEntry> {
        raw.iter().map(|id| entry(*id, EntryStatus::Waiting)).collect()
    }

    fn loaded(raw: &[i64]) -> QueueState {
        let mut state = QueueState::new(DisplayOptions::default(), true);
        let token = SessionToken::new(1);
        state.reduce(Action::SelectLine {
            line: LINE,
            token,
        });
        state.reduce(Action::ListLoaded {
            token,
            origin: LoadOrigin::Selection,
            entries: waiting(raw),
        });
        state
    }

    fn intent(moved: i64, target: i64, direction: Direction) -> MoveIntent {
        MoveIntent {
            moved: EntryId::new(moved),
            target: EntryId::new(target),
            direction,
        }
    }

    #[test]
    fn move_is_applied_speculatively() {
        let mut state = loaded(&[1, 2, 3]);
        assert!(state.reduce(Action::MoveEntry(intent(3, 1, Direction::Up))));

        let snap = state.snapshot();
        assert_eq!(snap.order(), ids(&[3, 1, 2]));
        assert_eq!(snap.phase, Phase::SpeculativeApplied);
        assert_eq!(snap.pending, 1);
        let numbers: Vec<Option<u32>> = snap.visible.iter().map(|v| v.sequence).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn success_commits_the_speculative_order() {
        let mut state = loaded(&[1, 2, 3]);
        state.reduce(Action::MoveEntry(intent(3, 1, Direction::Up)));
        state.reduce(Action::ReconcileSuccess {
            token: SessionToken::new(1),
        });

        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.order(), ids(&[3, 1, 2]).as_slice());
        assert_eq!(state.confirmed, ids(&[3, 1, 2]));
    }

    #[test]
    fn failure_reverts_then_recovery_replaces() {
        let mut state = loaded(&[1, 2, 3]);
        let token = SessionToken::new(1);
        state.reduce(Action::MoveEntry(intent(3, 1, Direction::Up)));
        state.reduce(Action::ReconcileFailure {
            token,
            message: "try again".into(),
        });

        assert_eq!(state.phase(), Phase::Reconciling);
        assert_eq!(state.order(), ids(&[1, 2, 3]).as_slice());

        state.reduce(Action::ListLoaded {
            token,
            origin: LoadOrigin::Recovery,
            entries: waiting(&[2, 1, 3]),
        });
        let snap = state.snapshot();
        assert_eq!(snap.phase, Phase::Idle);
        assert_eq!(snap.order(), ids(&[2, 1, 3]));
        assert_eq!(snap.last_error.as_deref(), Some("try again"));
    }

    #[test]
    fn overlapping_moves_stay_speculative_until_all_resolve() {
        let mut state = loaded(&[1, 2, 3, 4]);
        let token = SessionToken::new(1);
        state.reduce(Action::MoveEntry(intent(4, 1, Direction::Up)));
        state.reduce(Action::MoveEntry(intent(3, 4, Direction::Up)));
        assert_eq!(state.order(), ids(&[3, 4, 1, 2]).as_slice());

        state.reduce(Action::ReconcileSuccess { token });
        assert_eq!(state.phase(), Phase::SpeculativeApplied);
        state.reduce(Action::ReconcileSuccess { token });
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn failed_recovery_with_move_in_flight_returns_to_idle() {
        let mut state = loaded(&[1, 2, 3]);
        let token = SessionToken::new(1);
        state.reduce(Action::MoveEntry(intent(3, 1, Direction::Up)));
        state.reduce(Action::MoveEntry(intent(2, 3, Direction::Up)));
        state.reduce(Action::ReconcileFailure {
            token,
            message: "conflict".into(),
        });
        state.reduce(Action::RequestFailed {
            token,
            message: "offline".into(),
        });
        assert_eq!(state.phase(), Phase::SpeculativeApplied);

        state.reduce(Action::ReconcileSuccess { token });
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.pending(), 0);
        assert!(state.reduce(Action::MoveEntry(intent(3, 1, Direction::Up))));
    }

    #[test]
    fn no_op_move_changes_nothing() {
        let mut state = loaded(&[1, 2, 3]);
        let before = state.snapshot();
        assert!(!state.reduce(Action::MoveEntry(intent(2, 2, Direction::Down))));
        let after = state.snapshot();
        assert_eq!(before.order(), after.order());
        assert_eq!(after.phase, Phase::Idle);
        assert_eq!(after.pending, 0);
    }

    #[test]
    fn move_is_refused_when_reordering_disabled() {
        let mut state = loaded(&[1, 2, 3]);
        state.reduce(Action::SetReorderEnabled(false));
        assert!(!state.reduce(Action::MoveEntry(intent(3, 1, Direction::Up))));
        assert_eq!(state.order(), ids(&[1, 2, 3]).as_slice());
    }

    #[test]
    fn stale_token_never_mutates_state() {
        let mut state = loaded(&[1, 2, 3]);
        state.reduce(Action::MoveEntry(intent(3, 1, Direction::Up)));
        state.reduce(Action::SelectLine {
            line: LineId::new(8),
            token: SessionToken::new(2),
        });
        state.reduce(Action::ListLoaded {
            token: SessionToken::new(2),
            origin: LoadOrigin::Selection,
            entries: waiting(&[10, 11]),
        });

        let stale = SessionToken::new(1);
        assert!(!state.reduce(Action::ReconcileFailure {
            token: stale,
            message: "late".into(),
        }));
        assert!(!state.reduce(Action::ListLoaded {
            token: stale,
            origin: LoadOrigin::Recovery,
            entries: waiting(&[1, 2, 3]),
        }));
        let snap = state.snapshot();
        assert_eq!(snap.order(), ids(&[10, 11]));
        assert!(snap.last_error.is_none());
    }

    #[test]
    fn poll_result_is_discarded_while_reorder_pending() {
        let mut state = loaded(&[1, 2, 3]);
        let token = SessionToken::new(1);
        state.reduce(Action::MoveEntry(intent(3, 1, Direction::Up)));

        assert!(!state.reduce(Action::ListLoaded {
            token,
            origin: LoadOrigin::Poll,
            entries: waiting(&[1, 2, 3]),
        }));
        assert_eq!(state.order(), ids(&[3, 1, 2]).as_slice());

        state.reduce(Action::ReconcileSuccess { token });
        assert!(state.reduce(Action::ListLoaded {
            token,
            origin: LoadOrigin::Poll,
            entries: waiting(&[3, 1, 2, 4]),
        }));
        assert_eq!(state.order(), ids(&[3, 1, 2, 4]).as_slice());
    }

    #[test]
    fn dismiss_error_clears_banner() {
        let mut state = loaded(&[1]);
        state.reduce(Action::RequestFailed {
            token: SessionToken::new(1),
            message: "offline".into(),
        });
        assert!(state.reduce(Action::DismissError));
        assert!(!state.reduce(Action::DismissError));
        assert!(state.snapshot().last_error.is_none());
    }
}
