//! Everything that can happen in the UI. Screens and the data bridge emit
//! actions; the app loop applies them to the session or to its own state.

use std::sync::Arc;

use lineup_core::{EntryId, EntryStatus, LineId, MoveIntent, QueueSnapshot};

use crate::screen::ScreenId;

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ───────────────────────────────────────────────────
    Quit,
    Render,

    // ── Navigation ──────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Data ────────────────────────────────────────────────────────
    /// The session published a new snapshot.
    SnapshotUpdated(Arc<QueueSnapshot>),
    /// Transient status-bar message.
    Notify(String),

    // ── Queue operations ────────────────────────────────────────────
    OpenLine(LineId),
    ReloadLines,
    Refresh,
    MoveEntry(MoveIntent),
    SetStatus { id: EntryId, status: EntryStatus },
    DismissError,

    // ── Display toggles (saved to config) ───────────────────────────
    ToggleHideEntered,
    ToggleSequenceNumbers,
    ToggleReorder,
}
