// ── Command API ──
//
// All write operations other than reordering flow through a unified
// `Command` enum. Reordering has its own optimistic path in the session.

pub mod requests;

use crate::model::{EntryId, EntryStatus, Line, LineId, QueueEntry};

pub use requests::{AddAttendeeRequest, EditAttendeeRequest};

/// Write operations against the queue backend.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Entry operations ─────────────────────────────────────────────
    AddAttendee(AddAttendeeRequest),
    EditAttendee {
        id: EntryId,
        update: EditAttendeeRequest,
    },
    SetStatus {
        id: EntryId,
        status: EntryStatus,
    },
    RemoveEntry {
        id: EntryId,
    },

    // ── Line operations ──────────────────────────────────────────────
    CreateLine {
        name: String,
    },
    DeleteLine {
        id: LineId,
    },
}

impl Command {
    /// Whether the command changes the entries of the selected line.
    pub(crate) fn touches_queue(&self) -> bool {
        matches!(
            self,
            Self::AddAttendee(_)
                | Self::EditAttendee { .. }
                | Self::SetStatus { .. }
                | Self::RemoveEntry { .. }
        )
    }
}

/// Result of a successful [`Command`].
#[derive(Debug, Clone)]
pub enum CommandResult {
    Ok,
    Entry(QueueEntry),
    Line(Line),
}
