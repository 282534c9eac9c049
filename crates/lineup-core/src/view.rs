// ── Ordered list view ──
//
// Turns the stored order into what the operator sees: optionally without
// admitted attendees, optionally numbered.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{EntryId, LineSettings, QueueEntry};

/// Display toggles that shape the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub hide_entered: bool,
    pub show_sequence_numbers: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            hide_entered: false,
            show_sequence_numbers: true,
        }
    }
}

impl From<LineSettings> for DisplayOptions {
    fn from(settings: LineSettings) -> Self {
        Self {
            hide_entered: settings.hide_entered,
            show_sequence_numbers: settings.show_sequence_numbers,
        }
    }
}

/// An entry as rendered, with its 1-based waiting number when numbering
/// is on. Entered attendees never carry a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleEntry {
    pub entry: Arc<QueueEntry>,
    pub sequence: Option<u32>,
}

impl VisibleEntry {
    pub fn id(&self) -> EntryId {
        self.entry.id
    }
}

/// Filter and number `entries`, which must already be in queue order.
pub fn visible_entries(entries: &[Arc<QueueEntry>], options: DisplayOptions) -> Vec<VisibleEntry> {
    let mut next_number: u32 = 0;
    entries
        .iter()
        .filter(|entry| !options.hide_entered || entry.is_waiting())
        .map(|entry| {
            let sequence = if options.show_sequence_numbers && entry.is_waiting() {
                next_number += 1;
                Some(next_number)
            } else {
                None
            };
            VisibleEntry {
                entry: Arc::clone(entry),
                sequence,
            }
        })
        .collect()
}

/// Ids of the rendered list, the coordinate space for drag gestures.
pub fn rendered_ids(visible: &[VisibleEntry]) -> Vec<EntryId> {
    visible.iter().map(VisibleEntry::id).collect()
}
