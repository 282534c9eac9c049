// ── Domain model ──
//
// Canonical types consumed by the CLI and TUI. Wire shapes live in
// `lineup-api`; conversion happens in `crate::convert`.

mod attributes;
mod entry;
mod line;

pub use attributes::AttendeeAttributes;
pub use entry::{EntryId, EntryStatus, QueueEntry};
pub use line::{Line, LineId, LineSettings};
