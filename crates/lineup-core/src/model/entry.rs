// ── Queue entry ──

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::attributes::AttendeeAttributes;
use super::line::LineId;

// ── EntryId ─────────────────────────────────────────────────────────

/// Backend-assigned identifier of a queue entry. Never reused, never
/// changes for the lifetime of the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(i64);

impl EntryId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for EntryId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

// ── EntryStatus ─────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EntryStatus {
    #[default]
    Waiting,
    Entered,
}

impl EntryStatus {
    /// The other status. Operators flip between the two with one key.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Waiting => Self::Entered,
            Self::Entered => Self::Waiting,
        }
    }
}

// ── QueueEntry ──────────────────────────────────────────────────────

/// One attendee waiting in (or admitted from) a line.
///
/// Position is not a field: it is the entry's index in the line's order,
/// which the store keeps separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,
    pub line_id: Option<LineId>,
    pub attendee_name: String,
    pub attendee_phone: String,
    pub attributes: AttendeeAttributes,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl QueueEntry {
    pub fn is_waiting(&self) -> bool {
        self.status == EntryStatus::Waiting
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_parses_and_displays() {
        let id: EntryId = " 42 ".parse().unwrap();
        assert_eq!(id, EntryId::new(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<EntryId>().is_err());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("ENTERED".parse::<EntryStatus>().unwrap(), EntryStatus::Entered);
        assert_eq!("waiting".parse::<EntryStatus>().unwrap(), EntryStatus::Waiting);
        assert_eq!(EntryStatus::Waiting.to_string(), "waiting");
    }

    #[test]
    fn status_toggles() {
        assert_eq!(EntryStatus::Waiting.toggled(), EntryStatus::Entered);
        assert_eq!(EntryStatus::Entered.toggled(), EntryStatus::Waiting);
    }
}
