// ── Line ──

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(i64);

impl LineId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LineId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for LineId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Per-line display settings stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSettings {
    pub show_sequence_numbers: bool,
    pub hide_entered: bool,
    /// Whether attendees may see their own position on the public page.
    pub attendee_visible_position: bool,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            show_sequence_numbers: true,
            hide_entered: false,
            attendee_visible_position: false,
        }
    }
}

/// A waiting line owned by the authenticated business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    /// Public identifier used in the attendee-facing share URL.
    pub uuid: Uuid,
    pub settings: LineSettings,
}

impl Line {
    /// URL attendees open to register and check their position.
    pub fn share_url(&self, base: &str) -> String {
        format!("{}/line/{}", base.trim_end_matches('/'), self.uuid)
    }
}
