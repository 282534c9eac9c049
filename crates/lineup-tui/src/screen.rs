//! Screen identifiers.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Lines, // 1
    Queue, // 2
}

impl ScreenId {
    /// Tab-bar order.
    pub const ALL: [ScreenId; 2] = [Self::Lines, Self::Queue];

    pub fn number(self) -> u8 {
        match self {
            Self::Lines => 1,
            Self::Queue => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|screen| screen.number() == n)
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        match self {
            Self::Lines => Self::Queue,
            Self::Queue => Self::Lines,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Lines => "Lines",
            Self::Queue => "Queue",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
