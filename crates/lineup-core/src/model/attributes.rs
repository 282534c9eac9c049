// ── Attendee attributes ──
//
// Free-form key/value data attached to an entry (party size, notes...).
// The backend stores it as a JSON-encoded string; anything that does not
// decode to a JSON object is kept verbatim so it can still be shown.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttendeeAttributes {
    /// Decoded object, in the order the backend sent it.
    Parsed(IndexMap<String, String>),
    /// Text that did not decode to a JSON object.
    Raw(String),
}

impl Default for AttendeeAttributes {
    fn default() -> Self {
        Self::Parsed(IndexMap::new())
    }
}

impl AttendeeAttributes {
    /// Decode the backend's string form. Missing or blank input is an
    /// empty map; non-string values inside an object are stringified.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Self::Parsed(
                map.into_iter()
                    .map(|(k, v)| {
                        let v = match v {
                            Value::String(s) => s,
                            other => other.to_string(),
                        };
                        (k, v)
                    })
                    .collect(),
            ),
            _ => Self::Raw(raw.to_owned()),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Parsed(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Parsed(map) => map.is_empty(),
            Self::Raw(raw) => raw.is_empty(),
        }
    }

    /// Encode for the backend. Empty attributes are omitted entirely.
    pub fn to_wire(&self) -> Option<String> {
        match self {
            Self::Parsed(map) if map.is_empty() => None,
            Self::Parsed(map) => serde_json::to_string(map).ok(),
            Self::Raw(raw) => Some(raw.clone()),
        }
    }
}

impl fmt::Display for AttendeeAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed(map) => {
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}={v}")?;
                }
                Ok(())
            }
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}
