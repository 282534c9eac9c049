// ── Command request types ──

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{AttendeeAttributes, LineId};

/// Add an attendee to the back of a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAttendeeRequest {
    pub line: LineId,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub attributes: AttendeeAttributes,
}

impl AddAttendeeRequest {
    /// Reject blank identity fields before they reach the server.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "attendee name must not be empty".into(),
            });
        }
        if self.phone.trim().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "attendee phone must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// Partial update of an attendee. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditAttendeeRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub attributes: Option<AttendeeAttributes>,
}

impl EditAttendeeRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.attributes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let req = AddAttendeeRequest {
            line: LineId::new(1),
            name: "  ".into(),
            phone: "010-0000-0000".into(),
            attributes: AttendeeAttributes::default(),
        };
        assert!(matches!(
            req.validate(),
            Err(CoreError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn empty_edit_is_detected() {
        assert!(EditAttendeeRequest::default().is_empty());
        let edit = EditAttendeeRequest {
            phone: Some("010-1234-5678".into()),
            ..EditAttendeeRequest::default()
        };
        assert!(!edit.is_empty());
    }
}
