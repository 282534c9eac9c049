// Wire types for the queue backend.
//
// Field names follow the backend's camelCase JSON. These structs are
// transport-shaped on purpose; `lineup-core` converts them into domain
// types and never exposes them to UI code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Queue entries ────────────────────────────────────────────────────

/// Attendee status as spelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueStatus {
    Waiting,
    Entered,
}

/// One element of `GET /queue/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntryResponse {
    pub id: i64,
    #[serde(default)]
    pub line_id: Option<i64>,
    pub attendee_name: String,
    pub attendee_phone: String,
    /// Free-form extra fields, JSON-encoded by the backend into a string.
    #[serde(default)]
    pub attendee_attributes: Option<String>,
    pub status: QueueStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Relative placement of a moved entry with respect to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderDirection {
    Up,
    Down,
}

/// Body of `PUT /queue/reorder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub line_id: i64,
    pub moved_queue_id: i64,
    pub target_queue_id: i64,
    pub direction: ReorderDirection,
}

/// Body of `PUT /queue/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: QueueStatus,
}

/// Body of `POST /queue/add`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAttendeeRequest {
    pub line_id: i64,
    pub attendee_name: String,
    pub attendee_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendee_attributes: Option<String>,
}

/// Body of `PUT /queue/{id}/attendee`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendeeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendee_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendee_attributes: Option<String>,
}

// ── Lines ────────────────────────────────────────────────────────────

/// One element of `GET /line/list`, also returned by `GET /line/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResponse {
    pub id: i64,
    pub name: String,
    pub uuid: Uuid,
    #[serde(default = "default_true")]
    pub show_sequence_numbers: bool,
    #[serde(default)]
    pub hide_entered: bool,
    #[serde(default)]
    pub attendee_visible_position: bool,
}

fn default_true() -> bool {
    true
}

/// Body of `POST /line/add`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLineRequest {
    pub name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn reorder_request_uses_backend_field_names() {
        let body = ReorderRequest {
            line_id: 7,
            moved_queue_id: 3,
            target_queue_id: 1,
            direction: ReorderDirection::Up,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "lineId": 7,
                "movedQueueId": 3,
                "targetQueueId": 1,
                "direction": "up"
            })
        );
    }

    #[test]
    fn entry_parses_with_optional_fields_missing() {
        let entry: QueueEntryResponse = serde_json::from_value(json!({
            "id": 12,
            "attendeeName": "Mina",
            "attendeePhone": "010-1234-5678",
            "status": "ENTERED",
            "createdAt": "2026-03-01T09:30:00Z"
        }))
        .unwrap();
        assert_eq!(entry.id, 12);
        assert_eq!(entry.status, QueueStatus::Entered);
        assert!(entry.attendee_attributes.is_none());
        assert!(entry.updated_at.is_none());
    }

    #[test]
    fn line_flags_default_when_absent() {
        let line: LineResponse = serde_json::from_value(json!({
            "id": 1,
            "name": "Brunch",
            "uuid": "6f1c2b1e-4d57-4a8e-9d7c-0a1b2c3d4e5f"
        }))
        .unwrap();
        assert!(line.show_sequence_numbers);
        assert!(!line.hide_entered);
        assert!(!line.attendee_visible_position);
    }

    #[test]
    fn update_attendee_skips_untouched_fields() {
        let body = UpdateAttendeeRequest {
            attendee_phone: Some("010-0000-0000".into()),
            ..UpdateAttendeeRequest::default()
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "attendeePhone": "010-0000-0000" })
        );
    }
}
