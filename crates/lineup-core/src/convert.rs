// ── API-to-domain type conversions ──
//
// Bridges raw `lineup_api` response types into canonical `crate::model`
// types, and domain requests back into wire bodies.

use lineup_api::{LineResponse, QueueEntryResponse, QueueStatus, ReorderDirection, ReorderRequest};

use crate::command::requests::{AddAttendeeRequest, EditAttendeeRequest};
use crate::model::{AttendeeAttributes, EntryId, EntryStatus, Line, LineId, LineSettings, QueueEntry};
use crate::order::{Direction, MoveIntent};

// ── Status / direction ───────────────────────────────────────────────

impl From<QueueStatus> for EntryStatus {
    fn from(status: QueueStatus) -> Self {
        match status {
            QueueStatus::Waiting => Self::Waiting,
            QueueStatus::Entered => Self::Entered,
        }
    }
}

impl From<EntryStatus> for QueueStatus {
    fn from(status: EntryStatus) -> Self {
        match status {
            EntryStatus::Waiting => Self::Waiting,
            EntryStatus::Entered => Self::Entered,
        }
    }
}

impl From<Direction> for ReorderDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
        }
    }
}

// ── Entities ─────────────────────────────────────────────────────────

impl From<QueueEntryResponse> for QueueEntry {
    fn from(r: QueueEntryResponse) -> Self {
        Self {
            id: EntryId::new(r.id),
            line_id: r.line_id.map(LineId::new),
            attributes: AttendeeAttributes::parse(r.attendee_attributes.as_deref()),
            attendee_name: r.attendee_name,
            attendee_phone: r.attendee_phone,
            status: r.status.into(),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<LineResponse> for Line {
    fn from(r: LineResponse) -> Self {
        Self {
            id: LineId::new(r.id),
            name: r.name,
            uuid: r.uuid,
            settings: LineSettings {
                show_sequence_numbers: r.show_sequence_numbers,
                hide_entered: r.hide_entered,
                attendee_visible_position: r.attendee_visible_position,
            },
        }
    }
}

// ── Requests ─────────────────────────────────────────────────────────

pub(crate) fn reorder_body(line: LineId, intent: &MoveIntent) -> ReorderRequest {
    ReorderRequest {
        line_id: line.get(),
        moved_queue_id: intent.moved.get(),
        target_queue_id: intent.target.get(),
        direction: intent.direction.into(),
    }
}

impl From<AddAttendeeRequest> for lineup_api::AddAttendeeRequest {
    fn from(req: AddAttendeeRequest) -> Self {
        Self {
            line_id: req.line.get(),
            attendee_attributes: req.attributes.to_wire(),
            attendee_name: req.name,
            attendee_phone: req.phone,
        }
    }
}

impl From<EditAttendeeRequest> for lineup_api::UpdateAttendeeRequest {
    fn from(req: EditAttendeeRequest) -> Self {
        Self {
            attendee_name: req.name,
            attendee_phone: req.phone,
            attendee_attributes: req.attributes.map(|a| a.to_wire().unwrap_or_else(|| "{}".into())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn entry_response_converts_with_raw_attributes() {
        let raw: QueueEntryResponse = serde_json::from_value(json!({
            "id": 5,
            "lineId": 7,
            "attendeeName": "Ara",
            "attendeePhone": "010-1111-2222",
            "attendeeAttributes": "not json",
            "status": "WAITING",
            "createdAt": "2026-03-01T09:30:00Z"
        }))
        .unwrap();

        let entry = QueueEntry::from(raw);
        assert_eq!(entry.id, EntryId::new(5));
        assert_eq!(entry.line_id, Some(LineId::new(7)));
        assert_eq!(entry.status, EntryStatus::Waiting);
        assert_eq!(entry.attributes, AttendeeAttributes::Raw("not json".into()));
    }

    #[test]
    fn reorder_body_carries_relative_move_only() {
        let intent = MoveIntent {
            moved: EntryId::new(3),
            target: EntryId::new(1),
            direction: Direction::Up,
        };
        let body = reorder_body(LineId::new(7), &intent);
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
    fn clearing_attributes_sends_empty_object() {
        let req = EditAttendeeRequest {
            attributes: Some(AttendeeAttributes::default()),
            ..EditAttendeeRequest::default()
        };
        let body = lineup_api::UpdateAttendeeRequest::from(req);
        assert_eq!(body.attendee_attributes.as_deref(), Some("{}"));
        assert!(body.attendee_name.is_none());
    }
}
