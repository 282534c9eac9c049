// Queue endpoints
//
// Everything under `/queue/...`: the ordered list for a line, the
// reorder call the optimistic reconciler depends on, and the entry
// lifecycle (add, status, edit, remove).

use tracing::debug;

use crate::client::QueueClient;
use crate::error::Error;
use crate::types::{
    AddAttendeeRequest, QueueEntryResponse, QueueStatus, ReorderRequest, StatusUpdateRequest,
    UpdateAttendeeRequest,
};

impl QueueClient {
    /// Fetch the authoritative, ordered queue for a line.
    ///
    /// `GET /queue/list?line_id={line_id}`
    pub async fn list_queue(&self, line_id: i64) -> Result<Vec<QueueEntryResponse>, Error> {
        self.get_with_params("queue/list", &[("line_id", line_id.to_string())])
            .await
    }

    /// Ask the backend to move one entry next to another.
    ///
    /// `PUT /queue/reorder` -- the backend applies its own insert-before /
    /// insert-after rule from `direction`; no absolute index is sent.
    pub async fn reorder(&self, body: &ReorderRequest) -> Result<(), Error> {
        debug!(
            line_id = body.line_id,
            moved = body.moved_queue_id,
            target = body.target_queue_id,
            direction = ?body.direction,
            "reordering queue"
        );
        self.put_no_response("queue/reorder", body).await
    }

    /// `PUT /queue/{id}/status`
    pub async fn set_status(&self, entry_id: i64, status: QueueStatus) -> Result<(), Error> {
        debug!(entry_id, ?status, "updating entry status");
        self.put_no_response(
            &format!("queue/{entry_id}/status"),
            &StatusUpdateRequest { status },
        )
        .await
    }

    /// `POST /queue/add`
    pub async fn add_attendee(
        &self,
        body: &AddAttendeeRequest,
    ) -> Result<QueueEntryResponse, Error> {
        debug!(line_id = body.line_id, "adding attendee");
        self.post("queue/add", body).await
    }

    /// `PUT /queue/{id}/attendee`
    pub async fn update_attendee(
        &self,
        entry_id: i64,
        body: &UpdateAttendeeRequest,
    ) -> Result<(), Error> {
        debug!(entry_id, "updating attendee");
        self.put_no_response(&format!("queue/{entry_id}/attendee"), body)
            .await
    }

    /// `DELETE /queue/{id}`
    pub async fn remove_entry(&self, entry_id: i64) -> Result<(), Error> {
        debug!(entry_id, "removing entry");
        self.delete(&format!("queue/{entry_id}")).await
    }
}
