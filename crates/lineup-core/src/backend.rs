// ── Backend seam ──
//
// The session talks to the queue server only through this trait, so it
// can be driven by the HTTP client in production and by an in-memory
// fake in tests.

use std::future::Future;

use lineup_api::QueueClient;

use crate::command::requests::{AddAttendeeRequest, EditAttendeeRequest};
use crate::convert::reorder_body;
use crate::error::CoreError;
use crate::model::{EntryId, EntryStatus, Line, LineId, QueueEntry};
use crate::order::MoveIntent;

pub trait QueueBackend: Send + Sync + 'static {
    fn list_queue(
        &self,
        line: LineId,
    ) -> impl Future<Output = Result<Vec<QueueEntry>, CoreError>> + Send;

    fn reorder(
        &self,
        line: LineId,
        intent: MoveIntent,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn set_status(
        &self,
        entry: EntryId,
        status: EntryStatus,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn add_attendee(
        &self,
        request: AddAttendeeRequest,
    ) -> impl Future<Output = Result<QueueEntry, CoreError>> + Send;

    fn edit_attendee(
        &self,
        entry: EntryId,
        update: EditAttendeeRequest,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn remove_entry(&self, entry: EntryId) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn list_lines(&self) -> impl Future<Output = Result<Vec<Line>, CoreError>> + Send;

    fn get_line(&self, line: LineId) -> impl Future<Output = Result<Line, CoreError>> + Send;

    fn create_line(&self, name: String) -> impl Future<Output = Result<Line, CoreError>> + Send;

    fn delete_line(&self, line: LineId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl QueueBackend for QueueClient {
    async fn list_queue(&self, line: LineId) -> Result<Vec<QueueEntry>, CoreError> {
        let raw = QueueClient::list_queue(self, line.get()).await?;
        Ok(raw.into_iter().map(QueueEntry::from).collect())
    }

    async fn reorder(&self, line: LineId, intent: MoveIntent) -> Result<(), CoreError> {
        Ok(QueueClient::reorder(self, &reorder_body(line, &intent)).await?)
    }

    async fn set_status(&self, entry: EntryId, status: EntryStatus) -> Result<(), CoreError> {
        Ok(QueueClient::set_status(self, entry.get(), status.into()).await?)
    }

    async fn add_attendee(&self, request: AddAttendeeRequest) -> Result<QueueEntry, CoreError> {
        let body = lineup_api::AddAttendeeRequest::from(request);
        Ok(QueueClient::add_attendee(self, &body).await?.into())
    }

    async fn edit_attendee(
        &self,
        entry: EntryId,
        update: EditAttendeeRequest,
    ) -> Result<(), CoreError> {
        let body = lineup_api::UpdateAttendeeRequest::from(update);
        Ok(QueueClient::update_attendee(self, entry.get(), &body).await?)
    }

    async fn remove_entry(&self, entry: EntryId) -> Result<(), CoreError> {
        Ok(QueueClient::remove_entry(self, entry.get()).await?)
    }

    async fn list_lines(&self) -> Result<Vec<Line>, CoreError> {
        let raw = QueueClient::list_lines(self).await?;
        Ok(raw.into_iter().map(Line::from).collect())
    }

    async fn get_line(&self, line: LineId) -> Result<Line, CoreError> {
        Ok(QueueClient::get_line(self, line.get()).await?.into())
    }

    async fn create_line(&self, name: String) -> Result<Line, CoreError> {
        Ok(QueueClient::create_line(self, &name).await?.into())
    }

    async fn delete_line(&self, line: LineId) -> Result<(), CoreError> {
        Ok(QueueClient::delete_line(self, line.get()).await?)
    }
}
