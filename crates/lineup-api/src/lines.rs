// Line endpoints
//
// Lines are owned by the authenticated business account; `/line/list`
// is scoped by the bearer token, not by a path parameter.

use tracing::debug;

use crate::client::QueueClient;
use crate::error::Error;
use crate::types::{CreateLineRequest, LineResponse};

impl QueueClient {
    /// `GET /line/list`
    pub async fn list_lines(&self) -> Result<Vec<LineResponse>, Error> {
        self.get("line/list").await
    }

    /// `GET /line/{id}`
    pub async fn get_line(&self, line_id: i64) -> Result<LineResponse, Error> {
        self.get(&format!("line/{line_id}")).await
    }

    /// `POST /line/add`
    pub async fn create_line(&self, name: &str) -> Result<LineResponse, Error> {
        debug!(name, "creating line");
        self.post(
            "line/add",
            &CreateLineRequest {
                name: name.to_owned(),
            },
        )
        .await
    }

    /// `DELETE /line/{id}`
    pub async fn delete_line(&self, line_id: i64) -> Result<(), Error> {
        debug!(line_id, "deleting line");
        self.delete(&format!("line/{line_id}")).await
    }
}
