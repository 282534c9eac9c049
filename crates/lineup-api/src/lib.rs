// lineup-api: Async Rust client for the Smart Line Up queue backend

pub mod client;
pub mod error;
pub mod lines;
pub mod queue;
pub mod transport;
pub mod types;

pub use client::QueueClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    AddAttendeeRequest, CreateLineRequest, LineResponse, QueueEntryResponse, QueueStatus,
    ReorderDirection, ReorderRequest, StatusUpdateRequest, UpdateAttendeeRequest,
};
