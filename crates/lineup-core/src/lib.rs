//! Queue state and reconciliation layer between `lineup-api` and the UI
//! consumers (CLI / TUI).
//!
//! - **[`QueueSession`]** — Facade over one backend connection. Selecting a
//!   line starts a new session token, loads the authoritative order, and
//!   (optionally) spawns a background poll. [`QueueSession::move_entry`] is
//!   the single entry point for reordering: the move is applied to local
//!   state before the backend hears about it, then reconciled.
//!
//! - **[`QueueStore`]** — Reducer-driven state ([`QueueState`]) published as
//!   immutable [`QueueSnapshot`]s over a `tokio::sync::watch` channel.
//!
//! - **[`QueueStream`]** — Subscription handle vended by the store, exposing
//!   `current()` / `latest()` / `changed()` for reactive rendering.
//!
//! - **[`DragController`]** — Headless pointer / keyboard gesture state
//!   machine that turns a drag into a [`MoveIntent`].
//!
//! - **Domain model** ([`model`]) and the pure ordering helpers in
//!   [`order`] and [`view`].

pub mod backend;
pub mod command;
pub mod config;
pub mod convert;
pub mod drag;
pub mod error;
pub mod model;
pub mod order;
pub mod session;
pub mod store;
pub mod stream;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::QueueBackend;
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use config::{ServerConfig, SessionConfig, TlsVerification};
pub use drag::{DragController, DragState, Point};
pub use error::CoreError;
pub use order::{Direction, MoveIntent};
pub use session::QueueSession;
pub use store::{Action, LoadOrigin, Phase, QueueSnapshot, QueueState, QueueStore, SessionToken};
pub use stream::QueueStream;
pub use view::{DisplayOptions, VisibleEntry};

// HTTP backend, for consumers that name the session type.
pub use lineup_api::QueueClient;

pub use model::{AttendeeAttributes, EntryId, EntryStatus, Line, LineId, LineSettings, QueueEntry};
