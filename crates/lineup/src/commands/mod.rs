//! Command dispatch: bridges CLI args -> session calls -> output formatting.

pub mod config_cmd;
pub mod lines;
pub mod queue;
pub mod util;

use lineup_core::{QueueClient, QueueSession, ServerConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Session over the HTTP backend, as used by every server-bound command.
pub type Session = QueueSession<QueueClient>;

/// Dispatch a server-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session,
    server: &ServerConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Lines(args) => lines::handle(session, server, args, global).await,
        Command::Queue(args) => queue::handle(session, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
