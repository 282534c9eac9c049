//! Line command handlers.

use tabled::Tabled;

use lineup_core::{Command, CommandResult, CoreError, Line, LineId, QueueBackend, ServerConfig};

use crate::cli::{GlobalOpts, LinesArgs, LinesCommand};
use crate::error::CliError;
use crate::output;

use super::Session;
use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Numbers")]
    numbers: String,
    #[tabled(rename = "Hide entered")]
    hide_entered: String,
    #[tabled(rename = "UUID")]
    uuid: String,
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.into()
}

impl From<&Line> for LineRow {
    fn from(line: &Line) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            numbers: yes_no(line.settings.show_sequence_numbers),
            hide_entered: yes_no(line.settings.hide_entered),
            uuid: line.uuid.to_string(),
        }
    }
}

fn detail(line: &Line) -> String {
    output::detail_block(&[
        ("ID", line.id.to_string()),
        ("Name", line.name.clone()),
        ("UUID", line.uuid.to_string()),
        ("Numbers", yes_no(line.settings.show_sequence_numbers)),
        ("Hide entered", yes_no(line.settings.hide_entered)),
        (
            "Position visible",
            yes_no(line.settings.attendee_visible_position),
        ),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    server: &ServerConfig,
    args: LinesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LinesCommand::List => {
            let lines = session.load_lines().await?;
            let out = output::render_list(global.output, &lines, |l| LineRow::from(l), |l| {
                l.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LinesCommand::Get { line } => {
            let line = fetch_line(session, LineId::new(line)).await?;
            let out = output::render_single(global.output, &line, detail, |l| l.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LinesCommand::Create { name } => {
            if let CommandResult::Line(line) = session.execute(Command::CreateLine { name }).await?
            {
                util::announce(global, &format!("Created line {} ({})", line.id, line.name));
                let out = output::render_single(global.output, &line, detail, |l| l.id.to_string());
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        LinesCommand::Delete { line } => {
            let message = format!("Delete line {line} and every entry in it?");
            if !util::confirm("lines delete", &message, global)? {
                return Ok(());
            }
            session
                .execute(Command::DeleteLine {
                    id: LineId::new(line),
                })
                .await
                .map_err(|e| line_error(e, line))?;
            util::announce(global, &format!("Deleted line {line}"));
            Ok(())
        }

        LinesCommand::Share { line, base } => {
            let line = fetch_line(session, LineId::new(line)).await?;
            let base = base.unwrap_or_else(|| server.url.origin().ascii_serialization());
            output::print_output(&line.share_url(&base), global.quiet);
            Ok(())
        }
    }
}

async fn fetch_line(session: &Session, id: LineId) -> Result<Line, CliError> {
    QueueBackend::get_line(session.backend(), id)
        .await
        .map_err(|e| line_error(e, id.get()))
}

/// A bare 404 on a line route means the line itself is missing.
fn line_error(err: CoreError, line: i64) -> CliError {
    match err {
        CoreError::NotFound { .. } => CoreError::LineNotFound {
            identifier: line.to_string(),
        }
        .into(),
        other => other.into(),
    }
}
