//! Queue command handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use lineup_core::{
    AddAttendeeRequest, AttendeeAttributes, Command, CommandResult, CoreError, DisplayOptions,
    EditAttendeeRequest, EntryId, EntryStatus, LineId, MoveIntent, QueueEntry, QueueSnapshot,
};

use crate::cli::{GlobalOpts, QueueArgs, QueueCommand, StatusArg};
use crate::error::CliError;
use crate::output;

use super::Session;
use super::util;

// ── Serialized shape ────────────────────────────────────────────────

/// An entry as listed: its slot in the full queue, its waiting number if
/// numbering is on, and the entry itself.
#[derive(Serialize)]
struct ListedEntry {
    position: usize,
    sequence: Option<u32>,
    #[serde(flatten)]
    entry: Arc<QueueEntry>,
}

fn listed(snap: &QueueSnapshot) -> Vec<ListedEntry> {
    snap.visible
        .iter()
        .map(|visible| ListedEntry {
            position: snap
                .entries
                .iter()
                .position(|e| e.id == visible.id())
                .map_or(0, |idx| idx + 1),
            sequence: visible.sequence,
            entry: Arc::clone(&visible.entry),
        })
        .collect()
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "#")]
    sequence: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Waiting")]
    waiting: String,
    #[tabled(rename = "Attributes")]
    attributes: String,
}

fn entry_row(listed: &ListedEntry, color: bool, now: DateTime<Utc>) -> EntryRow {
    let entry = &listed.entry;
    EntryRow {
        sequence: listed.sequence.map(|n| n.to_string()).unwrap_or_default(),
        id: entry.id.to_string(),
        name: entry.attendee_name.clone(),
        phone: entry.attendee_phone.clone(),
        status: output::paint_status(entry.status, color),
        waiting: if entry.is_waiting() {
            waited(entry.created_at, now)
        } else {
            String::new()
        },
        attributes: entry.attributes.to_string(),
    }
}

/// Time spent in line, to the minute.
fn waited(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let Ok(elapsed) = (now - since).to_std() else {
        return "just now".into();
    };
    let minutes = elapsed.as_secs() / 60;
    if minutes == 0 {
        return "just now".into();
    }
    humantime::format_duration(std::time::Duration::from_secs(minutes * 60)).to_string()
}

fn entry_detail(entry: &QueueEntry) -> String {
    output::detail_block(&[
        ("ID", entry.id.to_string()),
        (
            "Line",
            entry.line_id.map(|l| l.to_string()).unwrap_or_default(),
        ),
        ("Name", entry.attendee_name.clone()),
        ("Phone", entry.attendee_phone.clone()),
        ("Status", entry.status.to_string()),
        ("Attributes", entry.attributes.to_string()),
        ("Created", entry.created_at.to_rfc3339()),
    ])
}

fn print_queue(snap: &QueueSnapshot, global: &GlobalOpts) {
    let color = output::should_color(global.color);
    let now = Utc::now();
    let rows = listed(snap);
    let out = output::render_list(
        global.output,
        &rows,
        |l| entry_row(l, color, now),
        |l| l.entry.id.to_string(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: QueueArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        QueueCommand::List {
            line,
            hide_entered,
            numbers,
        } => {
            session.set_display(DisplayOptions {
                hide_entered,
                show_sequence_numbers: numbers,
            });
            select(session, line).await?;
            print_queue(&session.snapshot(), global);
            Ok(())
        }

        QueueCommand::Add {
            line,
            name,
            phone,
            attrs,
        } => {
            let request = AddAttendeeRequest {
                line: LineId::new(line),
                name,
                phone,
                attributes: AttendeeAttributes::from_pairs(attrs),
            };
            let result = session
                .execute(Command::AddAttendee(request))
                .await
                .map_err(|e| not_found_as(e, "line", line, "lines list"))?;
            if let CommandResult::Entry(entry) = result {
                util::announce(
                    global,
                    &format!("Added {} to line {line} as entry {}", entry.attendee_name, entry.id),
                );
                let out = output::render_single(global.output, &entry, entry_detail, |e| {
                    e.id.to_string()
                });
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        QueueCommand::Edit {
            entry,
            name,
            phone,
            attrs,
            clear_attrs,
        } => {
            let attributes = if clear_attrs {
                Some(AttendeeAttributes::default())
            } else if attrs.is_empty() {
                None
            } else {
                Some(AttendeeAttributes::from_pairs(attrs))
            };
            let update = EditAttendeeRequest {
                name,
                phone,
                attributes,
            };
            run_entry_command(
                session,
                entry,
                Command::EditAttendee {
                    id: EntryId::new(entry),
                    update,
                },
            )
            .await?;
            util::announce(global, &format!("Updated entry {entry}"));
            Ok(())
        }

        QueueCommand::Status { entry, status } => {
            let status = match status {
                StatusArg::Waiting => EntryStatus::Waiting,
                StatusArg::Entered => EntryStatus::Entered,
            };
            run_entry_command(
                session,
                entry,
                Command::SetStatus {
                    id: EntryId::new(entry),
                    status,
                },
            )
            .await?;
            util::announce(global, &format!("Entry {entry} is now {status}"));
            Ok(())
        }

        QueueCommand::Remove { entry } => {
            let message = format!("Remove entry {entry} from its line?");
            if !util::confirm("queue remove", &message, global)? {
                return Ok(());
            }
            run_entry_command(
                session,
                entry,
                Command::RemoveEntry {
                    id: EntryId::new(entry),
                },
            )
            .await?;
            util::announce(global, &format!("Removed entry {entry}"));
            Ok(())
        }

        QueueCommand::Move {
            line,
            moved,
            target,
        } => {
            if move_entry(session, line, EntryId::new(moved), EntryId::new(target)).await? {
                util::announce(global, &format!("Moved entry {moved} to the slot of entry {target}"));
            } else {
                util::announce(global, &format!("Entry {moved} is already there; nothing to move"));
            }
            print_queue(&session.snapshot(), global);
            Ok(())
        }
    }
}

async fn select(session: &Session, line: i64) -> Result<(), CliError> {
    session
        .select_line(LineId::new(line))
        .await
        .map_err(|e| not_found_as(e, "line", line, "lines list"))
}

/// Load the line, resolve the move against its full order, apply it and
/// wait for the server's verdict. `Ok(false)` when source and target are
/// the same entry.
async fn move_entry(
    session: &Session,
    line: i64,
    moved: EntryId,
    target: EntryId,
) -> Result<bool, CliError> {
    select(session, line).await?;
    let snap = session.snapshot();

    for id in [moved, target] {
        if snap.entry(id).is_none() {
            return Err(CoreError::EntryNotFound {
                identifier: format!("{id} (line {line})"),
            }
            .into());
        }
    }

    let Some(intent) = MoveIntent::resolve(&snap.order(), moved, target) else {
        return Ok(false);
    };

    let handle = session
        .move_entry(intent)
        .ok_or(CoreError::ReorderDisabled)?;
    handle
        .await
        .map_err(|e| CoreError::Internal(format!("reorder task failed: {e}")))??;
    Ok(true)
}

async fn run_entry_command(session: &Session, entry: i64, cmd: Command) -> Result<(), CliError> {
    session
        .execute(cmd)
        .await
        .map(drop)
        .map_err(|e| not_found_as(e, "entry", entry, "queue list <LINE>"))
}

/// Name the missing resource when the server answers a bare 404.
fn not_found_as(err: CoreError, resource_type: &str, id: i64, list_command: &str) -> CliError {
    match err {
        CoreError::NotFound { .. } => CliError::NotFound {
            resource_type: resource_type.into(),
            identifier: id.to_string(),
            list_command: list_command.into(),
        },
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, minute, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn waited_rounds_down_to_minutes() {
        assert_eq!(waited(at(12, 0), at(13, 5)), "1h 5m");
    }

    #[test]
    fn waited_under_a_minute_is_just_now() {
        assert_eq!(waited(at(12, 0), at(12, 0)), "just now");
    }

    #[test]
    fn waited_tolerates_clock_skew() {
        assert_eq!(waited(at(12, 5), at(12, 0)), "just now");
    }
}
