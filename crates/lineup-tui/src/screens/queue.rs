//! Queue screen: the selected line's entries, reorderable by dragging a
//! row with the mouse or carrying it with the keyboard.

use std::cell::Cell as StdCell;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use lineup_core::{Direction, DragController, EntryId, Point, QueueSnapshot, VisibleEntry};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// A terminal cell is about twice as tall as it is wide.
const ROW_SCALE: f64 = 2.0;
/// Rows taken by the table header.
const HEADER_ROWS: u16 = 1;

pub struct QueueScreen {
    focused: bool,
    snapshot: Arc<QueueSnapshot>,
    table_state: TableState,
    drag: DragController,
    /// Entry the selection should land on once the next snapshot arrives.
    follow: Option<EntryId>,
    /// Where the table was last drawn, for mapping mouse rows to entries.
    table_area: StdCell<Rect>,
    scroll_offset: StdCell<usize>,
}

impl QueueScreen {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            focused: false,
            snapshot: Arc::new(QueueSnapshot::default()),
            table_state: TableState::default(),
            drag: DragController::new(activation_distance),
            follow: None,
            table_area: StdCell::new(Rect::default()),
            scroll_offset: StdCell::new(0),
        }
    }

    fn rows(&self) -> &[VisibleEntry] {
        &self.snapshot.visible
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected_entry(&self) -> Option<&VisibleEntry> {
        self.rows().get(self.selected_index())
    }

    fn select(&mut self, idx: usize) {
        if self.rows().is_empty() {
            self.table_state.select(None);
        } else {
            let clamped = idx.min(self.rows().len() - 1);
            self.table_state.select(Some(clamped));
        }
    }

    fn select_entry(&mut self, id: EntryId) {
        if let Some(idx) = self.rows().iter().position(|row| row.id() == id) {
            self.select(idx);
        }
    }

    /// Entry drawn at terminal cell (`column`, `row`), if any.
    fn entry_at(&self, column: u16, row: u16) -> Option<EntryId> {
        let area = self.table_area.get();
        if !area.contains(Position::new(column, row)) {
            return None;
        }
        let body_top = area.y.saturating_add(HEADER_ROWS);
        if row < body_top {
            return None;
        }
        let idx = usize::from(row - body_top) + self.scroll_offset.get();
        self.rows().get(idx).map(VisibleEntry::id)
    }

    fn point(column: u16, row: u16) -> Point {
        Point::new(f64::from(column), f64::from(row) * ROW_SCALE)
    }

    // ── Keyboard ─────────────────────────────────────────────────────

    /// Keys while an entry is being carried.
    fn carry_key(&mut self, key: KeyEvent) -> Option<Action> {
        let rendered = self.snapshot.rendered_ids();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.drag.step(Direction::Down, &rendered);
                self.follow_hover();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.drag.step(Direction::Up, &rendered);
                self.follow_hover();
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let intent = self.drag.release(&rendered)?;
                self.follow = Some(intent.moved);
                Some(Action::MoveEntry(intent))
            }
            KeyCode::Esc => {
                if let Some(source) = self.drag.source() {
                    self.select_entry(source);
                }
                self.drag.cancel();
                None
            }
            _ => None,
        }
    }

    fn follow_hover(&mut self) {
        if let Some(over) = self.drag.hover() {
            self.select_entry(over);
        }
    }

    fn pick_up(&mut self) -> Option<Action> {
        if !self.drag.is_enabled() {
            return Some(Action::Notify("Reordering is off. Press r to turn it on.".into()));
        }
        let id = self.selected_entry()?.id();
        self.drag.pick_up(id);
        None
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn title(&self) -> String {
        let snap = &self.snapshot;
        let Some(line_id) = snap.line else {
            return " Queue ".into();
        };
        let name = snap
            .selected_line()
            .map_or_else(|| format!("Line {line_id}"), |line| line.name.clone());
        let waiting = snap.entries.iter().filter(|e| e.is_waiting()).count();
        format!(" {name} · {waiting} waiting ")
    }

    fn row_style(&self, row: &VisibleEntry) -> Style {
        let id = row.id();
        if self.drag.source() == Some(id) {
            theme::drag_source()
        } else if self.drag.hover() == Some(id) {
            theme::drop_target()
        } else if row.entry.is_waiting() {
            theme::table_row()
        } else {
            theme::entered_row()
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let now = Utc::now();
        let grip = if self.drag.is_enabled() { "≡" } else { " " };

        let header = Row::new(["", "#", "Name", "Phone", "Status", "Waited", "Attributes"])
            .style(theme::table_header());

        let rows: Vec<Row> = self
            .rows()
            .iter()
            .map(|row| {
                let entry = &row.entry;
                let status = if entry.is_waiting() {
                    Span::styled("waiting", theme::synced())
                } else {
                    Span::raw("entered")
                };
                let wait_time = if entry.is_waiting() {
                    waited(entry.created_at, now)
                } else {
                    String::new()
                };
                Row::new([
                    Cell::from(grip),
                    Cell::from(row.sequence.map(|n| n.to_string()).unwrap_or_default()),
                    Cell::from(entry.attendee_name.clone()),
                    Cell::from(Span::styled(
                        entry.attendee_phone.clone(),
                        Style::default().fg(theme::CORAL),
                    )),
                    Cell::from(status),
                    Cell::from(wait_time),
                    Cell::from(entry.attributes.to_string()),
                ])
                .style(self.row_style(row))
            })
            .collect();

        let widths = [
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(14),
            Constraint::Length(15),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Min(12),
        ];

        let highlight = if self.drag.is_dragging() {
            Style::default()
        } else {
            theme::table_selected()
        };
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(highlight)
            .highlight_symbol("▸");

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
        self.table_area.set(area);
        self.scroll_offset.set(state.offset());
    }

    fn hints(&self) -> Line<'static> {
        let pairs: &[(&str, &str)] = if self.drag.is_dragging() {
            &[("j/k ", "choose slot  "), ("Space ", "drop  "), ("Esc ", "cancel")]
        } else if self.drag.is_enabled() {
            &[
                ("Space ", "pick up  "),
                ("e ", "enter/undo  "),
                ("h ", "hide entered  "),
                ("n ", "numbers  "),
                ("r ", "lock order  "),
                ("R ", "refresh"),
            ]
        } else {
            &[
                ("e ", "enter/undo  "),
                ("h ", "hide entered  "),
                ("n ", "numbers  "),
                ("r ", "unlock order  "),
                ("R ", "refresh"),
            ]
        };
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in pairs {
            spans.push(Span::styled(*key, theme::key_hint_key()));
            spans.push(Span::styled(*label, theme::key_hint()));
        }
        Line::from(spans)
    }
}

/// Time spent in line, to the minute.
fn waited(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let Ok(elapsed) = (now - since).to_std() else {
        return "now".into();
    };
    let minutes = elapsed.as_secs() / 60;
    if minutes == 0 {
        return "now".into();
    }
    humantime::format_duration(std::time::Duration::from_secs(minutes * 60)).to_string()
}

impl Component for QueueScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.drag.is_dragging() {
            return Ok(self.carry_key(key));
        }

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.select(self.selected_index().saturating_add(1));
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select(self.selected_index().saturating_sub(1));
                None
            }
            KeyCode::Char('g') => {
                self.select(0);
                None
            }
            KeyCode::Char('G') => {
                self.select(self.rows().len().saturating_sub(1));
                None
            }
            KeyCode::Char(' ') => self.pick_up(),
            KeyCode::Char('e') => self.selected_entry().map(|row| Action::SetStatus {
                id: row.id(),
                status: row.entry.status.toggled(),
            }),
            KeyCode::Char('h') => Some(Action::ToggleHideEntered),
            KeyCode::Char('n') => Some(Action::ToggleSequenceNumbers),
            KeyCode::Char('r') => Some(Action::ToggleReorder),
            KeyCode::Char('R') => Some(Action::Refresh),
            KeyCode::Esc => {
                if self.snapshot.last_error.is_some() {
                    Some(Action::DismissError)
                } else {
                    Some(Action::GoBack)
                }
            }
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let (column, row) = (mouse.column, mouse.row);
        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let under = self.entry_at(column, row);
                if let Some(id) = under {
                    self.select_entry(id);
                }
                self.drag.pointer_down(under, Self::point(column, row));
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let over = self.entry_at(column, row);
                self.drag.pointer_move(over, Self::point(column, row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let over = self.entry_at(column, row);
                let rendered = self.snapshot.rendered_ids();
                let intent = self.drag.pointer_up(over, &rendered);
                intent.map(|intent| {
                    self.follow = Some(intent.moved);
                    Action::MoveEntry(intent)
                })
            }
            MouseEventKind::ScrollDown => {
                self.select(self.selected_index().saturating_add(1));
                None
            }
            MouseEventKind::ScrollUp => {
                self.select(self.selected_index().saturating_sub(1));
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snap) = action {
            if snap.token != self.snapshot.token {
                self.drag.cancel();
                self.table_state.select(None);
            }
            self.drag.set_enabled(snap.reorder_enabled);
            self.snapshot = Arc::clone(snap);

            if let Some(id) = self.follow.take() {
                self.select_entry(id);
            }
            if self.drag.is_dragging() {
                // The carried entry or its target may have left the list.
                let rendered = self.snapshot.rendered_ids();
                let gone = |id: Option<EntryId>| id.is_some_and(|id| !rendered.contains(&id));
                if gone(self.drag.source()) || gone(self.drag.hover()) {
                    self.drag.cancel();
                }
            }
            self.select(self.selected_index());
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(self.title())
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border(self.focused));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        let placeholder = if self.snapshot.line.is_none() {
            Some("Pick a line on the Lines screen (1) and press Enter.")
        } else if !self.snapshot.loaded {
            Some("Loading…")
        } else if self.rows().is_empty() {
            Some("Nobody in line.")
        } else {
            None
        };

        match placeholder {
            Some(text) => {
                self.table_area.set(Rect::default());
                let paragraph = Paragraph::new(format!("\n{text}"))
                    .alignment(Alignment::Center)
                    .style(theme::key_hint());
                frame.render_widget(paragraph, layout[0]);
            }
            None => self.render_table(frame, layout[0]),
        }

        frame.render_widget(Paragraph::new(self.hints()), layout[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use lineup_core::view::visible_entries;
    use lineup_core::{
        AttendeeAttributes, DisplayOptions, EntryStatus, LineId, MoveIntent, QueueEntry,
        SessionToken,
    };

    use super::*;

    fn entry(id: i64, status: EntryStatus) -> Arc<QueueEntry> {
        Arc::new(QueueEntry {
            id: EntryId::new(id),
            line_id: Some(LineId::new(7)),
            attendee_name: format!("guest {id}"),
            attendee_phone: String::new(),
            attributes: AttendeeAttributes::default(),
            status,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    fn snapshot(entries: Vec<Arc<QueueEntry>>, display: DisplayOptions, reorder: bool) -> QueueSnapshot {
        QueueSnapshot {
            token: SessionToken::new(1),
            line: Some(LineId::new(7)),
            visible: visible_entries(&entries, display),
            entries,
            loaded: true,
            display,
            reorder_enabled: reorder,
            ..QueueSnapshot::default()
        }
    }

    fn screen_with(snap: QueueSnapshot) -> QueueScreen {
        let mut screen = QueueScreen::new(5.0);
        screen.update(&Action::SnapshotUpdated(Arc::new(snap))).unwrap();
        screen
    }

    fn three_waiting(reorder: bool) -> QueueScreen {
        screen_with(snapshot(
            vec![
                entry(1, EntryStatus::Waiting),
                entry(2, EntryStatus::Waiting),
                entry(3, EntryStatus::Waiting),
            ],
            DisplayOptions::default(),
            reorder,
        ))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn keyboard_carry_produces_a_move() {
        let mut screen = three_waiting(true);
        assert!(screen.handle_key_event(key(KeyCode::Char(' '))).unwrap().is_none());
        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();

        let action = screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        let Some(Action::MoveEntry(intent)) = action else {
            panic!("expected a move, got {action:?}");
        };
        assert_eq!(
            intent,
            MoveIntent {
                moved: EntryId::new(1),
                target: EntryId::new(3),
                direction: Direction::Down,
            }
        );
        assert!(!screen.drag.is_dragging());
    }

    #[test]
    fn dropping_in_place_is_not_a_move() {
        let mut screen = three_waiting(true);
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(action.is_none());
    }

    #[test]
    fn pick_up_is_refused_while_reordering_is_off() {
        let mut screen = three_waiting(false);
        let action = screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert!(matches!(action, Some(Action::Notify(_))));
        assert!(!screen.drag.is_dragging());
    }

    #[test]
    fn escape_cancels_a_carry_before_leaving() {
        let mut screen = three_waiting(true);
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert!(screen.handle_key_event(key(KeyCode::Esc)).unwrap().is_none());
        assert!(!screen.drag.is_dragging());
        let action = screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(matches!(action, Some(Action::GoBack)));
    }

    #[test]
    fn escape_dismisses_an_error_banner() {
        let mut snap = snapshot(vec![entry(1, EntryStatus::Waiting)], DisplayOptions::default(), true);
        snap.last_error = Some("Could not save the new order.".into());
        let mut screen = screen_with(snap);
        let action = screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(matches!(action, Some(Action::DismissError)));
    }

    #[test]
    fn status_key_toggles_the_selected_entry() {
        let mut screen = screen_with(snapshot(
            vec![entry(1, EntryStatus::Waiting), entry(2, EntryStatus::Entered)],
            DisplayOptions::default(),
            false,
        ));
        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        assert!(matches!(
            action,
            Some(Action::SetStatus { id, status: EntryStatus::Waiting }) if id == EntryId::new(2)
        ));
    }

    #[test]
    fn rows_map_through_header_and_scroll() {
        let screen = three_waiting(true);
        screen.table_area.set(Rect::new(2, 4, 60, 10));
        assert_eq!(screen.entry_at(10, 4), None, "header row");
        assert_eq!(screen.entry_at(10, 5), Some(EntryId::new(1)));
        assert_eq!(screen.entry_at(10, 7), Some(EntryId::new(3)));
        assert_eq!(screen.entry_at(10, 8), None, "below the last row");
        assert_eq!(screen.entry_at(70, 5), None, "outside the table");

        screen.scroll_offset.set(1);
        assert_eq!(screen.entry_at(10, 5), Some(EntryId::new(2)));
    }

    #[test]
    fn rows_map_over_the_filtered_list() {
        let display = DisplayOptions {
            hide_entered: true,
            show_sequence_numbers: true,
        };
        let screen = screen_with(snapshot(
            vec![
                entry(1, EntryStatus::Waiting),
                entry(2, EntryStatus::Entered),
                entry(3, EntryStatus::Waiting),
            ],
            display,
            true,
        ));
        screen.table_area.set(Rect::new(0, 0, 60, 10));
        assert_eq!(screen.entry_at(5, 2), Some(EntryId::new(3)));
    }

    #[test]
    fn mouse_drag_past_the_threshold_moves_the_entry() {
        let mut screen = three_waiting(true);
        screen.table_area.set(Rect::new(0, 0, 60, 10));

        screen
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 3))
            .unwrap();
        screen
            .handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 9, 1))
            .unwrap();
        assert!(screen.drag.is_dragging());

        let action = screen
            .handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 9, 1))
            .unwrap();
        let Some(Action::MoveEntry(intent)) = action else {
            panic!("expected a move, got {action:?}");
        };
        assert_eq!(intent.moved, EntryId::new(3));
        assert_eq!(intent.target, EntryId::new(1));
        assert_eq!(intent.direction, Direction::Up);
    }

    #[test]
    fn a_click_without_travel_is_not_a_drag() {
        let mut screen = three_waiting(true);
        screen.table_area.set(Rect::new(0, 0, 60, 10));

        screen
            .handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 5, 2))
            .unwrap();
        screen
            .handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 6, 2))
            .unwrap();
        let action = screen
            .handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), 6, 2))
            .unwrap();
        assert!(action.is_none());
        assert_eq!(screen.selected_index(), 1);
    }

    #[test]
    fn turning_reorder_off_drops_the_carry() {
        let mut screen = three_waiting(true);
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        assert!(screen.drag.is_dragging());

        let snap = snapshot(
            screen.snapshot.entries.clone(),
            DisplayOptions::default(),
            false,
        );
        screen.update(&Action::SnapshotUpdated(Arc::new(snap))).unwrap();
        assert!(!screen.drag.is_dragging());
    }

    #[test]
    fn selection_follows_the_moved_entry() {
        let mut screen = three_waiting(true);
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();

        let reordered = vec![
            entry(2, EntryStatus::Waiting),
            entry(1, EntryStatus::Waiting),
            entry(3, EntryStatus::Waiting),
        ];
        let snap = snapshot(reordered, DisplayOptions::default(), true);
        screen.update(&Action::SnapshotUpdated(Arc::new(snap))).unwrap();
        assert_eq!(screen.selected_entry().map(VisibleEntry::id), Some(EntryId::new(1)));
    }

    #[test]
    fn waited_is_whole_minutes() {
        let at = |h, m| Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap();
        assert_eq!(waited(at(9, 0), at(9, 42)), "42m");
        assert_eq!(waited(at(9, 0), at(9, 0)), "now");
    }
}
