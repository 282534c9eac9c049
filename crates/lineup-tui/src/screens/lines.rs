//! Lines screen: every line the business owns. Enter opens one.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use lineup_core::{Line, LineId};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct LinesScreen {
    focused: bool,
    lines: Vec<Arc<Line>>,
    /// Line currently open on the Queue screen.
    open: Option<LineId>,
    table_state: TableState,
}

impl LinesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            lines: Vec::new(),
            open: None,
            table_state: TableState::default(),
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn selected_line(&self) -> Option<&Arc<Line>> {
        self.lines.get(self.selected_index())
    }

    fn select(&mut self, idx: usize) {
        let clamped = idx.min(self.lines.len().saturating_sub(1));
        self.table_state.select(Some(clamped));
    }

    fn move_down(&mut self) {
        self.select(self.selected_index().saturating_add(1));
    }

    fn move_up(&mut self) {
        self.select(self.selected_index().saturating_sub(1));
    }

    fn open_selected(&self) -> Option<Action> {
        self.selected_line().map(|line| Action::OpenLine(line.id))
    }
}

impl Component for LinesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_down();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_up();
                None
            }
            KeyCode::Char('g') => {
                self.select(0);
                None
            }
            KeyCode::Char('G') => {
                self.select(self.lines.len().saturating_sub(1));
                None
            }
            KeyCode::Enter => self.open_selected(),
            KeyCode::Char('R') => Some(Action::ReloadLines),
            KeyCode::Esc => Some(Action::GoBack),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.move_down(),
            MouseEventKind::ScrollUp => self.move_up(),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SnapshotUpdated(snap) = action {
            self.lines.clone_from(&snap.lines);
            self.open = snap.line;
            if self.table_state.selected().is_none() && !self.lines.is_empty() {
                let start = self
                    .open
                    .and_then(|id| self.lines.iter().position(|line| line.id == id))
                    .unwrap_or(0);
                self.select(start);
            } else {
                self.select(self.selected_index());
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Lines ({}) ", self.lines.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border(self.focused));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        if self.lines.is_empty() {
            let empty = Paragraph::new("\nNo lines yet. Create one with `lineup lines create`.")
                .alignment(Alignment::Center)
                .style(theme::key_hint());
            frame.render_widget(empty, layout[0]);
        } else {
            let header = Row::new(["", "ID", "Name", "Numbers", "Hide entered", "Public position"])
                .style(theme::table_header());

            let rows: Vec<Row> = self
                .lines
                .iter()
                .map(|line| {
                    let marker = if Some(line.id) == self.open { "●" } else { " " };
                    let flag = |on: bool| if on { "yes" } else { "no" };
                    Row::new([
                        Cell::from(Span::styled(marker, Style::default().fg(theme::GREEN))),
                        Cell::from(line.id.to_string()),
                        Cell::from(Span::styled(
                            line.name.clone(),
                            Style::default().fg(theme::CYAN),
                        )),
                        Cell::from(flag(line.settings.show_sequence_numbers)),
                        Cell::from(flag(line.settings.hide_entered)),
                        Cell::from(flag(line.settings.attendee_visible_position)),
                    ])
                    .style(theme::table_row())
                })
                .collect();

            let widths = [
                Constraint::Length(2),
                Constraint::Length(6),
                Constraint::Min(16),
                Constraint::Length(9),
                Constraint::Length(13),
                Constraint::Length(16),
            ];

            let table = Table::new(rows, widths)
                .header(header)
                .row_highlight_style(theme::table_selected())
                .highlight_symbol("▸");

            let mut state = self.table_state.clone();
            frame.render_stateful_widget(table, layout[0], &mut state);
        }

        let hints = TextLine::from(vec![
            Span::styled(" Enter ", theme::key_hint_key()),
            Span::styled("open  ", theme::key_hint()),
            Span::styled("R ", theme::key_hint_key()),
            Span::styled("reload  ", theme::key_hint()),
            Span::styled("j/k ", theme::key_hint_key()),
            Span::styled("move", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
