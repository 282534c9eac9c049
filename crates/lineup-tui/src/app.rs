//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use lineup_config::Config;
use lineup_core::{Command, CoreError, LineId, Phase, QueueClient, QueueSession, QueueSnapshot};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

pub type Session = QueueSession<QueueClient>;

/// Top-level application state and event loop.
pub struct App {
    session: Session,
    /// Loaded configuration; display toggles are written back into it.
    config: Config,
    /// Line to open once the line list has loaded.
    initial_line: Option<LineId>,
    active_screen: ScreenId,
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Latest snapshot, for the status bar and the toggles.
    snapshot: Arc<QueueSnapshot>,
    /// Transient message shown in the status bar.
    notice: Option<String>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(session: Session, config: Config, initial_line: Option<LineId>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(session.config().drag_activation_distance)
                .into_iter()
                .collect();
        let snapshot = session.snapshot();

        Self {
            session,
            config,
            initial_line,
            active_screen: if initial_line.is_some() {
                ScreenId::Queue
            } else {
                ScreenId::Lines
            },
            previous_screen: None,
            screens,
            running: true,
            help_visible: false,
            snapshot,
            notice: None,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop until the operator quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }

        let cancel = CancellationToken::new();
        let bridge = tokio::spawn(spawn_data_bridge(
            self.session.clone(),
            self.initial_line,
            self.action_tx.clone(),
            cancel.clone(),
        ));

        let mut events = EventReader::new(Duration::from_millis(33));
        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(..) | Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        cancel.cancel();
        if let Err(e) = bridge.await {
            warn!(error = %e, "data bridge ended abnormally");
        }
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char(c)) if c.is_ascii_digit() => {
                let screen = c
                    .to_digit(10)
                    .and_then(|n| u8::try_from(n).ok())
                    .and_then(ScreenId::from_number);
                return Ok(screen.map(Action::SwitchScreen));
            }

            (KeyModifiers::NONE, KeyCode::Tab) | (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }

            _ => {}
        }

        // Esc belongs to the screen: it cancels drags and dismisses errors
        // before it means "back".
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(None);
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Render => {}

            Action::SwitchScreen(target) => self.switch_to(*target),

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.switch_to(prev);
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::SnapshotUpdated(snap) => {
                self.snapshot = Arc::clone(snap);
                // Every screen tracks the data, not only the visible one.
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::Notify(message) => {
                self.notice = Some(message.clone());
            }

            Action::OpenLine(line) => {
                let line = *line;
                self.notice = None;
                self.switch_to(ScreenId::Queue);
                self.spawn_session_task("open line", move |session| async move {
                    session.select_line(line).await
                });
            }

            Action::ReloadLines => {
                self.spawn_session_task("reload lines", |session| async move {
                    session.load_lines().await.map(drop)
                });
            }

            Action::Refresh => {
                self.spawn_session_task("refresh", |session| async move {
                    session.refresh().await
                });
            }

            Action::MoveEntry(intent) => {
                // The session reports a failed reorder through the
                // snapshot's error banner; the handle is not needed here.
                if self.session.move_entry(*intent).is_none() {
                    debug!(?intent, "move refused");
                    self.notice = Some("Move not applied. Wait for the list to settle.".into());
                }
            }

            Action::SetStatus { id, status } => {
                let cmd = Command::SetStatus {
                    id: *id,
                    status: *status,
                };
                self.spawn_session_task("set status", move |session| async move {
                    session.execute(cmd).await.map(drop)
                });
            }

            Action::DismissError => {
                self.session.dismiss_error();
                self.notice = None;
            }

            Action::ToggleHideEntered => {
                let mut display = self.session.snapshot().display;
                display.hide_entered = !display.hide_entered;
                self.session.set_display(display);
                self.config.display.hide_entered = display.hide_entered;
                self.save_prefs();
            }

            Action::ToggleSequenceNumbers => {
                let mut display = self.session.snapshot().display;
                display.show_sequence_numbers = !display.show_sequence_numbers;
                self.session.set_display(display);
                self.config.display.show_sequence_numbers = display.show_sequence_numbers;
                self.save_prefs();
            }

            Action::ToggleReorder => {
                let enabled = !self.session.snapshot().reorder_enabled;
                self.session.set_reorder_enabled(enabled);
                self.config.display.reorder_enabled = enabled;
                self.notice = Some(if enabled {
                    "Reordering on: drag rows or press Space to pick one up.".into()
                } else {
                    "Reordering off.".into()
                });
                self.save_prefs();
            }
        }

        Ok(())
    }

    fn switch_to(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.previous_screen = Some(self.active_screen);
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    /// Run a session call in the background; failures land in the status bar.
    fn spawn_session_task<F, Fut>(&self, what: &'static str, task: F)
    where
        F: FnOnce(Session) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), CoreError>> + Send + 'static,
    {
        let session = self.session.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = task(session).await {
                warn!(error = %e, what, "session call failed");
                let _ = tx.send(Action::Notify(e.user_message().into()));
            }
        });
    }

    fn save_prefs(&mut self) {
        if let Err(e) = lineup_config::save_config(&self.config) {
            warn!(error = %e, "could not save display preferences");
            self.notice = Some(format!("Preferences not saved: {e}"));
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let banner_height = u16::from(self.snapshot.last_error.is_some());

        let layout = Layout::vertical([
            Constraint::Length(banner_height),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        if let Some(ref message) = self.snapshot.last_error {
            let banner = Paragraph::new(format!(" ✗ {message}   Esc to dismiss"))
                .style(theme::error_banner());
            frame.render_widget(banner, layout[0]);
        }

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[1]);
        }

        self.render_tab_bar(frame, layout[2]);
        self.render_status_bar(frame, layout[3]);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    theme::tab(id == self.active_screen),
                ))
            })
            .collect();

        let selected = ScreenId::ALL
            .iter()
            .position(|&s| s == self.active_screen)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(selected);

        frame.render_widget(tabs, area);
    }

    /// Sync indicator, reorder lock, notice and global hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let snap = &self.snapshot;
        let sync = match snap.phase {
            Phase::Idle => Span::styled("● synced", theme::synced()),
            Phase::SpeculativeApplied => {
                Span::styled(format!("◐ saving ({})", snap.pending), theme::saving())
            }
            Phase::Reconciling => Span::styled("◐ restoring", Style::default().fg(theme::RED)),
        };

        let lock = if snap.reorder_enabled {
            Span::styled("  ≡ reorder on", Style::default().fg(theme::ACCENT))
        } else {
            Span::styled("  reorder off", theme::key_hint())
        };

        let mut spans = vec![Span::raw(" "), sync, lock];
        if let Some(ref notice) = self.notice {
            spans.push(Span::styled(
                format!("  │ {notice}"),
                Style::default().fg(theme::YELLOW),
            ));
        }
        spans.push(Span::styled("  │ ? help  q quit", theme::key_hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 56u16.min(area.width.saturating_sub(4));
        let help_height = 22u16.min(area.height.saturating_sub(2));
        let help_area = Rect::new(
            area.x + area.width.saturating_sub(help_width) / 2,
            area.y + area.height.saturating_sub(help_height) / 2,
            help_width,
            help_height,
        );

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border(true))
            .style(Style::default().bg(theme::BG_DARK));

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(format!("  {title}"), Style::default().fg(theme::CYAN)))
        };
        let row = |key: &'static str, label: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(label, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            section("Navigation"),
            row("1-2 Tab", "Switch screen"),
            row("j/k ↑/↓", "Move selection"),
            row("Enter", "Open line"),
            row("Esc", "Cancel / dismiss / back"),
            Line::from(""),
            section("Queue"),
            row("r", "Turn reordering on or off"),
            row("drag", "Move a row with the mouse"),
            row("Space", "Pick up / drop a row"),
            row("e", "Mark entered / waiting"),
            row("h", "Hide entered attendees"),
            row("n", "Show waiting numbers"),
            row("R", "Refresh from the server"),
            Line::from(""),
            section("Global"),
            row("?", "This help"),
            row("q", "Quit"),
            Line::from(""),
            Line::from(Span::styled("            Esc or ? to close", theme::key_hint())),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}
