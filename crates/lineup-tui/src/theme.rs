//! Palette and semantic styles.

use ratatui::style::{Color, Modifier, Style};

// ── Palette ──────────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const RED: Color = Color::Rgb(255, 99, 99); // #ff6363

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Chrome ───────────────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}

pub fn border(focused: bool) -> Style {
    Style::default().fg(if focused { ACCENT } else { GRAY })
}

pub fn tab(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM_WHITE)
    }
}

pub fn key_hint() -> Style {
    Style::default().fg(GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}

// ── Tables ───────────────────────────────────────────────────────────

pub fn table_header() -> Style {
    Style::default()
        .fg(CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Attendees already let in fade into the background.
pub fn entered_row() -> Style {
    Style::default().fg(GRAY).add_modifier(Modifier::DIM)
}

/// The entry being carried.
pub fn drag_source() -> Style {
    Style::default()
        .fg(BG_DARK)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// The slot the carried entry would land in.
pub fn drop_target() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::UNDERLINED)
}

// ── Status ───────────────────────────────────────────────────────────

pub fn error_banner() -> Style {
    Style::default()
        .fg(BG_DARK)
        .bg(RED)
        .add_modifier(Modifier::BOLD)
}

pub fn synced() -> Style {
    Style::default().fg(GREEN)
}

pub fn saving() -> Style {
    Style::default().fg(YELLOW)
}
