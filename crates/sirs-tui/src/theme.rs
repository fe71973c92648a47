//! Palette and semantic styles for the dashboard.

use ratatui::style::{Color, Modifier, Style};

use sirs_core::StockLevel;

// ── Core Palette ──────────────────────────────────────────────────────

pub const ACCENT_PURPLE: Color = Color::Rgb(189, 147, 249); // #bd93f9
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const AMBER: Color = Color::Rgb(255, 184, 108); // #ffb86c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29
pub const SORT_BG: Color = Color::Rgb(50, 52, 68); // #323444

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Header cell of the column the table is sorted on.
pub fn table_header_sorted() -> Style {
    table_header().bg(SORT_BG)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Highlighted (cursor) table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(ACCENT_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Marker for rows in the selection set.
pub fn row_marked() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default()
        .fg(ACCENT_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn stock_color(level: StockLevel) -> Color {
    match level {
        StockLevel::OutOfStock | StockLevel::Negative => ERROR_RED,
        StockLevel::Low => AMBER,
        StockLevel::InStock => SUCCESS_GREEN,
    }
}
