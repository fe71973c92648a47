//! Geometry and chrome for floating panels: dialogs, toasts, menus.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, BorderType, Borders, Clear};

use crate::theme;

/// A `width` × `height` rect centered in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

/// Bottom-right toast slot, kept clear of the status line.
pub fn toast(area: Rect, message_len: usize) -> Rect {
    let len = u16::try_from(message_len).unwrap_or(u16::MAX);
    let width = len
        .saturating_add(6)
        .clamp(20, 72)
        .min(area.width.saturating_sub(2));
    let height = 3u16.min(area.height);
    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 1);
    Rect::new(area.x + x, area.y + y, width, height)
}

/// A popup anchored just below `row_y`, flipped above when it would run
/// off the bottom of `area`.
pub fn anchored(area: Rect, x: u16, row_y: u16, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = x.min(area.right().saturating_sub(width));
    let below = row_y.saturating_add(1);
    let y = if below.saturating_add(height) <= area.bottom() {
        below
    } else {
        row_y.saturating_sub(height).max(area.y)
    };
    Rect::new(x, y, width, height)
}

/// Clear `rect` and draw a rounded border around it. Returns the inner
/// area.
pub fn panel(frame: &mut Frame, rect: Rect, title: Option<&str>, border: Style) -> Rect {
    frame.render_widget(Clear, rect);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .style(Style::default().bg(theme::BG_DARK));
    if let Some(title) = title {
        block = block
            .title(format!(" {title} "))
            .title_style(theme::title_style());
    }
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    inner
}
