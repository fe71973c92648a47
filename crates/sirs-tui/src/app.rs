//! Application core — event loop, action dispatch, overlays.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sirs_core::{BulkOutcome, Command, CommandResult, Controller, EntityId, FetchStatus};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge;
use crate::event::{Event, EventReader};
use crate::screens::ProductsScreen;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::overlay;

/// How long non-error toasts stay up.
const TOAST_TTL: Duration = Duration::from_secs(4);

pub struct App {
    controller: Controller,
    screen: Box<dyn Component>,
    running: bool,
    help_visible: bool,
    /// Active toast with the time it was raised.
    notification: Option<(Notification, Instant)>,
    pending_confirm: Option<ConfirmAction>,
    fetching: bool,
    fetch_status: FetchStatus,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    refresh_tx: mpsc::UnboundedSender<()>,
    /// Handed to the data bridge when the loop starts.
    refresh_rx: Option<mpsc::UnboundedReceiver<()>>,
}

impl App {
    pub fn new(controller: Controller, page_size: usize) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();

        Self {
            controller,
            screen: Box::new(ProductsScreen::new(page_size)),
            running: true,
            help_visible: false,
            notification: None,
            pending_confirm: None,
            fetching: false,
            fetch_status: FetchStatus::Idle,
            action_tx,
            action_rx,
            refresh_tx,
            refresh_rx: Some(refresh_rx),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        self.screen.init(self.action_tx.clone())?;
        self.screen.set_focused(true);
        debug!(screen = self.screen.id(), "screen mounted");

        let cancel = CancellationToken::new();
        if let Some(refresh_rx) = self.refresh_rx.take() {
            tokio::spawn(data_bridge::spawn_data_bridge(
                self.controller.clone(),
                self.action_tx.clone(),
                refresh_rx,
                cancel.clone(),
            ));
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

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
                Event::Paste(text) => {
                    if self.pending_confirm.is_none() && self.screen.captures_input() {
                        self.screen.handle_paste(&text);
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        cancel.cancel();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, then the active overlay, then the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.screen.captures_input() {
            return self.screen.handle_key_event(key);
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match key.code {
            KeyCode::Esc if self.notification.is_some() => {
                return Ok(Some(Action::DismissNotification));
            }
            KeyCode::Char('q') => return Ok(Some(Action::Quit)),
            KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
            _ => {}
        }

        self.screen.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                info!("quit requested");
                self.running = false;
            }
            Action::Tick => self.expire_notification(),
            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }
            Action::DismissNotification => {
                self.notification = None;
            }
            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }
            Action::Refresh => {
                if self.refresh_tx.send(()).is_err() {
                    warn!("data bridge is gone; refresh dropped");
                }
            }
            Action::FetchStarted => {
                self.fetching = true;
            }
            Action::FetchStatusChanged(status) => {
                self.fetching = false;
                if let FetchStatus::Failed { message, .. } = status {
                    self.action_tx.send(Action::Notify(Notification::error(format!(
                        "Fetch failed: {message}. Showing the last loaded list."
                    ))))?;
                }
                self.fetch_status = status.clone();
            }
            Action::RequestDelete(ids) => {
                if !ids.is_empty() {
                    self.pending_confirm = Some(ConfirmAction::DeleteProducts { ids: ids.clone() });
                }
            }
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm);
                }
            }
            Action::ConfirmNo => {
                self.pending_confirm = None;
            }
            Action::DeleteFinished(outcome) => {
                self.action_tx.send(Action::Notify(delete_message(outcome)))?;
            }
            Action::Render | Action::Resize(..) | Action::ProductsUpdated(_) => {}
        }

        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }

        Ok(())
    }

    fn expire_notification(&mut self) {
        let expired = self
            .notification
            .as_ref()
            .is_some_and(|(n, shown)| !n.is_sticky() && shown.elapsed() >= TOAST_TTL);
        if expired {
            self.notification = None;
        }
    }

    fn execute_confirm(&self, confirm: ConfirmAction) {
        match confirm {
            ConfirmAction::DeleteProducts { ids } => self.execute_delete(ids),
        }
    }

    /// Run the delete in the background; the result comes back as an
    /// action and the refetched list through the data bridge.
    fn execute_delete(&self, ids: Vec<EntityId>) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        debug!(count = ids.len(), "deleting products");
        tokio::spawn(async move {
            match controller.execute(Command::DeleteProducts { ids }).await {
                Ok(CommandResult::Bulk(outcome)) => {
                    let _ = tx.send(Action::DeleteFinished(outcome));
                }
                Ok(_) => {}
                Err(e) => {
                    let _ = tx.send(Action::Notify(Notification::error(e.to_string())));
                }
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [content_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.screen.render(frame, content_area);
        self.render_status_bar(frame, status_area);

        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, content_area, notif);
        }

        if let Some(ref confirm) = self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let indicator = if self.fetching {
            Span::styled("◐ refreshing", Style::default().fg(theme::AMBER))
        } else {
            match &self.fetch_status {
                FetchStatus::Idle => Span::styled("○ not loaded", theme::key_hint()),
                FetchStatus::Ok { at } => Span::styled(
                    format!("● synced {}", clock(*at)),
                    Style::default().fg(theme::SUCCESS_GREEN),
                ),
                FetchStatus::Failed { at, .. } => Span::styled(
                    format!("✗ fetch failed {} · cached list", clock(*at)),
                    Style::default().fg(theme::ERROR_RED),
                ),
            }
        };

        let hints = Span::styled(" │ ? help  Esc dismiss  q quit", theme::key_hint());
        let line = Line::from(vec![Span::raw(" "), indicator, hints]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let (color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
        };

        let rect = overlay::toast(area, notif.message.chars().count() + 4);
        let inner = overlay::panel(frame, rect, None, Style::default().fg(color));

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let rect = overlay::centered(area, 50, 5);
        let inner = overlay::panel(
            frame,
            rect,
            Some("Confirm"),
            Style::default().fg(theme::AMBER),
        );

        let text = vec![
            Line::from(Span::styled(
                format!("  {confirm}"),
                Style::default().fg(theme::DIM_WHITE),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let rect = overlay::centered(area, 62, 24);
        let inner = overlay::panel(frame, rect, Some("Keyboard Shortcuts"), theme::border_focused());

        let section = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::NEON_CYAN),
            ))
        };
        let key = |k: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {k:<12}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let help_text = vec![
            section("Table"),
            key("j/k ↑/↓", "Move cursor"),
            key("g/G", "First / last row"),
            key("h/l [ ]", "Previous / next page"),
            key("+/-", "Bigger / smaller pages"),
            key("1-6", "Sort by column (again to reverse)"),
            Line::from(""),
            section("Filtering"),
            key("/", "Search (Enter keep, Esc clear)"),
            key("Tab S-Tab", "Stock filter"),
            key("v", "Cycle saved views"),
            key("X", "Clear all filters"),
            Line::from(""),
            section("Actions"),
            key("Space", "Select row"),
            key("a", "Select / clear this page"),
            key("Enter", "Row menu"),
            key("d Del", "Delete selected (or cursor row)"),
            key("r", "Refresh from server"),
            key("Esc", "Dismiss toast / close / clear"),
            key("q", "Quit"),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

fn clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Toast text for a finished bulk delete.
fn delete_message(outcome: &BulkOutcome) -> Notification {
    let plural = |n: usize| if n == 1 { "product" } else { "products" };
    match outcome.failed.first() {
        None => {
            let n = outcome.succeeded.len();
            Notification::success(format!("Deleted {n} {}", plural(n)))
        }
        Some(first) => Notification::error(format!(
            "Deleted {} of {}; #{} failed: {}",
            outcome.succeeded.len(),
            outcome.total(),
            first.id,
            first.reason
        )),
    }
}
