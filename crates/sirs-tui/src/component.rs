//! Component trait — the building block for every screen.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;

/// Lifecycle: `init` → (`handle_key_event` | `update` | `render`)*
pub trait Component: Send {
    /// Called once when the component is mounted.
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Process a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect);

    /// True while a text field owns the keyboard, so global shortcuts
    /// must not fire.
    fn captures_input(&self) -> bool {
        false
    }

    /// Text pasted into the terminal (bracketed paste). Only delivered
    /// while `captures_input` is true.
    fn handle_paste(&mut self, _text: &str) {}

    fn set_focused(&mut self, _focused: bool) {}

    fn id(&self) -> &str;
}
