//! Terminal ownership for the dashboard.
//!
//! [`Tui`] switches the terminal into raw mode on the alternate screen with
//! bracketed paste on, and switches it back when dropped. The panic hook
//! installed by [`install_hooks`] performs the same restore, so a crash
//! never leaves the shell unusable.

use std::io::{Stdout, stdout};

use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand, cursor,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub type Backend = CrosstermBackend<Stdout>;

/// The ratatui terminal plus the mode switches around it.
pub struct Tui {
    pub terminal: Terminal<Backend>,
}

impl Tui {
    /// Wrap stdout. The terminal stays in cooked mode until [`Tui::enter`].
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    /// Raw mode, alternate screen, bracketed paste, cursor hidden.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        out.execute(EnterAlternateScreen)?;
        out.execute(EnableBracketedPaste)?;
        out.execute(cursor::Hide)?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Undo [`Tui::enter`]. Safe to call more than once; every step runs
    /// even when an earlier one fails.
    pub fn exit(&mut self) {
        let _ = self.terminal.show_cursor();
        restore();
    }

    /// Render one frame.
    pub fn draw<F>(&mut self, render: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame),
    {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        self.exit();
    }
}

/// Put the terminal back into the state the shell expects.
fn restore() {
    let mut out = stdout();
    let _ = out.execute(cursor::Show);
    let _ = out.execute(DisableBracketedPaste);
    let _ = out.execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Install color-eyre's report hook and a panic hook that restores the
/// terminal before the panic message is printed.
///
/// Call before [`Tui::enter`] so start-up panics print cleanly too.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();

    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));

    Ok(())
}
