//! Terminal input pump.
//!
//! A background task turns crossterm's event stream into [`Event`]s and
//! interleaves two timers: a slow tick that ages toasts and a fast pulse
//! that triggers redraws. Everything arrives on one unbounded channel, so
//! the app loop only ever awaits [`EventReader::next`].

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// What the app loop reacts to.
#[derive(Debug)]
pub enum Event {
    /// Key press. Releases and auto-repeats are filtered out.
    Key(KeyEvent),
    /// Text delivered in one piece by bracketed paste.
    Paste(String),
    /// New terminal size as (cols, rows).
    Resize(u16, u16),
    /// Slow pulse; expires success toasts.
    Tick,
    /// Redraw pulse.
    Render,
}

/// Handle onto the background input task. Dropping it stops the task.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Start reading. `tick_rate` paces [`Event::Tick`], `render_rate`
    /// paces [`Event::Render`].
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, cancel.clone(), tick_rate, render_rate));
        Self { rx, cancel }
    }

    /// Wait for the next event. `None` once the task has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Ask the task to stop. Events already queued can still be read.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Timer that drops missed beats instead of firing them in a burst.
fn pulse(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Map a raw crossterm event; `None` for events the dashboard ignores
/// (mouse, focus, key release).
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Paste(text) => Some(Event::Paste(text)),
        CrosstermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}

async fn pump(
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
    tick_rate: Duration,
    render_rate: Duration,
) {
    let mut input = EventStream::new();
    let mut tick = pulse(tick_rate);
    let mut render = pulse(render_rate);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = tick.tick() => Event::Tick,
            _ = render.tick() => Event::Render,
            Some(Ok(raw)) = input.next() => match translate(raw) {
                Some(event) => event,
                None => continue,
            },
        };

        // Receiver gone: the app has shut down
        if tx.send(event).is_err() {
            break;
        }
    }
}
