//! Terminal event plumbing for the TUI.
//!
//! Crossterm reads events with blocking I/O, so a dedicated thread polls the
//! terminal and forwards everything over a channel the async main loop can
//! await. A [`Event::Tick`] is emitted whenever the poll times out, which
//! also drives the pending-reply animation.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events delivered to the main loop.
#[derive(Debug, Clone)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// Nothing happened for one tick interval.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Reads terminal events on a background thread.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                let forwarded = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(CrosstermEvent::Key(key)) => tx_clone.send(Event::Key(key)),
                        Ok(CrosstermEvent::Mouse(mouse)) => tx_clone.send(Event::Mouse(mouse)),
                        Ok(CrosstermEvent::Resize(w, h)) => tx_clone.send(Event::Resize(w, h)),
                        Ok(_) => Ok(()),
                        Err(_) => break,
                    }
                } else {
                    tx_clone.send(Event::Tick)
                };
                if forwarded.is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Get the next event, waiting until one is available.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
