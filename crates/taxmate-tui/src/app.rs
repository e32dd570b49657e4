//! Application state and update logic for the TaxMate TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use taxmate_core::{ApiError, AssistantClient, ChatSession, Config};
use tokio::task::JoinHandle;

use crate::composer::ComposerState;
use crate::theme::Theme;
use crate::transcript::{TranscriptState, SCROLL_SPEED};

/// Outcome of one chat round trip, produced by the request task.
pub type RequestOutcome = Result<String, ApiError>;

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Chat session: message log plus the busy flag.
    pub session: ChatSession,

    /// Draft input state.
    pub composer: ComposerState,

    /// Transcript scroll state.
    pub transcript: TranscriptState,

    /// Lines per PgUp/PgDn step, derived from the last layout.
    pub transcript_page: usize,

    /// Tick counter for animations.
    pub tick: usize,

    /// Color theme.
    pub theme: Theme,

    /// HTTP client for the assistant service.
    client: AssistantClient,

    /// In-flight request task, if a submission is outstanding.
    pending: Option<JoinHandle<RequestOutcome>>,
}

impl App {
    /// Create a new app instance from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        let theme = Theme::named(&config.theme).unwrap_or_default();

        Self {
            should_quit: false,
            session: ChatSession::new(),
            composer: ComposerState::new(),
            transcript: TranscriptState::new(),
            transcript_page: 10,
            tick: 0,
            theme,
            client: AssistantClient::new(&config.endpoint),
            pending: None,
        }
    }

    /// The endpoint the client talks to.
    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    /// Whether a submission is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    /// Whether a request task is outstanding.
    pub fn has_pending_request(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle a key event.
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Check for Ctrl+C first
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        // Ctrl+J inserts a newline without committing
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('j') {
            self.composer.insert('\n');
            return;
        }

        match key.code {
            KeyCode::Esc => self.quit(),
            KeyCode::Enter => {
                // Unmodified Enter commits; any modifier turns it into a newline.
                if key.modifiers.is_empty() {
                    self.commit();
                } else {
                    self.composer.insert('\n');
                }
            }
            KeyCode::PageUp => self.transcript.scroll_up(self.transcript_page),
            KeyCode::PageDown => self.transcript.scroll_down(self.transcript_page),
            KeyCode::Backspace => self.composer.backspace(),
            KeyCode::Delete => self.composer.delete(),
            KeyCode::Left => self.composer.move_left(),
            KeyCode::Right => self.composer.move_right(),
            KeyCode::Home => self.composer.move_home(),
            KeyCode::End => self.composer.move_end(),
            KeyCode::Char(c) => {
                let blocked = KeyModifiers::CONTROL | KeyModifiers::ALT;
                if !key.modifiers.intersects(blocked) {
                    self.composer.insert(c);
                }
            }
            _ => {}
        }
    }

    /// Handle a mouse event (wheel scrolling).
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.transcript.scroll_up(SCROLL_SPEED),
            MouseEventKind::ScrollDown => self.transcript.scroll_down(SCROLL_SPEED),
            _ => {}
        }
    }

    /// Commit the current draft as a submission.
    ///
    /// A no-op while busy or when the trimmed draft is empty. On acceptance
    /// the user message is already in the log and the request task runs in
    /// the background; the draft stays visible until the round trip settles.
    pub fn commit(&mut self) {
        if let Some(text) = self.session.submit(self.composer.content()) {
            let client = self.client.clone();
            self.pending = Some(tokio::spawn(async move { client.send(&text).await }));
            self.transcript.follow_latest();
        }
    }

    /// Take the request task if it has finished.
    pub fn take_finished_request(&mut self) -> Option<JoinHandle<RequestOutcome>> {
        if self.pending.as_ref().is_some_and(|h| h.is_finished()) {
            self.pending.take()
        } else {
            None
        }
    }

    /// Settle the outstanding submission with the round trip outcome.
    ///
    /// Appends the reply (or the fallback message), clears the draft and the
    /// busy flag, and pins the transcript back to the newest message.
    pub fn settle(&mut self, outcome: RequestOutcome) {
        self.session.settle(outcome);
        self.composer.clear();
        self.transcript.follow_latest();
    }

    /// Increment the tick counter driving animations.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Quit, aborting any outstanding request task.
    pub fn quit(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.should_quit = true;
    }
}
