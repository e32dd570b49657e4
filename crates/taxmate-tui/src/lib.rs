//! taxmate-tui: Terminal chat interface for the TaxMate tax assistant
//!
//! This crate provides the TUI layer for taxmate, including:
//! - Scrollable transcript with Markdown-rendered replies
//! - Auto-sizing message composer
//! - Footer hint bar
//! - Crossterm event loop with a tick for animations

mod app;
mod composer;
mod event;
mod footer;
#[cfg(test)]
pub mod test_utils;
mod text;
mod theme;
mod transcript;

pub use app::{App, RequestOutcome};
pub use composer::{Composer, ComposerState};
pub use event::{Event, EventHandler};
pub use footer::{FooterHints, KeyHint};
pub use taxmate_core;
pub use theme::Theme;
pub use transcript::{Transcript, TranscriptState};

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io::{self, stdout};
use taxmate_core::{ApiError, Config};

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// runs the event loop, and restores the terminal on exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    // Create event handler (4 Hz tick rate = 250ms)
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Settle a completed round trip (non-blocking check)
        if let Some(handle) = app.take_finished_request() {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                // The task panicked or was aborted before producing a result.
                Err(_) => Err(ApiError::Aborted),
            };
            app.settle(outcome);
        }

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Tick => app.tick(),
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Draw one frame: transcript on top, composer above the footer hint bar.
///
/// The composer's height is recomputed from its content every frame, so the
/// transcript area shrinks as the draft grows and snaps back after a
/// submission settles.
fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    let composer_height = app.composer.height_for(area.width);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(composer_height),
            Constraint::Length(1),
        ])
        .split(area);

    // Page step: transcript viewport minus one line of context.
    app.transcript_page = usize::from(chunks[0].height.saturating_sub(3)).max(1);

    let transcript = Transcript::new(app.session.conversation(), &app.theme)
        .busy(app.is_busy())
        .tick(app.tick);
    frame.render_stateful_widget(transcript, chunks[0], &mut app.transcript);

    let composer = Composer::new(&app.composer, &app.theme).busy(app.is_busy());
    frame.render_widget(composer, chunks[1]);

    let hints = FooterHints::chat_hints();
    let footer = FooterHints::new(&hints, &app.theme).endpoint(app.endpoint());
    frame.render_widget(footer, chunks[2]);
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_terminal_sized;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }

    fn draw_app(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = create_test_terminal_sized(width, height);
        terminal.draw(|frame| draw(frame, app)).unwrap();
        crate::test_utils::buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn test_draw_full_frame() {
        let mut app = App::new(&Config::default());
        let content = draw_app(&mut app, 100, 24);

        assert!(content.contains("Tax Assistant"));
        assert!(content.contains("Enter Your Questions Here..."));
        assert!(content.contains("[Enter] send"));
        assert!(content.contains("localhost:8000"));
    }

    #[test]
    fn test_draw_updates_page_step() {
        let mut app = App::new(&Config::default());
        draw_app(&mut app, 80, 24);

        // 24 rows - 3 composer - 1 footer = 20 transcript rows; page is
        // the 18-line viewport minus one line of context.
        assert_eq!(app.transcript_page, 17);
    }

    #[test]
    fn test_transcript_shrinks_as_draft_grows() {
        let mut app = App::new(&Config::default());
        app.composer.insert_str("one\ntwo\nthree");
        let content = draw_app(&mut app, 40, 24);

        assert!(content.contains("> one"));
        assert!(content.contains("  two"));
        assert!(content.contains("  three"));
    }

    #[test]
    fn test_draw_small_terminal_does_not_panic() {
        let mut app = App::new(&Config::default());
        app.composer.insert_str("some draft text");
        draw_app(&mut app, 10, 4);
        draw_app(&mut app, 2, 2);
    }

    #[tokio::test]
    async fn test_enter_then_settle_round_trip_through_draw() {
        let mut app = App::new(&Config::default());
        app.composer.insert_str("What is VAT?");
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        let while_busy = draw_app(&mut app, 60, 20);
        assert!(while_busy.contains("You: What is VAT?"));
        assert!(while_busy.contains("Waiting for a reply"));

        app.settle(Ok("VAT is a consumption tax.".to_string()));
        let settled = draw_app(&mut app, 60, 20);
        assert!(settled.contains("Assistant: VAT is a consumption tax."));
        assert!(!settled.contains("Waiting for a reply"));
        assert!(settled.contains("Enter Your Questions Here..."));
    }
}
