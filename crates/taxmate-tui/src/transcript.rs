//! Scrollable conversation transcript.
//!
//! Renders the message history with role prefixes, a welcome block when the
//! conversation is empty, and an animated waiting line while a reply is in
//! flight. Scrolling follows the newest message until the user pages away.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use taxmate_core::{Conversation, Role};

use crate::text::{render_markdown, wrap_lines, wrap_text};
use crate::theme::Theme;

/// Lines scrolled per mouse wheel tick.
pub const SCROLL_SPEED: usize = 3;

const USER_PREFIX: &str = "You: ";
const ASSISTANT_PREFIX: &str = "Assistant: ";

/// Indent for wrapped continuation lines.
const CONTINUATION_INDENT: &str = "  ";

/// Transcript scroll state.
///
/// `scroll` is the first visible wrapped line. While `follow` is set the
/// widget keeps the view pinned to the newest message and rewrites `scroll`
/// each frame, so disengaging starts from wherever the view currently is.
#[derive(Debug)]
pub struct TranscriptState {
    scroll: usize,
    follow: bool,
}

impl TranscriptState {
    /// Create a new state, following the newest message.
    pub fn new() -> Self {
        Self {
            scroll: 0,
            follow: true,
        }
    }

    /// Check if the view is pinned to the newest message.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Get the scroll offset (first visible wrapped line).
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Scroll up by the given number of lines. Disengages follow mode.
    pub fn scroll_up(&mut self, amount: usize) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(amount);
    }

    /// Scroll down by the given number of lines.
    ///
    /// The offset is clamped at render time; reaching the bottom re-engages
    /// follow mode.
    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll = self.scroll.saturating_add(amount);
    }

    /// Pin the view back to the newest message.
    pub fn follow_latest(&mut self) {
        self.follow = true;
    }
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

/// Transcript pane widget.
pub struct Transcript<'a> {
    conversation: &'a Conversation,
    theme: &'a Theme,
    busy: bool,
    tick: usize,
}

impl<'a> Transcript<'a> {
    /// Create a new transcript widget.
    pub fn new(conversation: &'a Conversation, theme: &'a Theme) -> Self {
        Self {
            conversation,
            theme,
            busy: false,
            tick: 0,
        }
    }

    /// Set whether a reply is currently in flight.
    #[must_use]
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }

    /// Set the tick counter driving the waiting-line animation.
    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    /// Build the full wrapped line list for the given inner width.
    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for message in self.conversation.messages() {
            match message.role {
                Role::User => self.push_user_message(&mut lines, &message.content, width),
                Role::Assistant => {
                    self.push_assistant_message(&mut lines, &message.content, width);
                }
            }
            // Blank line between messages
            lines.push(Line::from(""));
        }

        if self.busy {
            let dots = ".".repeat(self.tick % 3 + 1);
            lines.push(Line::from(Span::styled(
                format!("  \u{25cf} Waiting for a reply{dots}"),
                Style::default().fg(self.theme.muted),
            )));
        }

        lines
    }

    /// Render a user message: prefix on the first line, wrapped continuations
    /// indented. Content is plain text; embedded newlines are kept.
    fn push_user_message(&self, lines: &mut Vec<Line<'static>>, content: &str, width: usize) {
        let wrap_width = width.saturating_sub(USER_PREFIX.len()).max(1);
        let prefix_style = Style::default()
            .fg(self.theme.user)
            .add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(self.theme.text);

        let mut first = true;
        for logical in content.split('\n') {
            for piece in wrap_text(logical, wrap_width) {
                if first {
                    lines.push(Line::from(vec![
                        Span::styled(USER_PREFIX, prefix_style),
                        Span::styled(piece, text_style),
                    ]));
                    first = false;
                } else {
                    lines.push(Line::from(Span::styled(
                        format!("{CONTINUATION_INDENT}{piece}"),
                        text_style,
                    )));
                }
            }
        }
        if first {
            lines.push(Line::from(Span::styled(USER_PREFIX, prefix_style)));
        }
    }

    /// Render an assistant message: prefix on the first line, Markdown body
    /// wrapped and indented underneath.
    fn push_assistant_message(&self, lines: &mut Vec<Line<'static>>, content: &str, width: usize) {
        let wrap_width = width.saturating_sub(ASSISTANT_PREFIX.len()).max(1);
        let prefix_style = Style::default()
            .fg(self.theme.assistant)
            .add_modifier(Modifier::BOLD);

        let rendered = wrap_lines(render_markdown(content, self.theme), wrap_width);

        let mut first = true;
        for line in rendered {
            if first {
                let mut spans = vec![Span::styled(ASSISTANT_PREFIX, prefix_style)];
                spans.extend(line.spans);
                lines.push(Line::from(spans));
                first = false;
            } else {
                let mut spans = vec![Span::raw(CONTINUATION_INDENT)];
                spans.extend(line.spans);
                lines.push(Line::from(spans));
            }
        }
        if first {
            lines.push(Line::from(Span::styled(ASSISTANT_PREFIX, prefix_style)));
        }
    }

    /// Render the welcome block shown before the first message.
    fn render_welcome(&self, area: Rect, buf: &mut Buffer) {
        let greeting = Style::default().fg(self.theme.text);
        let heading = Style::default().fg(self.theme.subtext);
        let example = Style::default().fg(self.theme.muted);

        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Hi! I am your tax Assistant. How can I help you today?",
                greeting,
            )),
            Line::from(""),
            Line::from(Span::styled("  Try asking:", heading)),
            Line::from(""),
            Line::from(Span::styled("    Calculate tax for Rs. 2,500,000", example)),
            Line::from(Span::styled("    What are the current tax rates?", example)),
            Line::from(Span::styled("    Tell me about personal relief", example)),
            Line::from(Span::styled("    How does EPF deduction work?", example)),
        ])
        .style(Style::default().bg(self.theme.base));
        hint.render(area, buf);
    }
}

impl StatefulWidget for Transcript<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TranscriptState) {
        let block = Block::default()
            .title(" Tax Assistant ")
            .title_style(Style::default().fg(self.theme.text))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.conversation.is_empty() && !self.busy {
            self.render_welcome(inner, buf);
            return;
        }

        let lines = self.build_lines(usize::from(inner.width));

        // The trailing blank separator doubles as a margin row, keeping the
        // newest message one line clear of the composer when following.
        let max_offset = lines.len().saturating_sub(usize::from(inner.height));
        if state.scroll >= max_offset {
            state.follow = true;
        }
        if state.follow {
            state.scroll = max_offset;
        }

        let visible: Vec<Line<'static>> = lines.into_iter().skip(state.scroll).collect();
        Paragraph::new(visible)
            .style(Style::default().fg(self.theme.text).bg(self.theme.base))
            .render(inner, buf);
    }
}
