//! Footer hint bar widget.
//!
//! One-line format: `[Enter] send │ [Ctrl+J] newline │ ...         localhost:8000`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::text::{truncate_to_width, visual_width};
use crate::theme::Theme;

/// A single keybinding hint.
#[derive(Debug, Clone)]
pub struct KeyHint {
    /// The key or key combination (e.g., "Enter", "Ctrl+J").
    pub key: String,
    /// The action description (e.g., "send", "newline").
    pub action: String,
}

impl KeyHint {
    /// Create a new key hint.
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Footer hint bar widget.
///
/// Hints render on the left; the chat endpoint (scheme stripped) on the right.
pub struct FooterHints<'a> {
    hints: &'a [KeyHint],
    theme: &'a Theme,
    endpoint: Option<&'a str>,
}

impl<'a> FooterHints<'a> {
    /// Create a new footer hints widget.
    pub fn new(hints: &'a [KeyHint], theme: &'a Theme) -> Self {
        Self {
            hints,
            theme,
            endpoint: None,
        }
    }

    /// Set the endpoint to display on the right.
    #[must_use]
    pub fn endpoint(mut self, endpoint: &'a str) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Get the hints for the chat screen.
    pub fn chat_hints() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Enter", "send"),
            KeyHint::new("Ctrl+J", "newline"),
            KeyHint::new("PgUp/PgDn", "scroll"),
            KeyHint::new("Ctrl+C", "quit"),
        ]
    }
}

/// Strip the URL scheme for compact display.
fn display_host(endpoint: &str) -> &str {
    endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .unwrap_or(endpoint)
}

impl Widget for FooterHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();

        for (i, hint) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", Style::default().fg(self.theme.muted)));
            }

            // Key in brackets
            spans.push(Span::styled("[", Style::default().fg(self.theme.muted)));
            spans.push(Span::styled(
                &hint.key,
                Style::default().fg(self.theme.primary),
            ));
            spans.push(Span::styled("] ", Style::default().fg(self.theme.muted)));

            spans.push(Span::styled(
                &hint.action,
                Style::default().fg(self.theme.subtext),
            ));
        }

        let left_width: usize = spans.iter().map(|s| visual_width(&s.content)).sum();
        let total_width = usize::from(area.width);

        // Right side: endpoint, truncated before it collides with the hints
        if let Some(endpoint) = self.endpoint {
            let host = display_host(endpoint);
            let available = total_width.saturating_sub(left_width + 2);
            if available >= 4 {
                let shown = truncate_to_width(host, available);
                let padding = total_width.saturating_sub(left_width + visual_width(&shown));
                if padding > 0 {
                    spans.push(Span::raw(" ".repeat(padding)));
                }
                spans.push(Span::styled(shown, Style::default().fg(self.theme.muted)));
            }
        }

        let line = Line::from(spans);
        let paragraph = Paragraph::new(line).style(Style::default().bg(self.theme.surface));
        paragraph.render(area, buf);
    }
}
