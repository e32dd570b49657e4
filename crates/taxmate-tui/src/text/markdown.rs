//! Markdown rendering for assistant replies.
//!
//! The assistant service answers in Markdown (headings, bold text, bullet
//! and numbered lists). [`render_markdown`] converts a reply to styled
//! ratatui Lines for the transcript; wrapping to the pane width happens
//! afterwards in [`super::wrap_lines`].

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme::Theme;

/// Styles for rendered markdown elements.
#[derive(Debug, Clone)]
pub struct MarkdownStyles {
    pub h1: Style,
    pub h2: Style,
    pub h3: Style,
    pub code: Style,
    pub code_block: Style,
    pub emphasis: Style,
    pub strong: Style,
    pub strikethrough: Style,
    pub list_marker: Style,
    pub link: Style,
    pub blockquote: Style,
    pub text: Style,
}

impl MarkdownStyles {
    /// Create styles from a theme.
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            h1: Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
            h2: Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            h3: Style::default()
                .fg(theme.subtext)
                .add_modifier(Modifier::BOLD),
            code: Style::default().fg(theme.secondary).bg(theme.surface),
            code_block: Style::default().fg(theme.secondary).bg(theme.surface),
            emphasis: Style::default().add_modifier(Modifier::ITALIC),
            strong: Style::default().add_modifier(Modifier::BOLD),
            strikethrough: Style::default().add_modifier(Modifier::CROSSED_OUT),
            list_marker: Style::default().fg(theme.muted),
            link: Style::default()
                .fg(theme.info)
                .add_modifier(Modifier::UNDERLINED),
            blockquote: Style::default()
                .fg(theme.subtext)
                .add_modifier(Modifier::ITALIC),
            text: Style::default().fg(theme.text),
        }
    }
}

impl Default for MarkdownStyles {
    fn default() -> Self {
        Self::from_theme(&Theme::default())
    }
}

/// Render markdown text to styled ratatui Lines.
pub fn render_markdown(input: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(input, options);
    let mut renderer = MarkdownRenderer::new(MarkdownStyles::from_theme(theme));
    for event in parser {
        renderer.handle_event(event);
    }
    renderer.finish()
}

/// Internal renderer that folds pulldown-cmark events into lines.
struct MarkdownRenderer {
    lines: Vec<Line<'static>>,
    styles: MarkdownStyles,
    /// Stack of active inline styles for nested formatting.
    style_stack: Vec<Style>,
    /// Spans of the line currently being built.
    current: Vec<Span<'static>>,
    /// One entry per open list; `Some` holds the next ordered-list number.
    list_stack: Vec<Option<u64>>,
    /// Marker to prepend to the next text run (list bullet or number).
    pending_marker: Option<String>,
    in_code_block: bool,
    in_blockquote: bool,
}

impl MarkdownRenderer {
    fn new(styles: MarkdownStyles) -> Self {
        Self {
            lines: Vec::new(),
            styles,
            style_stack: Vec::new(),
            current: Vec::new(),
            list_stack: Vec::new(),
            pending_marker: None,
            in_code_block: false,
            in_blockquote: false,
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        self.lines
    }

    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                let style = self.heading_style(level);
                self.style_stack.push(style);
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.style_stack.pop();
            }

            Event::Start(Tag::Emphasis) => self.style_stack.push(self.styles.emphasis),
            Event::Start(Tag::Strong) => self.style_stack.push(self.styles.strong),
            Event::Start(Tag::Strikethrough) => self.style_stack.push(self.styles.strikethrough),
            Event::Start(Tag::Link { .. }) => self.style_stack.push(self.styles.link),
            Event::End(
                TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link,
            ) => {
                self.style_stack.pop();
            }

            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_line();
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush_line();
                self.in_code_block = false;
            }

            Event::Start(Tag::List(start)) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.list_stack.pop();
            }

            Event::Start(Tag::Item) => {
                self.flush_line();
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{indent}{number}. ");
                        *number += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.pending_marker = Some(marker);
            }
            Event::End(TagEnd::Item) => self.flush_line(),

            Event::Start(Tag::BlockQuote) => {
                self.flush_line();
                self.in_blockquote = true;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.in_blockquote = false;
            }

            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                self.lines.push(Line::from(""));
            }

            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => {
                let style = self.styles.code;
                self.current.push(Span::styled(format!("`{code}`"), style));
            }

            Event::SoftBreak => self.add_text(" "),
            Event::HardBreak => self.flush_line(),

            // Tables, images, footnotes, raw HTML: not produced by the
            // assistant service, rendered as nothing.
            _ => {}
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.in_code_block {
            for line in text.lines() {
                self.current
                    .push(Span::styled(format!("  {line}"), self.styles.code_block));
                self.flush_line();
            }
            return;
        }

        if let Some(marker) = self.pending_marker.take() {
            self.current
                .push(Span::styled(marker, self.styles.list_marker));
        }

        if self.in_blockquote && self.current.is_empty() {
            self.current
                .push(Span::styled("> ".to_string(), self.styles.blockquote));
        }

        let style = self.current_style();
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn current_style(&self) -> Style {
        let mut style = self.styles.text;
        for s in &self.style_stack {
            style = style.patch(*s);
        }
        style
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => self.styles.h1,
            HeadingLevel::H2 => self.styles.h2,
            _ => self.styles.h3,
        }
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            let spans = std::mem::take(&mut self.current);
            self.lines.push(Line::from(spans));
        }
    }
}
