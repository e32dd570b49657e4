//! Message composer at the bottom of the screen.
//!
//! Owns the draft text and cursor. The widget auto-sizes: one content row
//! when empty, growing with the wrapped draft up to [`MAX_CONTENT_ROWS`],
//! and back to one row when the draft is cleared after a submission.
//! Editing stays available while a request is in flight; only committing is
//! gated, and that happens in the main loop.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::theme::Theme;

/// Prompt prefix on the first display row.
const PROMPT: &str = "> ";
/// Indent on continuation rows, same width as the prompt.
const CONTINUATION: &str = "  ";
/// Maximum content rows the composer grows to.
pub const MAX_CONTENT_ROWS: u16 = 6;

/// Placeholder shown while the draft is empty.
pub const PLACEHOLDER: &str = "Enter Your Questions Here...";

/// Draft text and cursor for the composer.
///
/// The cursor is a character index; editing converts it to a byte offset
/// before touching the string, so multi-byte input is safe.
#[derive(Debug, Clone, Default)]
pub struct ComposerState {
    content: String,
    cursor: usize,
}

impl ComposerState {
    /// Create a new empty composer state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current draft content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the draft is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Check if the draft is empty after trimming whitespace.
    ///
    /// A blank draft cannot be committed.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Clear the draft and reset the cursor.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let offset = self.byte_offset();
        self.content.insert(offset, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let offset = self.byte_offset();
        self.content.insert_str(offset, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let offset = self.byte_offset();
            self.content.remove(offset);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let offset = self.byte_offset();
            self.content.remove(offset);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Widget height in terminal rows for the given widget width,
    /// including the two border rows.
    ///
    /// Grows with the wrapped draft, never past [`MAX_CONTENT_ROWS`]. Pure
    /// in content and width, and non-decreasing as content grows.
    pub fn height_for(&self, area_width: u16) -> u16 {
        let wrap_width = wrap_width(area_width);
        let rows = self.display_row_count(wrap_width);
        let clamped = rows.min(usize::from(MAX_CONTENT_ROWS)).max(1);
        #[allow(clippy::cast_possible_truncation)]
        {
            clamped as u16 + 2
        }
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_offset(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map_or(self.content.len(), |(offset, _)| offset)
    }

    /// Total display rows at the given wrap width.
    fn display_row_count(&self, wrap_width: usize) -> usize {
        self.content
            .split('\n')
            .map(|line| {
                let chars: Vec<char> = line.chars().collect();
                wrap_ranges(&chars, wrap_width).len()
            })
            .sum()
    }

    /// Build display rows plus the row index the cursor falls on.
    ///
    /// Logical lines are chunked at the wrap width so the row count always
    /// agrees with [`ComposerState::height_for`].
    fn build_lines(&self, wrap_width: usize, theme: &Theme) -> (Vec<Line<'static>>, usize) {
        let prompt_style = Style::default().fg(theme.primary);
        let mut lines = Vec::new();
        let mut cursor_row = 0;
        let mut consumed = 0;

        for logical in self.content.split('\n') {
            let chars: Vec<char> = logical.chars().collect();
            let ranges = wrap_ranges(&chars, wrap_width);
            let cursor_here = self.cursor >= consumed && self.cursor <= consumed + chars.len();
            let cursor_col = self.cursor - consumed.min(self.cursor);

            let last_range = ranges.len() - 1;
            for (range_idx, range) in ranges.iter().enumerate() {
                let prefix = if lines.is_empty() { PROMPT } else { CONTINUATION };
                let mut spans = vec![Span::styled(prefix, prompt_style)];

                let last_chunk = range_idx == last_range;
                let in_chunk = cursor_here
                    && cursor_col >= range.start
                    && (cursor_col < range.end || (last_chunk && cursor_col == range.end));
                if in_chunk {
                    cursor_row = lines.len();
                    let before: String = chars[range.start..cursor_col].iter().collect();
                    let after: String = chars[cursor_col..range.end].iter().collect();
                    spans.push(Span::raw(before));
                    spans.push(Span::raw("█"));
                    spans.push(Span::raw(after));
                } else {
                    let chunk: String = chars[range.start..range.end].iter().collect();
                    spans.push(Span::raw(chunk));
                }
                lines.push(Line::from(spans));
            }

            // The newline separating logical lines counts one character.
            consumed += chars.len() + 1;
        }

        (lines, cursor_row)
    }
}

/// Composer widget: bordered draft editor with a block cursor.
pub struct Composer<'a> {
    state: &'a ComposerState,
    theme: &'a Theme,
    busy: bool,
}

impl<'a> Composer<'a> {
    /// Create a composer widget over the given state.
    pub fn new(state: &'a ComposerState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            busy: false,
        }
    }

    /// Dim the border while a submission is in flight.
    #[must_use]
    pub fn busy(mut self, busy: bool) -> Self {
        self.busy = busy;
        self
    }
}

impl Widget for Composer<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.busy {
            Style::default().fg(self.theme.muted)
        } else {
            Style::default().fg(self.theme.border_focused)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        if inner.height < 1 || inner.width < 1 {
            block.render(area, buf);
            return;
        }

        if self.state.is_empty() {
            let line = Line::from(vec![
                Span::styled(PROMPT, Style::default().fg(self.theme.primary)),
                Span::raw("█"),
                Span::styled(PLACEHOLDER, Style::default().fg(self.theme.muted)),
            ]);
            Paragraph::new(line)
                .block(block)
                .style(Style::default().fg(self.theme.text))
                .render(area, buf);
            return;
        }

        let wrap = wrap_width(area.width);
        let (lines, cursor_row) = self.state.build_lines(wrap, self.theme);

        // Keep the cursor row visible once the draft outgrows the clamp.
        let inner_height = usize::from(inner.height);
        let scroll = if lines.len() <= inner_height {
            0
        } else {
            cursor_row.saturating_sub(inner_height.saturating_sub(1))
        };

        Paragraph::new(lines)
            .block(block)
            .style(Style::default().fg(self.theme.text))
            .scroll((scroll as u16, 0))
            .render(area, buf);
    }
}

/// Columns per display row inside the borders, after the prompt.
fn wrap_width(area_width: u16) -> usize {
    usize::from(area_width.saturating_sub(2)).saturating_sub(PROMPT.len()).max(1)
}

/// Chunk one logical line into display rows of at most `wrap_width` terminal
/// columns, counting wide characters as two. Returns char-index ranges into
/// the line; an empty line still yields one empty range, and a character
/// wider than the whole budget overflows its row instead of opening an
/// empty one.
fn wrap_ranges(chars: &[char], wrap_width: usize) -> Vec<std::ops::Range<usize>> {
    let mut ranges = Vec::new();
    let mut begin = 0;
    let mut columns = 0;

    for (idx, ch) in chars.iter().enumerate() {
        let ch_width = UnicodeWidthChar::width(*ch).unwrap_or(0);
        if columns + ch_width > wrap_width && idx > begin {
            ranges.push(begin..idx);
            begin = idx;
            columns = 0;
        }
        columns += ch_width;
    }
    ranges.push(begin..chars.len());
    ranges
}
