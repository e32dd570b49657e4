//! Width-aware text utilities for ratatui Lines.
//!
//! Wrapping preserves span styling across the break points; measurement is
//! unicode-aware so wide characters count as two terminal cells.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap a plain text string to the specified width.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    textwrap::wrap(text, width)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

/// Wrap a vector of Lines to fit within the specified width.
///
/// Lines that exceed the width are split into multiple lines; styling is
/// preserved across the wrapped pieces.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }

    let mut result = Vec::new();
    for line in lines {
        result.extend(wrap_line(line, width));
    }
    result
}

fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let total_chars: usize = line.spans.iter().map(|s| s.content.chars().count()).sum();
    if total_chars <= width {
        return vec![line];
    }

    // Flatten to per-char styles, wrap the plain text, then re-slice the
    // styled chars along the pieces textwrap chose.
    let styled: Vec<(char, Style)> = line
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |ch| (ch, span.style)))
        .collect();
    let plain: String = styled.iter().map(|(ch, _)| ch).collect();

    let mut result = Vec::new();
    let mut byte_pos = 0;

    for piece in textwrap::wrap(&plain, width) {
        let piece: &str = piece.as_ref();
        if piece.is_empty() {
            result.push(Line::from(""));
            continue;
        }
        // Each piece is a substring of the input; whitespace eaten at the
        // break sits between byte_pos and the match.
        let Some(found) = plain[byte_pos..].find(piece) else {
            result.push(Line::from(piece.to_string()));
            continue;
        };
        let start = plain[..byte_pos + found].chars().count();
        let end = start + piece.chars().count();
        byte_pos += found + piece.len();

        result.push(regroup_spans(&styled[start..end]));
    }

    if result.is_empty() {
        result.push(Line::from(""));
    }
    result
}

/// Rebuild a Line from styled chars, merging runs with equal style.
fn regroup_spans(chars: &[(char, Style)]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut text = String::new();
    let mut run_style: Option<Style> = None;

    for (ch, style) in chars {
        match run_style {
            Some(current) if current == *style => text.push(*ch),
            Some(current) => {
                spans.push(Span::styled(std::mem::take(&mut text), current));
                run_style = Some(*style);
                text.push(*ch);
            }
            None => {
                run_style = Some(*style);
                text.push(*ch);
            }
        }
    }
    if let Some(style) = run_style {
        if !text.is_empty() {
            spans.push(Span::styled(text, style));
        }
    }

    Line::from(spans)
}

/// Get the visual width of a string in terminal cells.
///
/// Accounts for wide characters (CJK, emoji) that take 2 cells.
pub fn visual_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to a maximum visual width, appending "..." when
/// anything was cut. Respects character boundaries.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if visual_width(s) <= max_width {
        return s.to_string();
    }

    let target = max_width.saturating_sub(3);
    if target == 0 {
        return "...".to_string();
    }

    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push_str("...");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_wrap_text_short() {
        assert_eq!(wrap_text("Hello", 10), vec!["Hello"]);
    }

    #[test]
    fn test_wrap_text_long() {
        let lines = wrap_text("Hello world this is a long line", 10);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 10);
        }
    }

    #[test]
    fn test_wrap_line_keeps_short_line_intact() {
        let line = Line::from(vec![
            Span::styled("Hello ", Style::default().fg(Color::Red)),
            Span::styled("world", Style::default().fg(Color::Blue)),
        ]);
        let wrapped = wrap_lines(vec![line], 20);
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped[0].spans.len(), 2);
    }

    #[test]
    fn test_wrap_line_preserves_styles_across_break() {
        let line = Line::from(vec![
            Span::styled("red red red ", Style::default().fg(Color::Red)),
            Span::styled("blue blue blue", Style::default().fg(Color::Blue)),
        ]);
        let wrapped = wrap_lines(vec![line], 12);
        assert!(wrapped.len() > 1);

        let all_spans: Vec<&Span<'_>> = wrapped.iter().flat_map(|l| l.spans.iter()).collect();
        assert!(all_spans
            .iter()
            .any(|s| s.style.fg == Some(Color::Red) && s.content.contains("red")));
        assert!(all_spans
            .iter()
            .any(|s| s.style.fg == Some(Color::Blue) && s.content.contains("blue")));
    }

    #[test]
    fn test_wrap_lines_content_survives() {
        let lines = vec![
            Line::from("Short line"),
            Line::from("This is a very long line that should definitely be wrapped to fit"),
        ];
        let wrapped = wrap_lines(lines, 20);
        assert!(wrapped.len() > 2);

        let all_text: String = wrapped
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.as_ref()))
            .collect::<Vec<_>>()
            .join(" ");
        assert!(all_text.contains("Short line"));
        assert!(all_text.contains("wrapped to fit"));
    }

    #[test]
    fn test_wrap_unicode_no_panic() {
        let line = Line::from(vec![
            Span::styled("Hello 🎉 ", Style::default().fg(Color::Red)),
            Span::styled("你好世界 and more words", Style::default().fg(Color::Blue)),
        ]);
        let wrapped = wrap_lines(vec![line], 10);
        assert!(!wrapped.is_empty());
        let all_text: String = wrapped
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.as_ref()))
            .collect();
        assert!(all_text.contains("🎉"));
        assert!(all_text.contains("你好"));
    }

    #[test]
    fn test_visual_width() {
        assert_eq!(visual_width("hello"), 5);
        assert_eq!(visual_width("你好"), 4);
        assert_eq!(visual_width(""), 0);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 8), "hello...");
        assert_eq!(truncate_to_width("hello", 3), "...");
    }

    #[test]
    fn test_truncate_unicode_safe() {
        let result = truncate_to_width("你好世界", 5);
        assert!(result.ends_with("..."));
    }
}
