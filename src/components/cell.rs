//! Cell layout helpers
//!
//! Every cell occupies exactly its column's width: one cell of padding, the
//! content fitted to the remaining space, and a right-hand separator.

use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

pub const SEPARATOR: &str = "│";
const ELLIPSIS: char = '…';

pub fn separator_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Pad or clip `line` to exactly `width` display cells
///
/// The line's own alignment wins over `align`. Clipped content ends with an
/// ellipsis.
pub fn fit_line(line: Line<'static>, width: u16, align: Alignment) -> Line<'static> {
    let width = width as usize;
    let alignment = line.alignment.unwrap_or(align);
    let line_style = line.style;
    let content_width = line.width();

    if content_width > width {
        return Line::from(clip_spans(line.spans, width)).style(line_style);
    }

    let gap = width - content_width;
    let (left, right) = match alignment {
        Alignment::Left => (0, gap),
        Alignment::Center => (gap / 2, gap - gap / 2),
        Alignment::Right => (gap, 0),
    };

    let mut spans = Vec::with_capacity(line.spans.len() + 2);
    if left > 0 {
        spans.push(Span::raw(" ".repeat(left)));
    }
    spans.extend(line.spans);
    if right > 0 {
        spans.push(Span::raw(" ".repeat(right)));
    }
    Line::from(spans).style(line_style)
}

fn clip_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Span<'static>> {
    if width == 0 {
        return Vec::new();
    }

    // Leave room for the ellipsis
    let budget = width - 1;
    let mut used = 0;
    let mut clipped = Vec::new();
    let mut last_style = Style::default();

    'outer: for span in spans {
        last_style = span.style;
        let mut text = String::new();
        for ch in span.content.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > budget {
                if !text.is_empty() {
                    clipped.push(Span::styled(text, span.style));
                }
                break 'outer;
            }
            used += w;
            text.push(ch);
        }
        if !text.is_empty() {
            clipped.push(Span::styled(text, span.style));
        }
    }

    let mut tail = String::from(ELLIPSIS);
    // A wide char may have left a hole before the ellipsis
    tail.push_str(&" ".repeat(budget - used));
    clipped.push(Span::styled(tail, last_style));
    clipped
}

/// Collapse text onto one line: control characters become spaces
pub fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Lay out one cell: padding, fitted content, separator
pub fn cell_spans(content: Line<'static>, width: u16, align: Alignment) -> Vec<Span<'static>> {
    if width < 3 {
        return fit_line(content, width, align).spans;
    }
    let mut spans = vec![Span::raw(" ")];
    spans.extend(fit_line(content, width - 2, align).spans);
    spans.push(Span::styled(SEPARATOR, separator_style()));
    spans
}

/// Static header label: centered and bold
pub fn header_label(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
}

/// Title row spanning the whole table
pub fn title_line(title: &str, width: u16) -> Line<'static> {
    let line = Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    fit_line(line, width, Alignment::Center)
}

/// Horizontal rule under the header
pub fn rule_line(width: u16) -> Line<'static> {
    Line::from(Span::styled(
        "─".repeat(width as usize),
        Style::default().fg(Color::DarkGray),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_fit_line_pads_by_alignment() {
        assert_eq!(text(&fit_line(Line::from("ab"), 6, Alignment::Left)), "ab    ");
        assert_eq!(text(&fit_line(Line::from("ab"), 6, Alignment::Right)), "    ab");
        assert_eq!(text(&fit_line(Line::from("ab"), 6, Alignment::Center)), "  ab  ");
    }

    #[test]
    fn test_line_alignment_overrides_column() {
        let line = Line::from("ab").alignment(Alignment::Right);
        assert_eq!(text(&fit_line(line, 4, Alignment::Left)), "  ab");
    }

    #[test]
    fn test_fit_line_clips_with_ellipsis() {
        let fitted = fit_line(Line::from("abcdef"), 4, Alignment::Left);
        assert_eq!(text(&fitted), "abc…");
        assert_eq!(fitted.width(), 4);
    }

    #[test]
    fn test_fit_line_clips_wide_chars() {
        let fitted = fit_line(Line::from("表格表格"), 4, Alignment::Left);
        assert_eq!(fitted.width(), 4);
        assert_eq!(text(&fitted), "表… ");
    }

    #[test]
    fn test_fit_line_zero_width() {
        assert_eq!(fit_line(Line::from("abc"), 0, Alignment::Left).width(), 0);
    }

    #[test]
    fn test_cell_spans_exact_width() {
        let spans = cell_spans(Line::from("x"), 10, Alignment::Left);
        let line = Line::from(spans);
        assert_eq!(line.width(), 10);
        assert_eq!(text(&line), " x       │");

        let narrow = Line::from(cell_spans(Line::from("xyz"), 2, Alignment::Left));
        assert_eq!(narrow.width(), 2);
    }

    #[test]
    fn test_single_line_replaces_control_chars() {
        assert_eq!(single_line("two\nlines\tand\r"), "two lines and ");
        assert_eq!(single_line("plain"), "plain");
    }

    #[test]
    fn test_title_line_centered() {
        let line = title_line("Report", 10);
        assert_eq!(text(&line), "  Report  ");
    }
}
