//! Visible-width helpers for styled lines.
//!
//! Shared by the box renderer and the context formatter so neither reinvents
//! width math. All measurement uses `unicode-width` over span contents;
//! strings that carried ANSI escapes must be converted through
//! `followup_ansi_escape::ansi_escape_line` first, so escape bytes never
//! reach these functions.

use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use std::ops::Range;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

pub(crate) fn line_width(line: &Line<'_>) -> usize {
    line.iter()
        .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
        .sum()
}

/// Truncate a styled line to `max_width` visible columns, never splitting a
/// wide grapheme across the boundary.
pub(crate) fn truncate_line_to_width(line: Line<'static>, max_width: usize) -> Line<'static> {
    if max_width == 0 {
        return Line::from(Vec::<Span<'static>>::new());
    }
    if line_width(&line) <= max_width {
        return line;
    }

    let Line {
        style,
        alignment,
        spans,
    } = line;
    let mut used = 0usize;
    let mut spans_out: Vec<Span<'static>> = Vec::with_capacity(spans.len());

    for span in spans {
        let text = span.content.into_owned();
        let span_style = span.style;
        let span_width = UnicodeWidthStr::width(text.as_str());

        if span_width == 0 {
            spans_out.push(Span::styled(text, span_style));
            continue;
        }
        if used >= max_width {
            break;
        }
        if used + span_width <= max_width {
            used += span_width;
            spans_out.push(Span::styled(text, span_style));
            continue;
        }

        let mut end_idx = 0usize;
        for (idx, ch) in text.char_indices() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if used + ch_width > max_width {
                break;
            }
            end_idx = idx + ch.len_utf8();
            used += ch_width;
        }
        if end_idx > 0 {
            spans_out.push(Span::styled(text[..end_idx].to_string(), span_style));
        }
        break;
    }

    Line {
        style,
        alignment,
        spans: spans_out,
    }
}

/// Right-pad a line with spaces to exactly `width` visible columns.
pub(crate) fn pad_line_to_width(mut line: Line<'static>, width: usize) -> Line<'static> {
    let used = line_width(&line);
    if used < width {
        line.spans.push(Span::raw(" ".repeat(width - used)));
    }
    line
}

/// Greedy word wrap of a styled line to `width` visible columns, preserving
/// each span's style across wrap points. Over-long words are hard-split.
///
/// The spans are flattened, the flat text is wrapped with `textwrap`, and the
/// wrapped byte ranges are intersected with the original span ranges to
/// rebuild styled output.
pub(crate) fn wrap_styled_line(line: &Line<'_>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);

    let mut flat = String::new();
    let mut bounds: Vec<(Range<usize>, Style)> = Vec::with_capacity(line.spans.len());
    for span in &line.spans {
        let start = flat.len();
        flat.push_str(span.content.as_ref());
        bounds.push((start..flat.len(), span.style));
    }
    if flat.trim().is_empty() {
        return vec![Line::default().style(line.style)];
    }

    let mut out: Vec<Line<'static>> = Vec::new();
    let mut cursor = 0usize;
    for piece in textwrap::wrap(&flat, width) {
        let piece = piece.as_ref();
        if piece.is_empty() {
            out.push(Line::default().style(line.style));
            continue;
        }
        // Wrapped pieces are in-order substrings of the flat text separated
        // only by whitespace, so the first occurrence at or after the cursor
        // is the right one.
        let Some(offset) = flat[cursor..].find(piece) else {
            out.push(Line::from(piece.to_string()).style(line.style));
            continue;
        };
        let start = cursor + offset;
        let end = start + piece.len();
        cursor = end;

        let mut spans: Vec<Span<'static>> = Vec::new();
        for (range, style) in &bounds {
            let s = range.start.max(start);
            let e = range.end.min(end);
            if s < e {
                spans.push(Span::styled(flat[s..e].to_string(), *style));
            }
        }
        out.push(Line::from(spans).style(line.style));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::style::Stylize;

    fn plain_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn wrap_respects_width_and_preserves_styles() {
        let line = Line::from(vec!["alpha beta ".red(), "gamma delta".blue()]);
        let wrapped = wrap_styled_line(&line, 11);
        for l in &wrapped {
            assert!(line_width(l) <= 11, "line too wide: {:?}", plain_text(l));
        }
        let joined: Vec<String> = wrapped.iter().map(plain_text).collect();
        assert_eq!(joined, vec!["alpha beta", "gamma delta"]);
        // The second line came entirely from the blue span.
        assert!(
            wrapped[1]
                .spans
                .iter()
                .all(|s| s.style == ratatui::style::Style::default().blue())
        );
    }

    #[test]
    fn wrap_splits_styles_mid_word_boundaries() {
        let line = Line::from(vec!["data".red(), "base engine".blue()]);
        let wrapped = wrap_styled_line(&line, 8);
        assert_eq!(plain_text(&wrapped[0]), "database");
        assert_eq!(wrapped[0].spans.len(), 2);
    }

    #[test]
    fn wrap_hard_splits_an_overlong_word() {
        let line = Line::from("abcdefghij");
        let wrapped = wrap_styled_line(&line, 4);
        let joined: String = wrapped.iter().map(plain_text).collect();
        assert_eq!(joined, "abcdefghij");
        for l in &wrapped {
            assert!(line_width(l) <= 4);
        }
    }

    #[test]
    fn wrap_of_blank_input_is_one_empty_line() {
        let wrapped = wrap_styled_line(&Line::from("   "), 10);
        assert_eq!(wrapped.len(), 1);
        assert_eq!(plain_text(&wrapped[0]), "");
    }

    #[test]
    fn truncate_is_noop_when_it_fits() {
        let line = Line::from("short");
        assert_eq!(
            plain_text(&truncate_line_to_width(line, 10)),
            "short".to_string()
        );
    }

    #[test]
    fn truncate_cuts_at_visible_width() {
        let line = Line::from(vec!["abc".red(), "defg".blue()]);
        let truncated = truncate_line_to_width(line, 5);
        assert_eq!(plain_text(&truncated), "abcde");
    }

    #[test]
    fn truncate_does_not_split_wide_chars() {
        // Each CJK char is two columns; width 3 fits only one.
        let line = Line::from("你好");
        let truncated = truncate_line_to_width(line, 3);
        assert_eq!(plain_text(&truncated), "你");
    }

    #[test]
    fn pad_fills_to_exact_width() {
        let padded = pad_line_to_width(Line::from("ab"), 5);
        assert_eq!(line_width(&padded), 5);
        assert_eq!(plain_text(&padded), "ab   ");
    }
}
