//! Conversion of text that may contain raw ANSI escape sequences into styled
//! [`ratatui`] values.
//!
//! Question context arrives from a model and may carry SGR color codes.
//! Downstream width math (wrapping, truncation, padding) measures span
//! contents with `unicode-width`, so escape bytes must be folded into span
//! styles before any measurement happens. Every externally sourced string
//! passes through here exactly once.

use ansi_to_tui::IntoText;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::text::Text;
use tracing::error;

/// Parse `s` into a [`Text`], honoring any embedded ANSI escape sequences.
/// On a malformed escape the raw string is returned unstyled.
pub fn ansi_escape(s: &str) -> Text<'static> {
    match s.into_text() {
        Ok(text) => text,
        Err(err) => {
            error!("failed to parse ANSI escapes: {err} in {s:?}");
            Text::from(Span::raw(s.to_string()))
        }
    }
}

/// Parse `s` into a single styled [`Line`].
///
/// Inputs are expected to be logical single lines; if the string contains
/// newlines the parsed lines are joined with a single space so the caller
/// still gets one measurable line.
pub fn ansi_escape_line(s: &str) -> Line<'static> {
    let text = ansi_escape(s);
    let mut lines = text.lines.into_iter();
    let Some(mut first) = lines.next() else {
        return Line::default();
    };
    for line in lines {
        first.spans.push(Span::raw(" "));
        first.spans.extend(line.spans);
    }
    first
}
