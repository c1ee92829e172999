//! Choice-list detection and reflow for question context.
//!
//! Context is free text from the extractor. When it embeds two or more
//! parenthesized labels — `(a) MySQL, (b) PostgreSQL` — it is treated as a
//! choice list and split into discrete lines; otherwise it stays one prose
//! block. Both the on-screen form and the transcript form consume the same
//! segment sequence so the two renderings cannot drift.
//!
//! The detection is a heuristic: two unrelated parenthetical remarks will
//! also split. That matches the upstream behavior and is accepted as-is.

use lazy_static::lazy_static;
use ratatui::text::Line;
use ratatui::text::Span;
use regex_lite::Regex;

use crate::line_layout::wrap_styled_line;
use followup_ansi_escape::ansi_escape_line;

lazy_static! {
    /// A choice label: a single lowercase letter or an integer in
    /// parentheses, followed by whitespace, preceded by start-of-string, a
    /// comma, or whitespace. The leading separator is part of the match, so
    /// match offsets point at the text that belongs to the previous segment's
    /// end.
    static ref CHOICE_LABEL: Regex =
        Regex::new(r"(?:^|[,\s])\((?:[a-z]|[0-9]+)\)\s").unwrap_or_else(|_| std::process::abort());
}

/// Indent applied to each choice line in the display form.
const CHOICE_INDENT: &str = "  ";
/// Quote marker for transcript context lines.
const QUOTE_MARKER: &str = "> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextSegment {
    /// Plain prose: either the whole context, or the text before the first
    /// choice label.
    Prose(String),
    /// One choice, starting at its parenthesized label.
    Choice(String),
}

/// Tokenize a context string into prose and choice segments.
///
/// Fewer than two label matches means the string is prose; with two or more,
/// each choice spans from its label to the next label (or the end), with
/// leading comma/whitespace and trailing whitespace stripped.
pub fn segment_context(context: &str) -> Vec<ContextSegment> {
    let starts: Vec<usize> = CHOICE_LABEL.find_iter(context).map(|m| m.start()).collect();
    if starts.len() < 2 {
        return vec![ContextSegment::Prose(context.trim().to_string())];
    }

    let mut segments = Vec::new();
    let prefix = context[..starts[0]].trim();
    if !prefix.is_empty() {
        segments.push(ContextSegment::Prose(prefix.to_string()));
    }
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(context.len());
        let choice = context[start..end]
            .trim_start_matches(|c: char| c == ',' || c.is_whitespace())
            .trim_end();
        segments.push(ContextSegment::Choice(choice.to_string()));
    }
    segments
}

/// Display form: wrapped styled lines for rendering inside the box. A prose
/// prefix ahead of a choice list is followed by one blank separator line;
/// choices are indented two columns. Embedded ANSI escapes are folded into
/// styles before wrapping, so they never count toward visible width.
pub fn context_display_lines(context: &str, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let segments = segment_context(context);
    let has_choices = segments
        .iter()
        .any(|s| matches!(s, ContextSegment::Choice(_)));

    let mut out: Vec<Line<'static>> = Vec::new();
    for segment in &segments {
        match segment {
            ContextSegment::Prose(text) => {
                out.extend(wrap_styled_line(&ansi_escape_line(text), width));
                if has_choices {
                    out.push(Line::default());
                }
            }
            ContextSegment::Choice(text) => {
                let indent = CHOICE_INDENT.len();
                for line in wrap_styled_line(&ansi_escape_line(text), width.saturating_sub(indent))
                {
                    let mut spans = vec![Span::raw(CHOICE_INDENT)];
                    spans.extend(line.spans);
                    out.push(Line::from(spans));
                }
            }
        }
    }
    out
}

/// Transcript form: quote-marked lines for the final answer text. Choices
/// get an extra indent under the marker. Not width-wrapped — the transcript
/// is re-injected into a conversation, not drawn.
pub fn context_transcript_lines(context: &str) -> Vec<String> {
    segment_context(context)
        .into_iter()
        .map(|segment| match segment {
            ContextSegment::Prose(text) => format!("{QUOTE_MARKER}{text}"),
            ContextSegment::Choice(text) => format!("{QUOTE_MARKER}  {text}"),
        })
        .collect()
}
