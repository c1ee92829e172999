//! Frame rendering for the answer box.
//!
//! The box renders to a sequence of styled lines, each padded to exactly the
//! box width in visible columns; the host paints them wherever it wants. The
//! last frame is memoized per width and every state mutation drops it, so a
//! repaint without a mutation is a cache hit and a resize recomputes.

use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthStr;

use super::AnswerBoxView;
use crate::context_format::context_display_lines;
use crate::line_layout::pad_line_to_width;
use crate::line_layout::truncate_line_to_width;
use crate::line_layout::wrap_styled_line;
use followup_ansi_escape::ansi_escape_line;

/// Wide terminals get a clamped box rather than an ever-wider one.
pub(crate) const MAX_BOX_WIDTH: u16 = 80;
const MIN_BOX_WIDTH: u16 = 20;
/// Columns consumed by `"│ "` and `" │"`.
const BORDER_ALLOWANCE: usize = 4;
const ANSWER_MARKER: &str = "❯ ";
const TIP_SEPARATOR: &str = " | ";

pub(super) struct RenderCache {
    pub(super) width: u16,
    pub(super) lines: Vec<Line<'static>>,
}

impl AnswerBoxView {
    /// Render the full frame for `width`, reusing the memoized copy when the
    /// width matches the one cached at the last state mutation.
    pub fn display_lines(&self, width: u16) -> Vec<Line<'static>> {
        if let Some(cache) = self.render_cache.borrow().as_ref()
            && cache.width == width
        {
            return cache.lines.clone();
        }
        let lines = self.render_frame(width);
        *self.render_cache.borrow_mut() = Some(RenderCache {
            width,
            lines: lines.clone(),
        });
        lines
    }

    pub fn desired_height(&self, width: u16) -> u16 {
        self.display_lines(width).len() as u16
    }

    fn render_frame(&self, width: u16) -> Vec<Line<'static>> {
        let box_width = width.clamp(MIN_BOX_WIDTH, MAX_BOX_WIDTH) as usize;
        let content_width = box_width - BORDER_ALLOWANCE;

        let mut out: Vec<Line<'static>> = Vec::new();
        out.push(horizontal_border('╭', '╮', box_width));

        let title = Line::from(vec![
            "Answer questions ".bold(),
            format!("({}/{})", self.cursor + 1, self.store.len()).dim(),
        ]);
        out.push(boxed(title, content_width));
        out.push(horizontal_border('├', '┤', box_width));

        out.push(boxed(self.progress_line(), content_width));
        out.push(boxed(Line::default(), content_width));

        // Question with its numbered label; context hangs under the text.
        let label = format!("{}. ", self.cursor + 1);
        let label_width = UnicodeWidthStr::width(label.as_str());
        let text_width = content_width.saturating_sub(label_width).max(1);
        let question = self.store.question(self.cursor);
        let mut question_line = ansi_escape_line(&question.question);
        if !self.is_answered_display(self.cursor) {
            question_line = question_line.cyan();
        }
        for (i, line) in wrap_styled_line(&question_line, text_width).into_iter().enumerate() {
            let prefix = if i == 0 {
                Span::from(label.clone()).cyan().bold()
            } else {
                Span::raw(" ".repeat(label_width))
            };
            out.push(boxed(splice_prefix(prefix, line), content_width));
        }
        if let Some(context) = &question.context {
            for line in context_display_lines(context, text_width) {
                let prefix = Span::raw(" ".repeat(label_width));
                out.push(boxed(splice_prefix(prefix, line.dim()), content_width));
            }
        }
        out.push(boxed(Line::default(), content_width));

        // Composer rows: its own top/bottom border decoration is discarded;
        // the first inner row gets the answer marker, the rest align under it.
        let marker_width = UnicodeWidthStr::width(ANSWER_MARKER);
        let editor_width = content_width.saturating_sub(marker_width).max(1) as u16;
        let editor_lines = self.composer.render_lines(editor_width);
        let inner = &editor_lines[1..editor_lines.len() - 1];
        for (i, line) in inner.iter().enumerate() {
            let prefix = if i == 0 {
                Span::from(ANSWER_MARKER).cyan()
            } else {
                Span::raw(" ".repeat(marker_width))
            };
            out.push(boxed(splice_prefix(prefix, line.clone()), content_width));
        }

        out.push(boxed(Line::default(), content_width));
        out.push(horizontal_border('├', '┤', box_width));
        out.push(boxed(self.footer_line(), content_width));
        out.push(horizontal_border('╰', '╯', box_width));
        out
    }

    /// One glyph per question: current highlighted, answered green,
    /// unanswered dim. The current question reflects the live draft, not the
    /// stale store slot.
    fn progress_line(&self) -> Line<'static> {
        let mut spans: Vec<Span<'static>> = Vec::with_capacity(self.store.len() * 2);
        for idx in 0..self.store.len() {
            if idx > 0 {
                spans.push(Span::raw(" "));
            }
            if idx == self.cursor {
                spans.push("●".cyan().bold());
            } else if self.is_answered_display(idx) {
                spans.push("●".green());
            } else {
                spans.push("○".dim());
            }
        }
        Line::from(spans)
    }

    fn is_answered_display(&self, idx: usize) -> bool {
        if idx == self.cursor {
            !self.composer.text().trim().is_empty()
        } else {
            self.store.is_answered(idx)
        }
    }

    fn unanswered_count(&self) -> usize {
        (0..self.store.len())
            .filter(|&idx| !self.is_answered_display(idx))
            .count()
    }

    fn footer_line(&self) -> Line<'static> {
        if self.confirming() {
            let mut spans: Vec<Span<'static>> =
                vec!["Submit all answers? ".cyan().bold(), "(y/n)".dim()];
            let unanswered = self.unanswered_count();
            if unanswered > 0 {
                spans.push(format!("  {unanswered} unanswered").dim());
            }
            Line::from(spans)
        } else {
            let tips = [
                "Tab next",
                "Shift+Tab previous",
                "Enter continue",
                "Shift+Enter newline",
                "Esc cancel",
            ];
            Line::from(tips.join(TIP_SEPARATOR).dim())
        }
    }
}

fn horizontal_border(left: char, right: char, box_width: usize) -> Line<'static> {
    Line::from(format!(
        "{left}{}{right}",
        "─".repeat(box_width.saturating_sub(2))
    ))
    .dim()
}

/// Prepend `prefix` to `line`, folding the line-level style into each span so
/// the result can be flattened into the boxed row.
fn splice_prefix(prefix: Span<'static>, line: Line<'static>) -> Line<'static> {
    let line_style = line.style;
    let mut spans = vec![prefix];
    spans.extend(line.spans.into_iter().map(|span| Span {
        style: line_style.patch(span.style),
        content: span.content,
    }));
    Line::from(spans)
}

/// Truncate and pad `line` to the content width, then wrap it in the side
/// borders so the row is exactly the box width.
fn boxed(line: Line<'static>, content_width: usize) -> Line<'static> {
    let line_style = line.style;
    let line = truncate_line_to_width(line, content_width);
    let line = pad_line_to_width(line, content_width);
    let mut spans: Vec<Span<'static>> = vec!["│ ".dim()];
    spans.extend(line.spans.into_iter().map(|span| Span {
        style: line_style.patch(span.style),
        content: span.content,
    }));
    spans.push(" │".dim());
    Line::from(spans)
}
