//! Assembly of the consolidated transcript returned to the conversation.

use crate::answers::AnswerStore;
use crate::context_format::context_transcript_lines;

/// Rendered in place of an answer the user left blank. Submission is never
/// blocked on unanswered questions.
pub const NO_ANSWER_PLACEHOLDER: &str = "(no answer)";

/// Build the final transcript: each question in order as `Q:`, its quoted
/// context when present, the trimmed answer as `A:` (or the placeholder),
/// and a blank separator line.
pub fn build_transcript(store: &AnswerStore) -> String {
    let mut lines: Vec<String> = Vec::new();
    for (idx, question) in store.questions().iter().enumerate() {
        lines.push(format!("Q: {}", question.question));
        if let Some(context) = &question.context {
            lines.extend(context_transcript_lines(context));
        }
        let answer = store.get(idx).trim();
        if answer.is_empty() {
            lines.push(format!("A: {NO_ANSWER_PLACEHOLDER}"));
        } else {
            lines.push(format!("A: {answer}"));
        }
        lines.push(String::new());
    }
    lines.join("\n").trim_end().to_string()
}
