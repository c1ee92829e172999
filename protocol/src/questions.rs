use serde::Deserialize;
use serde::Serialize;

/// One question pulled out of a prior assistant turn. `context` is free text
/// that may encode a multiple-choice list; the widget decides how to present
/// it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Question {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// The extractor's full output: an ordered list of questions.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ExtractedQuestions {
    pub questions: Vec<Question>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("extractor output is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("extractor returned no questions")]
    NoQuestions,
}

/// Parse the extractor's raw output.
///
/// Models frequently wrap JSON in a markdown code fence even when told not
/// to, so one outer fence (with or without an info string) is stripped before
/// parsing. An empty `questions` array is an error: the caller must surface
/// "no questions found" instead of constructing the widget.
pub fn parse_extracted_questions(raw: &str) -> Result<ExtractedQuestions, ExtractError> {
    let parsed: ExtractedQuestions = serde_json::from_str(strip_code_fence(raw))?;
    if parsed.questions.is_empty() {
        return Err(ExtractError::NoQuestions);
    }
    Ok(parsed)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the opening fence's info string ("json") when present. A first
    // line containing anything but an identifier is content, not an info
    // string.
    match body.split_once('\n') {
        Some((info, after)) if info.trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            after.trim()
        }
        _ => body.trim(),
    }
}
