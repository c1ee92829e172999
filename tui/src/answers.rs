//! The ordered question list plus the index-aligned answers saved so far.
//!
//! The store is the single owner of saved answers. The draft for the question
//! currently on screen lives in the composer until it is flushed here, so the
//! slot for the current index is stale mid-edit by design.

use followup_protocol::questions::Question;

pub struct AnswerStore {
    questions: Vec<Question>,
    answers: Vec<String>,
}

impl AnswerStore {
    pub fn new(questions: Vec<Question>) -> Self {
        let answers = vec![String::new(); questions.len()];
        Self { questions, answers }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, idx: usize) -> &Question {
        &self.questions[idx]
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, idx: usize) -> &str {
        &self.answers[idx]
    }

    pub fn set(&mut self, idx: usize, text: String) {
        self.answers[idx] = text;
    }

    /// Whether the saved answer for `idx` is non-empty after trimming.
    pub fn is_answered(&self, idx: usize) -> bool {
        !self.answers[idx].trim().is_empty()
    }

    /// True iff every slot holds a non-whitespace answer.
    pub fn is_complete(&self) -> bool {
        (0..self.len()).all(|idx| self.is_answered(idx))
    }
}
