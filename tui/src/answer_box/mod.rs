//! Multi-question answer box state machine.
//!
//! Core behaviors:
//! - The composer holds the draft for the question on screen; the store owns
//!   saved answers. Every navigation flushes the draft before moving.
//! - Tab/Shift+Tab move between questions, as do Up/Down while the draft is
//!   empty. Movement clamps at both ends; there is no wraparound.
//! - Enter advances; on the last question it opens the submit confirmation
//!   instead. Shift+Enter always reaches the composer and inserts a newline.
//! - Esc or Ctrl+C while editing cancels the whole widget. During
//!   confirmation they only back out to editing.
//! - Exactly one result is ever delivered: a transcript or a cancellation.

mod render;

use std::cell::RefCell;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

use followup_protocol::questions::Question;

use crate::answers::AnswerStore;
use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;
use crate::composer::Composer;
use crate::transcript::build_transcript;

const ANSWER_PLACEHOLDER: &str = "Type your answer";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Editing,
    ConfirmingSubmit,
}

pub struct AnswerBoxView {
    app_event_tx: AppEventSender,
    store: AnswerStore,
    composer: Composer,
    /// Index of the displayed question; always in `0..store.len()`.
    cursor: usize,
    mode: Mode,
    done: bool,
    render_cache: RefCell<Option<render::RenderCache>>,
}

impl AnswerBoxView {
    /// The caller must reject empty extractions before constructing the view;
    /// with no questions there is nothing to render or navigate.
    pub fn new(questions: Vec<Question>, app_event_tx: AppEventSender) -> Self {
        debug_assert!(!questions.is_empty(), "caller rejects empty extractions");
        Self {
            app_event_tx,
            store: AnswerStore::new(questions),
            composer: Composer::new(ANSWER_PLACEHOLDER),
            cursor: 0,
            mode: Mode::Editing,
            done: false,
            render_cache: RefCell::new(None),
        }
    }

    /// True once a result has been delivered; the host drops the view then.
    pub fn is_complete(&self) -> bool {
        self.done
    }

    fn last_index(&self) -> usize {
        self.store.len().saturating_sub(1)
    }

    fn confirming(&self) -> bool {
        matches!(self.mode, Mode::ConfirmingSubmit)
    }

    /// Copy the composer draft into the store slot for the current question.
    fn flush_current_answer(&mut self) {
        let draft = self.composer.text().to_string();
        self.store.set(self.cursor, draft);
    }

    /// Flush, then display `idx`, loading its saved answer into the composer.
    fn move_to(&mut self, idx: usize) {
        self.flush_current_answer();
        self.cursor = idx;
        let saved = self.store.get(idx).to_string();
        self.composer.set_text(&saved);
        self.invalidate();
    }

    /// Every state mutation funnels through here, so no path can forget to
    /// drop the cached frame or schedule a repaint.
    fn invalidate(&mut self) {
        self.render_cache.borrow_mut().take();
        self.app_event_tx.send(AppEvent::RequestRedraw);
    }

    fn cancel(&mut self) {
        self.app_event_tx.send(AppEvent::Cancelled);
        self.done = true;
        self.invalidate();
    }

    fn submit(&mut self) {
        self.flush_current_answer();
        let transcript = build_transcript(&self.store);
        self.app_event_tx.send(AppEvent::AnswersSubmitted(transcript));
        self.done = true;
        self.invalidate();
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.kind == KeyEventKind::Release || self.done {
            return;
        }
        match self.mode {
            Mode::Editing => self.handle_editing_key(key_event),
            Mode::ConfirmingSubmit => self.handle_confirm_key(key_event),
        }
    }

    fn handle_editing_key(&mut self, key_event: KeyEvent) {
        match key_event {
            KeyEvent {
                code: KeyCode::Esc, ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.cancel(),
            KeyEvent {
                code: KeyCode::Tab, ..
            } => {
                if self.cursor < self.last_index() {
                    self.move_to(self.cursor + 1);
                }
            }
            KeyEvent {
                code: KeyCode::BackTab,
                ..
            } => {
                if self.cursor > 0 {
                    self.move_to(self.cursor - 1);
                }
            }
            KeyEvent {
                code: KeyCode::Up, ..
            } if self.composer.is_empty() => {
                if self.cursor > 0 {
                    self.move_to(self.cursor - 1);
                }
            }
            KeyEvent {
                code: KeyCode::Down,
                ..
            } if self.composer.is_empty() => {
                if self.cursor < self.last_index() {
                    self.move_to(self.cursor + 1);
                }
            }
            KeyEvent {
                code: KeyCode::Enter,
                modifiers: KeyModifiers::NONE,
                ..
            } => {
                if self.cursor < self.last_index() {
                    self.move_to(self.cursor + 1);
                } else {
                    self.flush_current_answer();
                    self.mode = Mode::ConfirmingSubmit;
                    self.invalidate();
                }
            }
            // Shift+Enter and everything unrecognized belongs to the
            // composer; its change report is our cache-invalidation hook.
            other => {
                if self.composer.handle_key_event(other) {
                    self.invalidate();
                }
            }
        }
    }

    fn handle_confirm_key(&mut self, key_event: KeyEvent) {
        match key_event {
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
            | KeyEvent {
                code: KeyCode::Esc, ..
            }
            | KeyEvent {
                code: KeyCode::Char('n' | 'N'),
                ..
            } => {
                self.mode = Mode::Editing;
                self.invalidate();
            }
            KeyEvent {
                code: KeyCode::Enter,
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('y' | 'Y'),
                ..
            } => self.submit(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc::unbounded_channel;

    fn test_sender() -> (
        AppEventSender,
        tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    ) {
        let (tx_raw, rx) = unbounded_channel::<AppEvent>();
        (AppEventSender::new(tx_raw), rx)
    }

    fn question(text: &str) -> Question {
        Question {
            question: text.to_string(),
            context: None,
        }
    }

    fn three_question_view() -> (
        AnswerBoxView,
        tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    ) {
        let (tx, rx) = test_sender();
        let view = AnswerBoxView::new(
            vec![question("first"), question("second"), question("third")],
            tx,
        );
        (view, rx)
    }

    fn type_str(view: &mut AnswerBoxView, text: &str) {
        for ch in text.chars() {
            view.handle_key_event(KeyEvent::from(KeyCode::Char(ch)));
        }
    }

    fn last_result(rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>) -> Option<AppEvent> {
        let mut result = None;
        while let Ok(event) = rx.try_recv() {
            if !matches!(event, AppEvent::RequestRedraw) {
                result = Some(event);
            }
        }
        result
    }

    #[test]
    fn initial_state_is_question_zero_editing() {
        let (view, _rx) = three_question_view();
        assert_eq!(view.cursor, 0);
        assert_eq!(view.mode, Mode::Editing);
        assert!(!view.is_complete());
    }

    #[test]
    fn tab_advances_and_clamps_at_the_last_question() {
        let (mut view, _rx) = three_question_view();
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        assert_eq!(view.cursor, 1);
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        assert_eq!(view.cursor, 2);
        assert_eq!(view.mode, Mode::Editing);
    }

    #[test]
    fn back_tab_retreats_and_clamps_at_zero() {
        let (mut view, _rx) = three_question_view();
        view.handle_key_event(KeyEvent::from(KeyCode::BackTab));
        assert_eq!(view.cursor, 0);
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        view.handle_key_event(KeyEvent::from(KeyCode::BackTab));
        assert_eq!(view.cursor, 0);
    }

    #[test]
    fn arrows_navigate_only_while_the_draft_is_empty() {
        let (mut view, _rx) = three_question_view();
        view.handle_key_event(KeyEvent::from(KeyCode::Down));
        assert_eq!(view.cursor, 1);
        type_str(&mut view, "draft");
        view.handle_key_event(KeyEvent::from(KeyCode::Down));
        assert_eq!(view.cursor, 1, "non-empty draft keeps arrows in the editor");
        view.handle_key_event(KeyEvent::from(KeyCode::Up));
        assert_eq!(view.cursor, 1);
    }

    #[test]
    fn enter_on_a_non_last_question_advances_without_confirming() {
        let (mut view, _rx) = three_question_view();
        view.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert_eq!(view.cursor, 1);
        assert_eq!(view.mode, Mode::Editing);
    }

    #[test]
    fn enter_on_the_last_question_opens_confirmation_without_moving() {
        let (mut view, _rx) = three_question_view();
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        view.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert_eq!(view.cursor, 2);
        assert_eq!(view.mode, Mode::ConfirmingSubmit);
        assert!(!view.is_complete());
    }

    #[test]
    fn declining_confirmation_returns_to_editing_with_answers_intact() {
        let (mut view, mut rx) = three_question_view();
        type_str(&mut view, "one");
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        view.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert_eq!(view.mode, Mode::ConfirmingSubmit);

        view.handle_key_event(KeyEvent::from(KeyCode::Char('n')));
        assert_eq!(view.mode, Mode::Editing);
        assert_eq!(view.store.get(0), "one");
        assert_eq!(last_result(&mut rx), None);

        view.handle_key_event(KeyEvent::from(KeyCode::Enter));
        view.handle_key_event(KeyEvent::from(KeyCode::Esc));
        assert_eq!(view.mode, Mode::Editing);
        assert_eq!(last_result(&mut rx), None);
    }

    #[test]
    fn ignored_keys_in_confirmation_change_nothing() {
        let (mut view, _rx) = three_question_view();
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        view.handle_key_event(KeyEvent::from(KeyCode::Enter));
        view.handle_key_event(KeyEvent::from(KeyCode::Char('x')));
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        assert_eq!(view.mode, Mode::ConfirmingSubmit);
        assert_eq!(view.composer.text(), "");
    }

    #[test]
    fn drafts_round_trip_across_navigation() {
        let (mut view, _rx) = three_question_view();
        type_str(&mut view, "first answer");
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        type_str(&mut view, "second answer");
        view.handle_key_event(KeyEvent::from(KeyCode::BackTab));
        assert_eq!(view.composer.text(), "first answer");
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        assert_eq!(view.composer.text(), "second answer");
    }

    #[test]
    fn shift_enter_inserts_a_newline_instead_of_advancing() {
        let (mut view, _rx) = three_question_view();
        type_str(&mut view, "line one");
        view.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        type_str(&mut view, "line two");
        assert_eq!(view.cursor, 0);
        assert_eq!(view.composer.text(), "line one\nline two");
    }

    #[test]
    fn escape_while_editing_cancels_without_a_transcript() {
        let (mut view, mut rx) = three_question_view();
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        type_str(&mut view, "partial");
        view.handle_key_event(KeyEvent::from(KeyCode::Esc));
        assert!(view.is_complete());
        assert_eq!(last_result(&mut rx), Some(AppEvent::Cancelled));
    }

    #[test]
    fn ctrl_c_cancels_like_escape() {
        let (mut view, mut rx) = three_question_view();
        view.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(view.is_complete());
        assert_eq!(last_result(&mut rx), Some(AppEvent::Cancelled));
    }

    #[test]
    fn confirmed_submission_delivers_one_transcript() {
        let (mut view, mut rx) = three_question_view();
        type_str(&mut view, "alpha");
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        type_str(&mut view, "gamma");
        view.handle_key_event(KeyEvent::from(KeyCode::Enter));
        view.handle_key_event(KeyEvent::from(KeyCode::Char('y')));

        assert!(view.is_complete());
        let Some(AppEvent::AnswersSubmitted(transcript)) = last_result(&mut rx) else {
            panic!("expected AnswersSubmitted");
        };
        assert_eq!(
            transcript,
            "Q: first\nA: alpha\n\nQ: second\nA: (no answer)\n\nQ: third\nA: gamma"
        );

        // Further keys are dead after completion.
        view.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert_eq!(last_result(&mut rx), None);
    }

    #[test]
    fn enter_also_accepts_the_confirmation() {
        let (view_tx, mut rx) = test_sender();
        let mut view = AnswerBoxView::new(vec![question("only")], view_tx);
        type_str(&mut view, "yes");
        view.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert_eq!(view.mode, Mode::ConfirmingSubmit);
        view.handle_key_event(KeyEvent::from(KeyCode::Enter));
        assert!(matches!(
            last_result(&mut rx),
            Some(AppEvent::AnswersSubmitted(_))
        ));
    }

    #[test]
    fn every_mutation_schedules_a_repaint() {
        let (mut view, mut rx) = three_question_view();
        view.handle_key_event(KeyEvent::from(KeyCode::Char('a')));
        view.handle_key_event(KeyEvent::from(KeyCode::Tab));
        let mut redraws = 0;
        while let Ok(event) = rx.try_recv() {
            if event == AppEvent::RequestRedraw {
                redraws += 1;
            }
        }
        assert_eq!(redraws, 2);
    }
}
