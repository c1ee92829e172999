//! Interactive multi-question answering widget for the terminal.
//!
//! Given the questions an assistant asked in its last turn (extracted
//! upstream into [`followup_protocol::questions::ExtractedQuestions`]), the
//! widget draws one bordered, width-adaptive box showing a progress row, the
//! current question with its formatted context, an embedded multi-line
//! composer, and a footer. The user moves between questions, answers in any
//! order, confirms on the last question, and the widget hands back one
//! consolidated transcript — or a cancellation — through the app event
//! channel.
//!
//! The host owns the terminal: it feeds key events into
//! [`AnswerBoxView::handle_key_event`] and repaints
//! [`AnswerBoxView::display_lines`] when asked via
//! [`AppEvent::RequestRedraw`]. Rendering is requested, never pushed.

pub mod answer_box;
pub mod answers;
mod app_event;
mod app_event_sender;
pub mod composer;
pub mod context_format;
mod line_layout;
pub mod transcript;

pub use answer_box::AnswerBoxView;
pub use app_event::AppEvent;
pub use app_event_sender::AppEventSender;
