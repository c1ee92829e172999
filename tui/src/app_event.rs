//! Application-level events used to coordinate UI actions.
//!
//! `AppEvent` is the message bus between the answer box and the host terminal
//! loop. The widget emits events to request actions the host must perform
//! (repainting, tearing down the terminal and delivering the result) without
//! direct access to the host's internals.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Ask the host to repaint on the next frame. Sent after every state
    /// mutation; the host decides when to actually draw.
    RequestRedraw,

    /// The user confirmed submission. Carries the consolidated transcript;
    /// sent at most once per widget lifetime.
    AnswersSubmitted(String),

    /// The user dismissed the widget without submitting. Also sent at most
    /// once, and never after `AnswersSubmitted`.
    Cancelled,
}
