//! Data contract between the question extractor and the answering widget.
//!
//! The extractor is an LLM call made by the host before the widget is
//! constructed; this crate only defines the shapes it must produce and the
//! parsing of its raw output.

pub mod questions;
