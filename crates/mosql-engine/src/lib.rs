//! mosql engine - query buffer dispatch
//!
//! This crate ties the other crates together:
//! - Classifying directive buffers and choosing an execution path
//! - Synthesizing SQL from natural-language requests
//! - Sending plot buffers through the plot pipeline

pub mod dispatcher;
pub mod error;
pub mod text2sql;

pub use dispatcher::{Dispatcher, Outcome};
pub use error::EngineError;
pub use text2sql::Synthesizer;
