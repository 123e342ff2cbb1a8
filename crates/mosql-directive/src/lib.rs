//! Directive handling for mosql query buffers
//!
//! This crate provides:
//! - Line-by-line classification into plot script, natural-language request and SQL
//! - The `should_hijack` pre-check used by the dispatcher
//! - Named query templates for `--!text2sql <key>`

pub mod classifier;
pub mod templates;

pub use classifier::{
    classify, should_hijack, ClassifiedQuery, Mode, COMMENT_MARKER, NL_DIRECTIVE,
    PLOT_DIRECTIVE, SQL_DIRECTIVE,
};
pub use templates::{lookup_template, templates, QueryTemplate};
