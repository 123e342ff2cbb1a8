//! Dispatcher errors

use mosql_catalog::DbError;
use mosql_plot::PlotError;
use mosql_prompt::{LlmError, PromptError};

/// Anything that can stop a query buffer from being handled
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("model reply contained no SQL")]
    EmptySynthesis,
}
