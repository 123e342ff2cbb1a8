//! Plot pipeline errors

use mosql_catalog::DbError;
use std::path::PathBuf;

/// Errors that can occur while producing a plot
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("Plot query failed: {0}")]
    QueryError(#[from] DbError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to start renderer `{program}`: {message}")]
    RendererSpawn { program: String, message: String },

    #[error("Renderer exited with {status}: {stderr}")]
    RendererFailed { status: String, stderr: String },

    #[error("Renderer produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("Invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("graphics not available")]
    GraphicsUnavailable,

    #[error("Image encode error: {0}")]
    EncodeError(String),
}
