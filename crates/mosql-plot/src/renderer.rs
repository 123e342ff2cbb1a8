//! External plot renderer
//!
//! The renderer runs a script file that writes an SVG to the path named in
//! its `set output` line.

use crate::error::PlotError;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Runs a plot script to completion
#[async_trait::async_trait]
pub trait PlotRenderer: Send + Sync {
    /// Renderer name for logs
    fn name(&self) -> &str;

    /// Run the script at `script_path`
    async fn render(&self, script_path: &Path) -> Result<(), PlotError>;
}

/// gnuplot, run as a child process
pub struct GnuplotRenderer {
    program: PathBuf,
}

impl GnuplotRenderer {
    /// Use the given executable (looked up on PATH when not absolute)
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for GnuplotRenderer {
    fn default() -> Self {
        Self::new("gnuplot")
    }
}

#[async_trait::async_trait]
impl PlotRenderer for GnuplotRenderer {
    fn name(&self) -> &str {
        "gnuplot"
    }

    async fn render(&self, script_path: &Path) -> Result<(), PlotError> {
        let program = self.program.display().to_string();
        tracing::debug!(%program, script = %script_path.display(), "running renderer");

        let output = Command::new(&self.program)
            .arg(script_path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| PlotError::RendererSpawn {
                program: program.clone(),
                message: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(PlotError::RendererFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        // gnuplot reports warnings on stderr but still exits 0
        if !stderr.is_empty() {
            tracing::warn!(%program, %stderr, "renderer reported warnings");
        }

        Ok(())
    }
}
