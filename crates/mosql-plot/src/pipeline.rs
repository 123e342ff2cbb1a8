//! Query-to-terminal plot pipeline
//!
//! ```text
//! query -> $DATA block + defaults + user script -> renderer -> SVG
//!       -> rasterizer -> PNG -> terminal escape sequences
//! ```
//!
//! Each run works in its own temporary directory, removed when the run ends
//! whether it succeeded or not.

use crate::error::PlotError;
use crate::raster::{RasterImage, Rasterizer, ResvgRasterizer};
use crate::renderer::{GnuplotRenderer, PlotRenderer};
use crate::script::{assemble_script, PlotSettings};
use crate::terminal::TerminalGraphics;
use mosql_catalog::Database;
use mosql_core::PlotConfig;
use std::io::Write;
use std::path::PathBuf;

/// Script file name inside the workspace
pub const SCRIPT_FILE: &str = "plot.gp";

/// SVG output file name inside the workspace
pub const SVG_FILE: &str = "plot.svg";

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotSummary {
    /// Data rows written to the script
    pub rows: usize,

    /// Rendered image width in pixels
    pub width: u32,

    /// Rendered image height in pixels
    pub height: u32,

    /// Protocol the image was sent with
    pub protocol: &'static str,
}

/// Runs queries and shows their results as plots
pub struct PlotPipeline {
    renderer: Box<dyn PlotRenderer>,
    rasterizer: Box<dyn Rasterizer>,
    graphics: Box<dyn TerminalGraphics>,
    settings: PlotSettings,
    tmp_dir: PathBuf,
}

impl PlotPipeline {
    /// Create a pipeline from its parts
    pub fn new(
        renderer: Box<dyn PlotRenderer>,
        rasterizer: Box<dyn Rasterizer>,
        graphics: Box<dyn TerminalGraphics>,
    ) -> Self {
        let config = PlotConfig::default();
        Self {
            renderer,
            rasterizer,
            graphics,
            settings: PlotSettings::from(&config),
            tmp_dir: config.tmp_dir,
        }
    }

    /// gnuplot and resvg, configured from `[plot]`
    pub fn from_config(config: &PlotConfig, graphics: Box<dyn TerminalGraphics>) -> Self {
        Self::new(
            Box::new(GnuplotRenderer::new(config.gnuplot.clone())),
            Box::new(ResvgRasterizer::new()),
            graphics,
        )
        .with_settings(PlotSettings::from(config))
        .with_tmp_dir(config.tmp_dir.clone())
    }

    pub fn with_settings(mut self, settings: PlotSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Directory under which per-run workspaces are created
    pub fn with_tmp_dir(mut self, tmp_dir: impl Into<PathBuf>) -> Self {
        self.tmp_dir = tmp_dir.into();
        self
    }

    pub fn graphics(&self) -> &dyn TerminalGraphics {
        self.graphics.as_ref()
    }

    /// Run `sql`, plot the rows with `plot_script` and write the image to `out`
    ///
    /// Nothing is written to `out` unless every stage succeeds.
    pub async fn render(
        &self,
        db: &dyn Database,
        sql: &str,
        plot_script: &str,
        bindings: &[String],
        out: &mut (dyn Write + Send),
    ) -> Result<PlotSummary, PlotError> {
        let rows = db.query(sql, bindings).await?;
        if rows.is_empty() {
            tracing::warn!("plot query returned no rows");
        }

        let workspace = tempfile::Builder::new()
            .prefix("mosql-plot-")
            .tempdir_in(&self.tmp_dir)?;
        let script_path = workspace.path().join(SCRIPT_FILE);
        let svg_path = workspace.path().join(SVG_FILE);

        let script = assemble_script(&rows, &svg_path, plot_script, &self.settings);
        tokio::fs::write(&script_path, script).await?;
        tracing::info!(rows = rows.len(), script = %script_path.display(), "wrote plot script");

        self.renderer.render(&script_path).await?;

        let svg = match tokio::fs::read(&svg_path).await {
            Ok(svg) => svg,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PlotError::MissingOutput(svg_path));
            }
            Err(e) => return Err(e.into()),
        };

        let image = self.rasterizer.rasterize(&svg)?;
        tracing::info!(width = image.width, height = image.height, "rasterized plot");

        // Earlier returns clean up on drop; the image is already in memory
        workspace.close()?;

        self.show(&image, out)?;

        Ok(PlotSummary {
            rows: rows.len(),
            width: image.width,
            height: image.height,
            protocol: self.graphics.name(),
        })
    }

    fn show(&self, image: &RasterImage, out: &mut (dyn Write + Send)) -> Result<(), PlotError> {
        if !self.graphics.available() {
            return Err(PlotError::GraphicsUnavailable);
        }

        // Buffered so a failed encode writes nothing
        let mut buf = Vec::new();
        self.graphics
            .encode(&mut buf, image)
            .map_err(|e| PlotError::EncodeError(e.to_string()))?;
        out.write_all(&buf)?;
        out.flush()?;
        Ok(())
    }
}
