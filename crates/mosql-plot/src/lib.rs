//! Plot pipeline for directive-annotated queries
//!
//! Turns a result set plus a gnuplot script into an image shown inline in the
//! terminal. The renderer, the rasterizer and the terminal protocol are all
//! traits so tests can run the pipeline without gnuplot or a graphics
//! capable terminal.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mosql_plot::{detect_terminal_graphics, PlotPipeline};
//!
//! let pipeline = PlotPipeline::from_config(&config.plot, detect_terminal_graphics());
//! let summary = pipeline
//!     .render(&db, "select n_name, n_regionkey from nation;", "plot $DATA using 2:xtic(1) with boxes\n", &[], &mut std::io::stdout())
//!     .await?;
//! ```

pub mod data;
pub mod error;
pub mod pipeline;
pub mod raster;
pub mod renderer;
pub mod script;
pub mod terminal;

pub use data::{sanitize_cell, write_data_block};
pub use error::PlotError;
pub use pipeline::{PlotPipeline, PlotSummary};
pub use raster::{RasterImage, Rasterizer, ResvgRasterizer};
pub use renderer::{GnuplotRenderer, PlotRenderer};
pub use script::{assemble_script, PlotSettings};
pub use terminal::{
    detect_terminal_graphics, detect_terminal_graphics_from, ItermGraphics, KittyGraphics,
    NoGraphics, TerminalGraphics,
};
