//! SVG rasterization
//!
//! Plots are drawn onto an opaque white canvas since gnuplot's default
//! colors assume a white background.

use crate::error::PlotError;
use resvg::{tiny_skia, usvg};

/// A PNG encoded image and its pixel size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Turns SVG bytes into a raster image
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, svg: &[u8]) -> Result<RasterImage, PlotError>;
}

/// resvg backed rasterizer
///
/// System fonts are loaded once when the rasterizer is created.
pub struct ResvgRasterizer {
    options: usvg::Options<'static>,
}

impl ResvgRasterizer {
    pub fn new() -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        Self { options }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, svg: &[u8]) -> Result<RasterImage, PlotError> {
        let tree = usvg::Tree::from_data(svg, &self.options)
            .map_err(|e| PlotError::InvalidSvg(e.to_string()))?;

        let size = tree.size().to_int_size();
        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
            PlotError::InvalidSvg(format!(
                "cannot allocate a {}x{} canvas",
                size.width(),
                size.height()
            ))
        })?;

        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        let png = pixmap
            .encode_png()
            .map_err(|e| PlotError::EncodeError(e.to_string()))?;

        Ok(RasterImage {
            width: size.width(),
            height: size.height(),
            png,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="30">
<rect x="5" y="5" width="10" height="10" fill="black"/>
</svg>"#;

    #[test]
    fn rasterizes_to_png() {
        let image = ResvgRasterizer::new().rasterize(SQUARE.as_bytes()).unwrap();
        assert_eq!((image.width, image.height), (40, 30));
        assert!(image.png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn garbage_is_invalid_svg() {
        let err = ResvgRasterizer::new().rasterize(b"not an svg").unwrap_err();
        assert!(matches!(err, PlotError::InvalidSvg(_)));
    }
}
