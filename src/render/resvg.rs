use crate::foundation::core::Canvas;
use crate::foundation::error::{CoverError, CoverResult};
use crate::render::backend::{RasterBackend, RenderedImage};

/// In-process rasterizer tier: usvg parsing + tiny-skia rendering.
///
/// No subprocess, no temp files; the preferred first tier of the chain.
pub struct ResvgBackend;

impl ResvgBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResvgBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterBackend for ResvgBackend {
    fn name(&self) -> &'static str {
        "resvg"
    }

    fn render(&self, svg: &[u8], canvas: Canvas) -> CoverResult<RenderedImage> {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        let opts = usvg::Options {
            fontdb: std::sync::Arc::new(fontdb),
            ..usvg::Options::default()
        };

        let tree = usvg::Tree::from_data(svg, &opts)
            .map_err(|e| CoverError::validation(format!("parse scene svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
            .ok_or_else(|| CoverError::validation("failed to allocate scene pixmap"))?;

        let sx = (canvas.width as f32) / tree.size().width();
        let sy = (canvas.height as f32) / tree.size().height();
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(sx, sy),
            &mut pixmap.as_mut(),
        );

        Ok(RenderedImage {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data().to_vec(),
            premultiplied: true,
        })
    }
}
