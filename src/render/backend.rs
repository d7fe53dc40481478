use crate::foundation::core::Canvas;
use crate::foundation::error::{CoverError, CoverResult};
use crate::scene::model::Scene;

/// A rasterized scene as RGBA8 pixels.
///
/// The `premultiplied` flag makes the alpha convention explicit at API
/// boundaries: the in-process tier produces premultiplied pixels, the CLI
/// tiers produce straight alpha.
#[derive(Clone, Debug)]
pub struct RenderedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// One candidate rasterization engine in the fallback chain.
pub trait RasterBackend {
    /// Stable name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Rasterize `svg` at exactly `canvas` resolution.
    fn render(&self, svg: &[u8], canvas: Canvas) -> CoverResult<RenderedImage>;
}

/// Failure reason captured for one exhausted backend tier.
#[derive(Clone, Debug)]
pub struct TierFailure {
    pub backend: &'static str,
    pub reason: String,
}

/// The default backend chain, in priority order: the in-process rasterizer,
/// then Inkscape (1.x form, then the 0.92 form), then rsvg-convert.
pub fn default_backends() -> Vec<Box<dyn RasterBackend>> {
    vec![
        Box::new(crate::render::resvg::ResvgBackend::new()),
        Box::new(crate::render::cli::InkscapeBackend::modern()),
        Box::new(crate::render::cli::InkscapeBackend::legacy()),
        Box::new(crate::render::cli::RsvgConvertBackend::new()),
    ]
}

/// Rasterize `scene` with the first backend that succeeds.
///
/// The first tier's failure is logged so a missing dependency is visible to
/// operators; later tiers fail silently into the diagnostic list. When every
/// tier is exhausted the collected failures are folded into the error.
pub fn render_with_fallback(
    scene: &Scene,
    backends: &[Box<dyn RasterBackend>],
) -> CoverResult<RenderedImage> {
    match try_backends(scene, backends) {
        Ok(image) => Ok(image),
        Err(failures) => {
            let detail = if failures.is_empty() {
                "backend list is empty".to_owned()
            } else {
                failures
                    .iter()
                    .map(|f| format!("{}: {}", f.backend, f.reason))
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            Err(CoverError::no_renderer_available(detail))
        }
    }
}

/// First-success-wins over `backends`; on total failure returns every tier's
/// failure reason in order.
pub fn try_backends(
    scene: &Scene,
    backends: &[Box<dyn RasterBackend>],
) -> Result<RenderedImage, Vec<TierFailure>> {
    let svg = scene.to_svg();
    let mut failures = Vec::new();
    for (tier, backend) in backends.iter().enumerate() {
        match backend.render(svg.as_bytes(), scene.canvas) {
            Ok(image) => {
                if !scene.canvas.matches(image.width, image.height) {
                    failures.push(TierFailure {
                        backend: backend.name(),
                        reason: format!(
                            "produced {}x{} instead of {}x{}",
                            image.width, image.height, scene.canvas.width, scene.canvas.height
                        ),
                    });
                    continue;
                }
                return Ok(image);
            }
            Err(e) => {
                if tier == 0 {
                    tracing::warn!("{} render failed, trying fallbacks: {e}", backend.name());
                }
                failures.push(TierFailure {
                    backend: backend.name(),
                    reason: e.to_string(),
                });
            }
        }
    }
    Err(failures)
}
