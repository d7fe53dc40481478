use std::io::BufWriter;
use std::path::Path;

use anyhow::Context as _;
use image::ImageEncoder as _;

use crate::foundation::error::{CoverError, CoverResult};
use crate::render::backend::RenderedImage;

/// Flatten `image` over an opaque background and encode it as JPEG at the
/// given quality.
///
/// Deterministic for a fixed input and quality; byte-identity across encoder
/// versions is not promised.
pub fn write_jpeg(
    image: &RenderedImage,
    out_path: &Path,
    quality: u8,
    bg_rgb: [u8; 3],
) -> CoverResult<()> {
    if quality == 0 || quality > 100 {
        return Err(CoverError::validation("jpeg quality must be 1-100"));
    }

    let rgb = flatten_to_rgb8(image, bg_rgb)?;

    let file = std::fs::File::create(out_path)
        .with_context(|| format!("create cover file '{}'", out_path.display()))?;
    let mut writer = BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality);
    encoder
        .write_image(
            &rgb,
            image.width,
            image.height,
            image::ExtendedColorType::Rgb8,
        )
        .with_context(|| format!("encode cover jpeg '{}'", out_path.display()))?;
    Ok(())
}

/// Composite RGBA8 pixels over an opaque `bg` into tightly packed RGB8,
/// honoring the image's alpha convention.
fn flatten_to_rgb8(image: &RenderedImage, bg: [u8; 3]) -> CoverResult<Vec<u8>> {
    let expected = (image.width as usize) * (image.height as usize) * 4;
    if image.data.len() != expected {
        return Err(CoverError::validation(format!(
            "rendered image data length {} does not match {}x{} rgba8",
            image.data.len(),
            image.width,
            image.height
        )));
    }

    let mut out = Vec::with_capacity(expected / 4 * 3);
    for px in image.data.chunks_exact(4) {
        let a = px[3] as u16;
        let inv = 255u16 - a;
        for c in 0..3 {
            let src = px[c] as u16;
            let bgc = bg[c] as u16;
            let v = if image.premultiplied {
                // Premultiplied source: color channels already carry alpha.
                src + mul_div255(bgc, inv)
            } else {
                mul_div255(src, a) + mul_div255(bgc, inv)
            };
            out.push(v.min(255) as u8);
        }
    }
    Ok(out)
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (x * y + 127) / 255
}
