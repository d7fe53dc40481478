use storycover::render::resvg::ResvgBackend;
use storycover::scene::compose::compose;
use storycover::{
    Canvas, EmbeddedArt, Palette, RasterBackend as _, Scene, TextMetrics, render_with_fallback,
};

/// Metrics scaled down for a small test canvas; the production table targets
/// the 3000-unit canvas and would overflow here.
fn small_metrics() -> TextMetrics {
    TextMetrics {
        title_size: 14,
        subtitle_size: 8,
        badge_size: 6,
        text_base_y: 150,
        title_line_dy: 15,
        subtitle_line_dy: 10,
        subtitle_offset_y: 16,
    }
}

fn small_scene(canvas: Canvas) -> Scene {
    let art_png = {
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([200, 120, 40, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    };
    compose(
        canvas,
        Palette::forest(),
        Some(EmbeddedArt {
            mime: "image/png",
            bytes: art_png,
        }),
        vec!["A Story".to_owned()],
        vec!["with a subtitle".to_owned()],
        "badge",
        small_metrics(),
    )
}

#[test]
fn in_process_tier_renders_at_scene_resolution() {
    let canvas = Canvas::square(200);
    let scene = small_scene(canvas);

    let image = ResvgBackend::new()
        .render(scene.to_svg().as_bytes(), canvas)
        .unwrap();
    assert_eq!((image.width, image.height), (200, 200));
    assert!(image.premultiplied);
}

#[test]
fn rendering_the_same_scene_twice_matches_dimensions() {
    let canvas = Canvas::square(120);
    let scene = small_scene(canvas);
    let backend = ResvgBackend::new();

    let first = backend.render(scene.to_svg().as_bytes(), canvas).unwrap();
    let second = backend.render(scene.to_svg().as_bytes(), canvas).unwrap();
    assert_eq!((first.width, first.height), (second.width, second.height));
    assert_eq!(first.data.len(), second.data.len());
}

#[test]
fn fallback_chain_prefers_the_in_process_tier() {
    let canvas = Canvas::square(64);
    let scene = small_scene(canvas);

    // The first tier is in-process, so the chain succeeds without any of the
    // CLI renderers being installed.
    let image = render_with_fallback(&scene, &storycover::default_backends()).unwrap();
    assert_eq!((image.width, image.height), (64, 64));
}
