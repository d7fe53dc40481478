use base64::Engine as _;

use crate::assets::palette::Palette;
use crate::foundation::core::Canvas;
use crate::layout::metrics::TextMetrics;
use crate::scene::model::{EmbeddedArt, Scene};

/// Assemble a scene from already-prepared parts.
///
/// Optional parts degrade gracefully: no art means no art element, an empty
/// badge means no badge plate, empty line sets omit their text element.
pub fn compose(
    canvas: Canvas,
    palette: Palette,
    art: Option<EmbeddedArt>,
    title_lines: Vec<String>,
    subtitle_lines: Vec<String>,
    badge: &str,
    metrics: TextMetrics,
) -> Scene {
    let badge = badge.trim();
    Scene {
        canvas,
        palette,
        art,
        title_lines,
        subtitle_lines,
        badge: (!badge.is_empty()).then(|| badge.to_owned()),
        metrics,
    }
}

// Art placement within the 3000-unit canvas.
const ART_X: u32 = 350;
const ART_Y: u32 = 500;
const ART_WIDTH: u32 = 2300;
const ART_HEIGHT: u32 = 1500;

const TEXT_X: u32 = 150;
const BADGE_Y: u32 = 200;
const BADGE_WIDTH: u32 = 1200;
const BADGE_HEIGHT: u32 = 150;

impl Scene {
    /// Serialize the scene to SVG markup.
    ///
    /// The markup is self-contained: art is inlined as a base64 data URI and
    /// all text is XML-escaped. Styling uses presentation attributes rather
    /// than a stylesheet so every rasterizer tier reads it the same way.
    pub fn to_svg(&self) -> String {
        let c = self.canvas;
        let p = &self.palette;
        let m = &self.metrics;

        let mut svg = format!(
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="bggrad" x1="0" y1="0" x2="0" y2="1">
      <stop offset="0%" stop-color="{bg1}"/>
      <stop offset="100%" stop-color="{bg2}"/>
    </linearGradient>
  </defs>

  <rect x="0" y="0" width="{w}" height="{h}" fill="url(#bggrad)"/>
"#,
            w = c.width,
            h = c.height,
            bg1 = xml_escape(&p.background_start),
            bg2 = xml_escape(&p.background_end),
        );

        if let Some(art) = &self.art {
            let b64 = base64::engine::general_purpose::STANDARD.encode(&art.bytes);
            svg.push_str(&format!(
                "  <image x=\"{ART_X}\" y=\"{ART_Y}\" width=\"{ART_WIDTH}\" height=\"{ART_HEIGHT}\"\n         \
                 preserveAspectRatio=\"xMidYMid meet\"\n         \
                 href=\"data:{};base64,{b64}\" opacity=\"0.96\"/>\n",
                art.mime
            ));
        }

        svg.push_str(&format!(
            "  <g transform=\"translate({TEXT_X}, {})\">\n",
            m.text_base_y
        ));
        if !self.title_lines.is_empty() {
            svg.push_str(&format!(
                "    <text font-size=\"{}\" font-family=\"sans-serif\" font-weight=\"700\" fill=\"{}\">\n",
                m.title_size,
                xml_escape(&p.title_color)
            ));
            push_tspans(&mut svg, &self.title_lines, m.title_line_dy);
            svg.push_str("    </text>\n");
        }
        if !self.subtitle_lines.is_empty() {
            svg.push_str(&format!(
                "    <text y=\"{}\" font-size=\"{}\" font-family=\"sans-serif\" fill=\"{}\" opacity=\"0.92\">\n",
                m.subtitle_offset_y,
                m.subtitle_size,
                xml_escape(&p.subtitle_color)
            ));
            push_tspans(&mut svg, &self.subtitle_lines, m.subtitle_line_dy);
            svg.push_str("    </text>\n");
        }
        svg.push_str("  </g>\n");

        if let Some(badge) = &self.badge {
            svg.push_str(&format!(
                "  <g transform=\"translate({TEXT_X}, {BADGE_Y})\">\n    \
                 <rect x=\"0\" y=\"0\" width=\"{BADGE_WIDTH}\" height=\"{BADGE_HEIGHT}\" rx=\"20\" fill=\"{}\" opacity=\"0.9\"/>\n    \
                 <text x=\"40\" y=\"100\" font-size=\"{}\" font-family=\"sans-serif\" font-weight=\"700\" fill=\"{}\">{}</text>\n  </g>\n",
                xml_escape(&p.badge_background),
                m.badge_size,
                xml_escape(&p.badge_text_color),
                xml_escape(badge),
            ));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn push_tspans(svg: &mut String, lines: &[String], line_dy: u32) {
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 { 0 } else { line_dy };
        svg.push_str(&format!(
            "      <tspan x=\"0\" dy=\"{dy}\">{}</tspan>\n",
            xml_escape(line)
        ));
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::COVER_CANVAS;
    use crate::layout::metrics::compute_metrics;

    fn scene_with(
        art: Option<EmbeddedArt>,
        title: &[&str],
        subtitle: &[&str],
        badge: &str,
    ) -> Scene {
        let title_lines: Vec<String> = title.iter().map(|s| s.to_string()).collect();
        let subtitle_lines: Vec<String> = subtitle.iter().map(|s| s.to_string()).collect();
        let metrics =
            compute_metrics(title_lines.len().max(1), subtitle_lines.len(), COVER_CANVAS).unwrap();
        compose(
            COVER_CANVAS,
            Palette::warm(),
            art,
            title_lines,
            subtitle_lines,
            badge,
            metrics,
        )
    }

    #[test]
    fn optional_elements_are_omitted_entirely() {
        let svg = scene_with(None, &["Title"], &[], "").to_svg();
        assert!(!svg.contains("<image"));
        // Only the title text element is present.
        assert_eq!(svg.matches("<text").count(), 1);
        assert!(!svg.contains("opacity=\"0.92\""));
        assert!(!svg.contains("rx=\"20\""));
    }

    #[test]
    fn badge_and_subtitle_render_when_present() {
        let svg = scene_with(None, &["Title"], &["sub"], "3 voices").to_svg();
        assert_eq!(svg.matches("<text").count(), 3);
        assert!(svg.contains("rx=\"20\""));
        assert!(svg.contains(">3 voices</text>"));
    }

    #[test]
    fn art_is_embedded_as_a_data_uri() {
        let art = EmbeddedArt {
            mime: "image/png",
            bytes: vec![1, 2, 3],
        };
        let svg = scene_with(Some(art), &["Title"], &[], "").to_svg();
        assert!(svg.contains("href=\"data:image/png;base64,"));
        assert!(svg.contains("preserveAspectRatio=\"xMidYMid meet\""));
    }

    #[test]
    fn text_is_xml_escaped() {
        let svg = scene_with(None, &["Tom & Jerry <3"], &[], "\"quoted\"").to_svg();
        assert!(svg.contains("Tom &amp; Jerry &lt;3"));
        assert!(svg.contains("&quot;quoted&quot;"));
        assert!(!svg.contains("Tom & Jerry"));
    }

    #[test]
    fn single_line_title_uses_the_larger_size() {
        let svg = scene_with(None, &["Title"], &[], "").to_svg();
        assert!(svg.contains("font-size=\"140\""));

        let svg = scene_with(None, &["line one", "line two"], &[], "").to_svg();
        assert!(svg.contains("font-size=\"120\""));
    }

    #[test]
    fn later_lines_carry_the_line_advance() {
        let scene = scene_with(None, &["one", "two"], &["sub one", "sub two"], "");
        let svg = scene.to_svg();
        assert!(svg.contains("<tspan x=\"0\" dy=\"0\">one</tspan>"));
        assert!(svg.contains(&format!(
            "<tspan x=\"0\" dy=\"{}\">two</tspan>",
            scene.metrics.title_line_dy
        )));
        assert!(svg.contains(&format!(
            "<tspan x=\"0\" dy=\"{}\">sub two</tspan>",
            scene.metrics.subtitle_line_dy
        )));
    }

    #[test]
    fn markup_parses_as_svg() {
        let art = EmbeddedArt {
            mime: "image/png",
            bytes: encode_test_png(),
        };
        let svg = scene_with(Some(art), &["A Title"], &["A subtitle"], "3 voices").to_svg();
        let tree = usvg::Tree::from_data(svg.as_bytes(), &usvg::Options::default()).unwrap();
        assert_eq!(tree.size().width(), COVER_CANVAS.width as f32);
        assert_eq!(tree.size().height(), COVER_CANVAS.height as f32);
    }

    fn encode_test_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(
                &mut std::io::Cursor::new(&mut buf),
                image::ImageFormat::Png,
            )
            .unwrap();
        buf
    }
}
