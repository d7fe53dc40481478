use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::core::Canvas;
use crate::foundation::error::{CoverError, CoverResult};
use crate::foundation::tempfile::{TempFileGuard, temp_path};
use crate::render::backend::{RasterBackend, RenderedImage};

/// Invocation forms of the Inkscape CLI.
///
/// Inkscape 1.x replaced the 0.92 export flags with an incompatible set, so
/// the two forms are separate tiers of the fallback chain.
#[derive(Clone, Copy, Debug)]
enum InkscapeForm {
    Modern,
    Legacy,
}

/// Subprocess tier backed by the Inkscape CLI.
pub struct InkscapeBackend {
    program: PathBuf,
    form: InkscapeForm,
}

impl InkscapeBackend {
    /// Inkscape 1.x invocation (`--export-type`/`--export-filename`).
    pub fn modern() -> Self {
        Self {
            program: PathBuf::from("inkscape"),
            form: InkscapeForm::Modern,
        }
    }

    /// Inkscape 0.92 invocation (`--export-png`).
    pub fn legacy() -> Self {
        Self {
            program: PathBuf::from("inkscape"),
            form: InkscapeForm::Legacy,
        }
    }
}

impl RasterBackend for InkscapeBackend {
    fn name(&self) -> &'static str {
        match self.form {
            InkscapeForm::Modern => "inkscape",
            InkscapeForm::Legacy => "inkscape-legacy",
        }
    }

    fn render(&self, svg: &[u8], canvas: Canvas) -> CoverResult<RenderedImage> {
        let args = |svg_path: &Path, out_path: &Path| -> Vec<OsString> {
            match self.form {
                InkscapeForm::Modern => vec![
                    svg_path.into(),
                    "--export-type=png".into(),
                    {
                        let mut a = OsString::from("--export-filename=");
                        a.push(out_path);
                        a
                    },
                    format!("--export-width={}", canvas.width).into(),
                    format!("--export-height={}", canvas.height).into(),
                ],
                InkscapeForm::Legacy => vec![
                    svg_path.into(),
                    {
                        let mut a = OsString::from("--export-png=");
                        a.push(out_path);
                        a
                    },
                    "-w".into(),
                    canvas.width.to_string().into(),
                    "-h".into(),
                    canvas.height.to_string().into(),
                ],
            }
        };
        run_cli_renderer(&self.program, self.name(), svg, canvas, args)
    }
}

/// Subprocess tier backed by `rsvg-convert` (librsvg).
pub struct RsvgConvertBackend {
    program: PathBuf,
}

impl RsvgConvertBackend {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("rsvg-convert"),
        }
    }
}

impl Default for RsvgConvertBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterBackend for RsvgConvertBackend {
    fn name(&self) -> &'static str {
        "rsvg-convert"
    }

    fn render(&self, svg: &[u8], canvas: Canvas) -> CoverResult<RenderedImage> {
        let args = |svg_path: &Path, out_path: &Path| -> Vec<OsString> {
            vec![
                "-w".into(),
                canvas.width.to_string().into(),
                "-h".into(),
                canvas.height.to_string().into(),
                "-o".into(),
                out_path.into(),
                svg_path.into(),
            ]
        };
        run_cli_renderer(&self.program, self.name(), svg, canvas, args)
    }
}

/// Write the scene to a temp file, invoke `program`, and read back the PNG it
/// produced. Both temp files are removed on every exit path.
fn run_cli_renderer(
    program: &Path,
    name: &str,
    svg: &[u8],
    canvas: Canvas,
    args: impl FnOnce(&Path, &Path) -> Vec<OsString>,
) -> CoverResult<RenderedImage> {
    if !is_program_on_path(program) {
        return Err(CoverError::validation(format!(
            "`{}` was not found on PATH",
            program.display()
        )));
    }

    let svg_path = temp_path("storycover_scene", "svg");
    let out_path = temp_path("storycover_raster", "png");
    let _svg_guard = TempFileGuard::new(svg_path.clone());
    let _out_guard = TempFileGuard::new(out_path.clone());

    std::fs::write(&svg_path, svg).map_err(|e| {
        CoverError::validation(format!(
            "failed to write scene file '{}': {e}",
            svg_path.display()
        ))
    })?;

    let status = Command::new(program)
        .args(args(&svg_path, &out_path))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| CoverError::validation(format!("failed to spawn {name}: {e}")))?;
    if !status.success() {
        return Err(CoverError::validation(format!(
            "{name} exited with status {status}"
        )));
    }

    let img = image::open(&out_path).map_err(|e| {
        CoverError::validation(format!("failed to read {name} output: {e}"))
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(RenderedImage {
        width,
        height,
        data: rgba.into_raw(),
        premultiplied: false,
    })
}

/// Return `true` when `program` can be invoked from `PATH`.
fn is_program_on_path(program: &Path) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_fails_before_spawning() {
        let backend = InkscapeBackend {
            program: PathBuf::from("storycover-no-such-program"),
            form: InkscapeForm::Modern,
        };
        let err = backend.render(b"<svg/>", Canvas::square(8)).unwrap_err();
        assert!(err.to_string().contains("not found on PATH"));
    }

    #[cfg(unix)]
    #[test]
    fn cli_renderer_reads_back_the_produced_png() {
        use std::os::unix::fs::PermissionsExt as _;

        // Stub renderer: answers --version and copies a fixture PNG to the
        // output path given by the rsvg-convert argument order.
        let dir = std::env::temp_dir().join(format!("storycover_cli_stub_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let fixture = dir.join("fixture.png");
        image::RgbaImage::from_pixel(8, 8, image::Rgba([0, 255, 0, 255]))
            .save(&fixture)
            .unwrap();

        let stub = dir.join("stub-renderer");
        std::fs::write(
            &stub,
            format!(
                "#!/bin/sh\n[ \"$1\" = \"--version\" ] && exit 0\ncp '{}' \"$6\"\n",
                fixture.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();

        let backend = RsvgConvertBackend {
            program: stub.clone(),
        };
        let image = backend.render(b"<svg/>", Canvas::square(8)).unwrap();
        assert_eq!((image.width, image.height), (8, 8));
        assert!(!image.premultiplied);
        assert_eq!(&image.data[0..4], &[0, 255, 0, 255]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
