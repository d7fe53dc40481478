use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use storycover::{BuildConfig, WrapOpts, build_cover};

/// Build a story cover and optionally embed it into the package's MP3 tracks.
#[derive(Parser, Debug)]
#[command(name = "storycover", version)]
struct Cli {
    /// Package slug: folder name and art filename base.
    slug: String,

    /// Cover title; defaults to the title-cased slug.
    #[arg(long, default_value = "")]
    title: String,

    /// Optional subtitle (e.g. "Age 3-7 • Sharing makes everyone feel safe").
    #[arg(long, default_value = "")]
    subtitle: String,

    /// Optional badge label (e.g. "Includes 3 narrator voices").
    #[arg(long, default_value = "")]
    badge: String,

    /// warm|cool|forest, or a path to a palette JSON file.
    #[arg(long, default_value = "warm")]
    palette: String,

    /// Explicit art filename in the base folder (or an absolute path).
    #[arg(long)]
    art: Option<PathBuf>,

    /// Base storage directory; defaults to $STORY_BASE.
    #[arg(long)]
    base: Option<PathBuf>,

    /// Output filename override (defaults to <slug>_cover.jpg).
    #[arg(long)]
    out_name: Option<String>,

    /// Skip embedding the cover into MP3 tracks.
    #[arg(long, default_value_t = false)]
    no_embed: bool,

    /// Delete the consumed source art and zip the package folder.
    #[arg(long, default_value_t = false)]
    archive: bool,

    /// Approximate characters per title line.
    #[arg(long, default_value_t = 22)]
    title_width: usize,

    /// Maximum title lines.
    #[arg(long, default_value_t = 2)]
    title_lines: usize,

    /// Approximate characters per subtitle line.
    #[arg(long, default_value_t = 38)]
    subtitle_width: usize,

    /// Maximum subtitle lines.
    #[arg(long, default_value_t = 2)]
    subtitle_lines: usize,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = 92)]
    quality: u8,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // The environment is consulted exactly once, here; pipeline stages only
    // ever see the explicit config.
    let base = cli
        .base
        .or_else(|| std::env::var_os("STORY_BASE").map(PathBuf::from))
        .context("no --base given and STORY_BASE is not set")?;

    let config = BuildConfig {
        base,
        slug: cli.slug,
        title: cli.title,
        subtitle: cli.subtitle,
        badge: cli.badge,
        palette: cli.palette,
        art: cli.art,
        out_name: cli.out_name,
        title_wrap: WrapOpts {
            width_chars: cli.title_width,
            max_lines: cli.title_lines,
        },
        subtitle_wrap: WrapOpts {
            width_chars: cli.subtitle_width,
            max_lines: cli.subtitle_lines,
        },
        jpeg_quality: cli.quality,
        embed_tracks: !cli.no_embed,
        archive: cli.archive,
    };

    let outcome = build_cover(&config)?;

    let failed = outcome.failed_tracks().count();
    if failed > 0 {
        eprintln!("{failed} track(s) failed to tag");
    }
    if let Some(archive) = &outcome.archive_path {
        eprintln!("bundled {}", archive.display());
    }
    eprintln!("wrote {}", outcome.cover_path.display());
    Ok(())
}
