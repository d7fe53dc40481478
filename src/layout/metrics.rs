use crate::foundation::core::Canvas;
use crate::foundation::error::{CoverError, CoverResult};

/// Font sizing and vertical placement for the cover text block.
///
/// Derived purely from the title and subtitle line counts; every field is in
/// canvas units. The same line counts always produce the same metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextMetrics {
    pub title_size: u32,
    pub subtitle_size: u32,
    pub badge_size: u32,
    /// Y of the first title baseline; the whole text group is translated here.
    pub text_base_y: u32,
    /// Vertical advance between title lines.
    pub title_line_dy: u32,
    /// Vertical advance between subtitle lines.
    pub subtitle_line_dy: u32,
    /// Offset of the first subtitle baseline below `text_base_y`.
    pub subtitle_offset_y: u32,
}

// Sizing table for the 3000-unit canvas. A single-line title renders larger;
// a wrapped title drops a size tier and raises the block so the extra line
// still clears the bottom edge.
const TITLE_SIZE_SINGLE: u32 = 140;
const TITLE_SIZE_MULTI: u32 = 120;
const SUBTITLE_SIZE: u32 = 80;
const BADGE_SIZE: u32 = 64;
const TEXT_BASE_Y_SINGLE: u32 = 2150;
const MULTI_LINE_RAISE: u32 = 40;
const TITLE_LINE_DY: u32 = 150;
const SUBTITLE_LINE_DY: u32 = 100;
const SUBTITLE_GAP: u32 = 160;

/// Compute metrics for the given line counts, checking that the resulting
/// text block stays inside `canvas`.
pub fn compute_metrics(
    title_lines: usize,
    subtitle_lines: usize,
    canvas: Canvas,
) -> CoverResult<TextMetrics> {
    let (title_size, text_base_y) = if title_lines <= 1 {
        (TITLE_SIZE_SINGLE, TEXT_BASE_Y_SINGLE)
    } else {
        (TITLE_SIZE_MULTI, TEXT_BASE_Y_SINGLE - MULTI_LINE_RAISE)
    };
    let subtitle_offset_y =
        SUBTITLE_GAP + TITLE_LINE_DY * title_lines.saturating_sub(1) as u32;

    let metrics = TextMetrics {
        title_size,
        subtitle_size: SUBTITLE_SIZE,
        badge_size: BADGE_SIZE,
        text_base_y,
        title_line_dy: TITLE_LINE_DY,
        subtitle_line_dy: SUBTITLE_LINE_DY,
        subtitle_offset_y,
    };

    let bottom = metrics.block_bottom(title_lines, subtitle_lines);
    if bottom > canvas.height {
        return Err(CoverError::validation(format!(
            "text block bottom {bottom} exceeds canvas height {} \
             (title_lines={title_lines}, subtitle_lines={subtitle_lines})",
            canvas.height
        )));
    }
    Ok(metrics)
}

impl TextMetrics {
    /// Lowest canvas Y the text block reaches: the last baseline plus a
    /// half-em descender allowance.
    pub fn block_bottom(&self, title_lines: usize, subtitle_lines: usize) -> u32 {
        let title_bottom = self.text_base_y
            + self.title_line_dy * title_lines.saturating_sub(1) as u32
            + self.title_size / 2;
        if subtitle_lines == 0 {
            return title_bottom;
        }
        let subtitle_bottom = self.text_base_y
            + self.subtitle_offset_y
            + self.subtitle_line_dy * subtitle_lines.saturating_sub(1) as u32
            + self.subtitle_size / 2;
        title_bottom.max(subtitle_bottom)
    }
}
