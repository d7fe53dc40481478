/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a square canvas with the given side length.
    pub const fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// Return `true` when `(width, height)` matches this canvas exactly.
    pub fn matches(self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

/// Canvas every cover is rendered at; the text layout tables are tuned to
/// this coordinate space.
pub const COVER_CANVAS: Canvas = Canvas::square(3000);
