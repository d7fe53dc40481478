use crate::foundation::error::{CoverError, CoverResult};

/// Word-wrap settings for one text block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrapOpts {
    /// Approximate characters per line.
    pub width_chars: usize,
    /// Maximum number of lines kept.
    pub max_lines: usize,
}

impl WrapOpts {
    /// Default title wrapping: 22 characters, 2 lines.
    pub fn title_default() -> Self {
        Self {
            width_chars: 22,
            max_lines: 2,
        }
    }

    /// Default subtitle wrapping: 38 characters, 2 lines.
    pub fn subtitle_default() -> Self {
        Self {
            width_chars: 38,
            max_lines: 2,
        }
    }

    pub fn validate(&self) -> CoverResult<()> {
        if self.width_chars == 0 {
            return Err(CoverError::validation("wrap width_chars must be > 0"));
        }
        if self.max_lines == 0 {
            return Err(CoverError::validation("wrap max_lines must be > 0"));
        }
        Ok(())
    }
}

/// Ellipsis line must keep at least this many characters to read as text.
const ELLIPSIS_MIN_CHARS: usize = 3;

/// Greedy word-wrap of `text` into at most `max_lines` lines.
///
/// Empty input produces no lines; the caller omits the whole element. Words
/// are never split, so a single word longer than `width_chars` occupies its
/// own overlong line. When wrapping produces more lines than `max_lines`,
/// only the first `max_lines` are kept and the last kept line gets its
/// trailing periods and spaces replaced with an ellipsis, unless the line is
/// too short to carry one.
pub fn wrap_lines(text: &str, opts: WrapOpts) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;
    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_chars = word_chars;
        } else if current_chars + 1 + word_chars <= opts.width_chars {
            current.push(' ');
            current.push_str(word);
            current_chars += 1 + word_chars;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_chars = word_chars;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > opts.max_lines {
        lines.truncate(opts.max_lines);
        if let Some(last) = lines.last_mut()
            && last.chars().count() > ELLIPSIS_MIN_CHARS
        {
            let kept = last.trim_end_matches(['.', ' ']);
            *last = format!("{kept}\u{2026}");
        }
    }
    lines
}
