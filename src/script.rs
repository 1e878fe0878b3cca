use std::path::Path;

use anyhow::{Context, Result};

/// One line of the input script, terminator included.
///
/// The terminator is part of the line's length, so `"Hello world\n"` counts
/// as 12 characters. A `\r\n` or lone `\r` terminator is stored as `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    raw: String,
}

impl Line {
    pub fn new<S: Into<String>>(raw: S) -> Self {
        let mut raw = raw.into();
        if raw.ends_with("\r\n") {
            raw.truncate(raw.len() - 2);
            raw.push('\n');
        } else if raw.ends_with('\r') {
            raw.pop();
            raw.push('\n');
        }
        Self { raw }
    }

    /// Length in characters, terminator included.
    pub fn char_len(&self) -> usize {
        self.raw.chars().count()
    }

    /// The caption text, without the terminator.
    pub fn text(&self) -> &str {
        self.raw.strip_suffix('\n').unwrap_or(&self.raw)
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

/// Splits script contents into lines, keeping each line's terminator.
pub fn split_lines(data: &str) -> Vec<Line> {
    let data = data.strip_prefix('\u{FEFF}').unwrap_or(data);
    data.split_inclusive('\n').map(Line::new).collect()
}

pub fn load<P: AsRef<Path>>(path: P, keep_blank_lines: bool) -> Result<Vec<Line>> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open text file: '{}'", path.display()))?;
    let lines = split_lines(&data);
    let total = lines.len();
    let lines = if keep_blank_lines {
        lines
    } else {
        lines.into_iter().filter(|l| !l.is_blank()).collect()
    };
    log::debug!(
        "Loaded {} lines from '{}' ({} blank lines dropped)",
        lines.len(),
        path.display(),
        total - lines.len()
    );
    Ok(lines)
}
