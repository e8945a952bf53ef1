//! Line/column positions for rendering byte offsets in reports.

use serde::Serialize;

/// Zero-based line and character (UTF-16 code units) of an offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// Starting offset of every line in a source text.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    /// `line_starts[0]` is always 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        let bytes = source.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            } else if b == b'\r' && bytes.get(i + 1) != Some(&b'\n') {
                // lone \r (old Mac line ending)
                line_starts.push((i + 1) as u32);
            }
        }
        LineMap { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn offset_to_position(&self, offset: u32, source: &str) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };

        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        let clamped_end = (offset as usize).min(source.len());
        let start = (line_start as usize).min(clamped_end);
        let slice = source.get(start..clamped_end).unwrap_or("");
        let character = slice.chars().map(|ch| ch.len_utf16() as u32).sum();

        Position {
            line: line as u32,
            character,
        }
    }

    /// Text of the zero-based `line`, without its line terminator.
    pub fn line_text<'a>(&self, line: u32, source: &'a str) -> &'a str {
        let idx = line as usize;
        let Some(&start) = self.line_starts.get(idx) else {
            return "";
        };
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&next| next as usize)
            .unwrap_or(source.len());
        source
            .get(start as usize..end)
            .unwrap_or("")
            .trim_end_matches(['\r', '\n'])
    }
}
