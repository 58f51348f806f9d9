use serde::{Deserialize, Serialize};

use crate::error::PropscopeError;

/// A zero-based line/column pair.
///
/// `character` counts UTF-16 code units, the unit editors and language
/// servers exchange.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A range between two positions; `end` is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Inclusive on both ends, matching how editors test "position in range".
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A byte span into a document's text. Half-open `[start, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single replacement in line/column coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Range,
    #[serde(rename = "newText")]
    pub new_text: String,
}

impl TextEdit {
    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self {
            range: Range::new(at, at),
            new_text: text.into(),
        }
    }

    pub fn delete(range: Range) -> Self {
        Self {
            range,
            new_text: String::new(),
        }
    }
}

/// Read-only snapshot of a source file plus position/offset conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    uri: String,
    text: String,
    line_starts: Vec<usize>,
}

impl TextDocument {
    pub fn new(uri: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            uri: uri.into(),
            text,
            line_starts,
        }
    }

    /// Read a document from disk, addressing it by its `file://` URI.
    pub fn from_path(path: &std::path::Path) -> Result<Self, PropscopeError> {
        let text = std::fs::read_to_string(path).map_err(|e| PropscopeError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Self::new(crate::util::path_to_uri(path), text))
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Text of a single line without its line terminator.
    pub fn line_text(&self, line: usize) -> &str {
        let Some(&start) = self.line_starts.get(line) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |next| next - 1);
        self.text[start..end].trim_end_matches('\r')
    }

    /// Byte offset of `pos`, clamped to the line's end and the text length.
    pub fn offset_at(&self, pos: Position) -> usize {
        let line = pos.line as usize;
        if line >= self.line_starts.len() {
            return self.text.len();
        }
        let start = self.line_starts[line];
        let line_text = self.line_text(line);

        let mut units = 0u32;
        for (idx, ch) in line_text.char_indices() {
            if units >= pos.character {
                return start + idx;
            }
            units += ch.len_utf16() as u32;
        }
        start + line_text.len()
    }

    /// Line/column of a byte offset. Offsets inside a multi-byte character
    /// snap back to the character's start.
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line_starts.partition_point(|&s| s <= offset) - 1;
        let start = self.line_starts[line];
        let character: usize = self.text[start..offset]
            .chars()
            .map(char::len_utf16)
            .sum();
        Position::new(line as u32, character as u32)
    }

    pub fn span_of(&self, range: Range) -> Span {
        Span::new(self.offset_at(range.start), self.offset_at(range.end))
    }

    pub fn range_of(&self, span: Span) -> Range {
        Range::new(self.position_at(span.start), self.position_at(span.end))
    }

    pub fn text_in(&self, range: Range) -> &str {
        let span = self.span_of(range);
        if span.start > span.end {
            return "";
        }
        &self.text[span.start..span.end]
    }

    /// Range of the identifier-like word touching `pos`, if any.
    pub fn word_range_at(&self, pos: Position) -> Option<Range> {
        let offset = self.offset_at(pos);
        let bytes = self.text.as_bytes();

        let mut start = offset;
        while start > 0 && is_word_byte(bytes[start - 1]) {
            start -= 1;
        }
        let mut end = offset;
        while end < bytes.len() && is_word_byte(bytes[end]) {
            end += 1;
        }

        if start == end {
            return None;
        }
        Some(self.range_of(Span::new(start, end)))
    }

    /// Apply one edit in place.
    pub fn apply(&mut self, edit: &TextEdit) -> Result<(), PropscopeError> {
        let span = self.span_of(edit.range);
        if span.start > span.end {
            return Err(PropscopeError::Edit(format!(
                "inverted range {:?} in {}",
                edit.range, self.uri
            )));
        }
        self.text.replace_range(span.start..span.end, &edit.new_text);
        self.line_starts = compute_line_starts(&self.text);
        Ok(())
    }

    /// Copy of this document with `edit` applied.
    pub fn with_edit(&self, edit: &TextEdit) -> Result<Self, PropscopeError> {
        let mut next = self.clone();
        next.apply(edit)?;
        Ok(next)
    }
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        text.bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'\n')
            .map(|(i, _)| i + 1),
    );
    starts
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Move a byte offset through an edit that replaced `replaced` with
/// `inserted_len` bytes. Offsets inside the replaced span snap to its start.
pub fn rebase_offset(offset: usize, replaced: Span, inserted_len: usize) -> usize {
    if offset >= replaced.end {
        offset - replaced.len() + inserted_len
    } else if offset > replaced.start {
        replaced.start
    } else {
        offset
    }
}
