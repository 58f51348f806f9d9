use crate::document::{Span, TextDocument};

/// Leading-whitespace width of `line` in columns, tabs expanded to
/// `tab_size`. `None` for blank lines.
pub fn line_indent_width(line: &str, tab_size: usize) -> Option<usize> {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += tab_size,
            c if c.is_whitespace() => width += 1,
            _ => return Some(width),
        }
    }
    None
}

/// Smallest positive indent over the lines `span` touches.
///
/// Blank lines and unindented lines are ignored; 0 when no line is
/// indented.
pub fn measure_indent(doc: &TextDocument, span: Span, tab_size: usize) -> usize {
    let first = doc.position_at(span.start).line as usize;
    let last = doc.position_at(span.end).line as usize;
    (first..=last)
        .filter_map(|line| line_indent_width(doc.line_text(line), tab_size))
        .filter(|&w| w > 0)
        .min()
        .unwrap_or(0)
}

/// Whitespace `width` columns wide, as spaces or as tabs padded with spaces.
pub fn indent_text(width: usize, tab_size: usize, insert_spaces: bool) -> String {
    if insert_spaces || tab_size == 0 {
        return " ".repeat(width);
    }
    let mut out = "\t".repeat(width / tab_size);
    out.push_str(&" ".repeat(width % tab_size));
    out
}
