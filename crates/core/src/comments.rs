//! Removable extent of a comment.
//!
//! Comments are tree-sitter extras, so they show up as `comment` nodes wherever they occur. This
//! module decides how much surrounding whitespace goes with one when comments are removed, so
//! full-line comments leave no empty line behind and inline ones do not glue tokens together.

use crate::edit::{RemovalRange, Trailing};

/// Removal range for the comment at `[start, end)`, or `None` when it must stay.
pub fn comment_range(source: &str, start: usize, end: usize) -> Option<RemovalRange> {
    let bytes = source.as_bytes();

    let ws_start = skip_space_back(bytes, start);
    let ws_end = skip_space_forward(bytes, end);
    let owns_line_start = ws_start == 0 || bytes[ws_start - 1] == b'\n';
    let ends_line = at_line_end(bytes, ws_end);

    let range = match (owns_line_start, ends_line) {
        (true, true) => RemovalRange::with_trailing(ws_start, end, Trailing::LineBreak),
        (true, false) => RemovalRange::with_trailing(start, end, Trailing::Space),
        (false, true) => RemovalRange::new(ws_start, end),
        (false, false) if ws_start < start => {
            RemovalRange::with_trailing(start, end, Trailing::Space)
        }
        (false, false) if ws_end > end => RemovalRange::new(start, end),
        (false, false) => {
            let (before, after) = (bytes[start - 1], bytes[end]);
            if !is_separator(before) && !is_separator(after) {
                log::trace!("keeping comment at {start}: removal would join adjacent tokens");
                return None;
            }
            RemovalRange::new(start, end)
        }
    };
    Some(range)
}

/// Walk back over spaces and tabs from `pos`.
pub(crate) fn skip_space_back(bytes: &[u8], mut pos: usize) -> usize {
    while pos > 0 && matches!(bytes[pos - 1], b' ' | b'\t') {
        pos -= 1;
    }
    pos
}

/// Walk forward over spaces and tabs from `pos`.
pub(crate) fn skip_space_forward(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t') {
        pos += 1;
    }
    pos
}

/// True at end of input or in front of a `\n` / `\r\n` line break.
pub(crate) fn at_line_end(bytes: &[u8], pos: usize) -> bool {
    match bytes.get(pos) {
        None | Some(b'\n') => true,
        Some(b'\r') => bytes.get(pos + 1) == Some(&b'\n'),
        _ => false,
    }
}

fn is_separator(b: u8) -> bool {
    matches!(b, b'(' | b')' | b'[' | b']' | b'{' | b'}' | b',' | b';')
}
