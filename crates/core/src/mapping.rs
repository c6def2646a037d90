//! Sourcemap creation for stripped output.
//!
//! The assembler only copies input spans and substitutes specifier text, so a map needs no
//! per-byte origin table: one mapping at the start of every output segment, plus one at every
//! line start inside a copied segment, pins each surviving token to its input position.
//!
//! Columns are UTF-16 code units (the JS sourcemap convention); offsets are bytes internally.

use crate::{
    StripError,
    edit::{Assembled, Segment},
};

/// Line starts of a text, for byte to (line, UTF-16 column) conversion.
struct LineIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, starts }
    }

    /// Line and UTF-16 column of a byte offset on a character boundary.
    fn position(&self, byte: usize) -> (u32, u32) {
        let line = self.starts.partition_point(|&s| s <= byte) - 1;
        let col = self.text[self.starts[line]..byte].encode_utf16().count();
        (line as u32, col as u32)
    }
}

/// Create a sourcemap mapping `assembled.code` back to `input`.
pub fn create_sourcemap(
    input: &str,
    assembled: &Assembled,
    source_filename: &str,
) -> Result<String, StripError> {
    let in_lines = LineIndex::new(input);
    let out_lines = LineIndex::new(&assembled.code);

    let mut builder = sourcemap::SourceMapBuilder::new(None);
    builder.add_source(source_filename);
    builder.set_source_contents(0, Some(input));

    let mut add = |out_byte: usize, in_byte: usize| {
        let (dst_line, dst_col) = out_lines.position(out_byte);
        let (src_line, src_col) = in_lines.position(in_byte);
        builder.add(
            dst_line,
            dst_col,
            src_line,
            src_col,
            Some(source_filename),
            None,
            false,
        );
    };

    for &Segment {
        input: in_start,
        output: out_start,
        len,
        substituted,
    } in &assembled.segments
    {
        add(out_start, in_start);
        if substituted {
            continue;
        }

        let copied = &assembled.code[out_start..out_start + len];
        for (offset, _) in copied.match_indices('\n') {
            // Line starts at the very end belong to the next segment.
            if offset + 1 < len {
                add(out_start + offset + 1, in_start + offset + 1);
            }
        }
    }

    let map = builder.into_sourcemap();
    let mut buf: Vec<u8> = Vec::new();
    map.to_writer(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| StripError::InvalidOptions(format!("sourcemap is not utf-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StripOptions, strip_with_sourcemap};

    fn parse_map(json: &str) -> sourcemap::SourceMap {
        sourcemap::SourceMap::from_slice(json.as_bytes()).expect("sourcemap JSON must parse")
    }

    /// Line starts include every byte after a newline.
    #[test]
    fn line_index_positions() {
        let index = LineIndex::new("ab\ncd\n");
        assert_eq!(index.starts, vec![0, 3, 6]);
        assert_eq!(index.position(0), (0, 0));
        assert_eq!(index.position(4), (1, 1));
        assert_eq!(index.position(6), (2, 0));
    }

    /// Columns count UTF-16 code units, not bytes.
    #[test]
    fn line_index_uses_utf16_columns() {
        let index = LineIndex::new("あ🙂x");
        // "あ" is 3 bytes / 1 unit, "🙂" is 4 bytes / 2 units.
        assert_eq!(index.position(7), (0, 3));
    }

    /// Tokens after a removed annotation map back to their input columns.
    #[test]
    fn maps_tokens_after_removed_annotation() {
        let res = strip_with_sourcemap("const x: number = 1;", &StripOptions::default()).unwrap();
        assert_eq!(res.code, "const x = 1;");

        let map = parse_map(&res.sourcemap);
        assert_eq!(map.get_source(0), Some("input.ts"));

        // Output " = 1;" starts at column 7 and came from input column 15.
        let token = map.lookup_token(0, 8).expect("token for '='");
        assert_eq!(token.get_src_line(), 0);
        assert_eq!(token.get_src_col(), 15);
    }

    /// Whole removed lines shift later lines up without losing their origin.
    #[test]
    fn maps_lines_after_removed_statement() {
        let src = "type A = string;\nlet a = 1;\nlet b = 2;\n";
        let res = strip_with_sourcemap(src, &StripOptions::default()).unwrap();
        assert_eq!(res.code, "let a = 1;\nlet b = 2;\n");

        let map = parse_map(&res.sourcemap);
        let first = map.lookup_token(0, 0).expect("token for line 0");
        assert_eq!((first.get_src_line(), first.get_src_col()), (1, 0));
        let second = map.lookup_token(1, 4).expect("token for line 1");
        assert_eq!((second.get_src_line(), second.get_src_col()), (2, 0));
    }

    /// Non-ASCII text before a removal keeps UTF-16 columns consistent.
    #[test]
    fn maps_with_unicode_prefix() {
        let res = strip_with_sourcemap(
            "const é: string = \"🙂\"; let z: number;",
            &StripOptions::default(),
        )
        .unwrap();
        assert_eq!(res.code, "const é = \"🙂\"; let z;");

        let map = parse_map(&res.sourcemap);
        // Output " = " follows "é" at UTF-16 column 7; in the input it is at column 15.
        let token = map.lookup_token(0, 7).expect("token after 'é'");
        assert_eq!(token.get_src_col(), 15);
        // The final ";" sits at column 21 in the output and column 37 in the input.
        let token = map.lookup_token(0, 21).expect("token for ';'");
        assert_eq!(token.get_src_col(), 37);
    }
}
