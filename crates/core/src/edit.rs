//! Removal model and output assembly.
//!
//! The classifier never rewrites text. It emits [`RemovalRange`]s (byte ranges of the input to
//! drop) and [`SpecifierRewrite`]s (literal substitutions inside module specifiers), and
//! [`assemble`] rebuilds the output in one linear pass by copying everything that survives.
//!
//! Key ideas:
//!
//! - Offsets are byte offsets into the input (tree-sitter's model).
//! - Ranges may arrive unsorted and may overlap; they are stably sorted by `start` and merged
//!   against a cursor, so the result does not depend on emission order.
//! - A range may carry a [`Trailing`] pattern that is matched right after the point where removal
//!   stops, to also eat a dangling comma, terminator or line break.
//!
//! Invariants:
//!
//! - Without rewrites the output is never longer than the input, and surviving bytes keep their
//!   relative order.
//! - `start <= end <= input.len()` and all offsets are on UTF-8 boundaries ([`validate_ranges`]).

use std::iter::Peekable;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::StripError;

/// Text that may be consumed right after a removal, if present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trailing {
    /// Spaces and tabs.
    Space,
    /// Spaces and tabs, then at most one line break.
    LineBreak,
    /// Spaces and tabs around an optional `;` or `,` member terminator.
    Terminator,
    /// An optional `;` or `,` member terminator, then at most one line break.
    TerminatorLineBreak,
    /// A list separator comma with the whitespace around it.
    ListComma,
    /// Any whitespace, line breaks included.
    Whitespace,
}

static SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]*").expect("valid regex"));
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(?:\r?\n)?").expect("valid regex"));
static TERMINATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*[;,]?[ \t]*").expect("valid regex"));
static TERMINATOR_LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*[;,]?[ \t]*(?:\r?\n)?").expect("valid regex"));
static LIST_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*,\s*").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*").expect("valid regex"));

impl Trailing {
    fn regex(self) -> &'static Regex {
        match self {
            Trailing::Space => &SPACE,
            Trailing::LineBreak => &LINE_BREAK,
            Trailing::Terminator => &TERMINATOR,
            Trailing::TerminatorLineBreak => &TERMINATOR_LINE_BREAK,
            Trailing::ListComma => &LIST_COMMA,
            Trailing::Whitespace => &WHITESPACE,
        }
    }

    /// Length of the match at the start of `rest`, or `0` when the pattern does not match.
    pub fn match_len(self, rest: &str) -> usize {
        self.regex().find(rest).map_or(0, |m| m.end())
    }
}

/// A byte range of the input to drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalRange {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Optional text to consume after `end`.
    pub trailing: Option<Trailing>,
}

impl RemovalRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            trailing: None,
        }
    }

    pub fn with_trailing(start: usize, end: usize, trailing: Trailing) -> Self {
        Self {
            start,
            end,
            trailing: Some(trailing),
        }
    }
}

/// A substitution anchored inside a module specifier.
///
/// `pattern` is anchored and must match the input at `position`; the matched text is replaced by
/// `replacement`. The rewrite is only applied if `position` survives removal.
#[derive(Debug, Clone)]
pub struct SpecifierRewrite {
    pub position: usize,
    pub pattern: Regex,
    pub replacement: String,
}

impl SpecifierRewrite {
    /// Replace exactly `original` at `position`.
    pub fn literal(position: usize, original: &str, replacement: String) -> Result<Self, StripError> {
        let pattern = Regex::new(&format!("^{}", regex::escape(original)))
            .map_err(|e| StripError::InvalidRange(format!("specifier pattern: {e}")))?;
        Ok(Self {
            position,
            pattern,
            replacement,
        })
    }
}

/// A contiguous span of output and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Byte offset in the input.
    pub input: usize,
    /// Byte offset in the output.
    pub output: usize,
    /// Length in output bytes.
    pub len: usize,
    /// True when the span is a rewrite replacement rather than copied input.
    pub substituted: bool,
}

/// Output text together with the segments it was assembled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub code: String,
    pub segments: Vec<Segment>,
}

/// Validate ranges and rewrite anchors against the input.
///
/// Overlaps are allowed (the assembler merges them); positions must be in bounds and on
/// character boundaries so slicing can never panic.
pub fn validate_ranges(
    input: &str,
    ranges: &[RemovalRange],
    rewrites: &[SpecifierRewrite],
) -> Result<(), StripError> {
    for (idx, r) in ranges.iter().enumerate() {
        if r.start > r.end {
            return Err(StripError::InvalidRange(format!(
                "start > end at index {idx}: start={}, end={}",
                r.start, r.end
            )));
        }
        if r.end > input.len() {
            return Err(StripError::InvalidRange(format!(
                "range out of bounds at index {idx}: end={} > input_len={}",
                r.end,
                input.len()
            )));
        }
        if !input.is_char_boundary(r.start) || !input.is_char_boundary(r.end) {
            return Err(StripError::InvalidRange(format!(
                "range splits a character at index {idx}: [{},{})",
                r.start, r.end
            )));
        }
    }
    for rw in rewrites {
        if rw.position > input.len() || !input.is_char_boundary(rw.position) {
            return Err(StripError::InvalidRange(format!(
                "rewrite anchor {} is not a character boundary",
                rw.position
            )));
        }
    }
    Ok(())
}

/// Rebuild the output from `input`, dropping every range and applying surviving rewrites.
///
/// Inputs must have passed [`validate_ranges`].
pub fn assemble(
    input: &str,
    mut ranges: Vec<RemovalRange>,
    mut rewrites: Vec<SpecifierRewrite>,
) -> Assembled {
    ranges.sort_by_key(|r| r.start);
    rewrites.sort_by_key(|rw| rw.position);

    let mut out = Assembler {
        input,
        code: String::with_capacity(input.len()),
        segments: Vec::new(),
        rewrites: rewrites.into_iter().peekable(),
    };

    let mut index = 0usize;
    for range in &ranges {
        // Already removed as part of an earlier, wider range.
        if range.start < index && range.end <= index {
            continue;
        }

        let start = range.start.max(index);
        out.copy(index, start);
        index = range.end.max(start);

        if let Some(trailing) = range.trailing {
            index += trailing.match_len(&input[index..]);
        }
    }
    out.copy(index, input.len());

    Assembled {
        code: out.code,
        segments: out.segments,
    }
}

struct Assembler<'a, I: Iterator<Item = SpecifierRewrite>> {
    input: &'a str,
    code: String,
    segments: Vec<Segment>,
    rewrites: Peekable<I>,
}

impl<I: Iterator<Item = SpecifierRewrite>> Assembler<'_, I> {
    /// Copy `input[from..to]`, applying rewrites anchored inside it.
    fn copy(&mut self, from: usize, to: usize) {
        let mut cursor = from;

        while let Some(rw) = self.rewrites.next_if(|rw| rw.position < to) {
            // Anchored inside removed text.
            if rw.position < cursor {
                continue;
            }
            let Some(m) = rw.pattern.find(&self.input[rw.position..to]) else {
                continue;
            };

            self.push_copied(cursor, rw.position);
            self.segments.push(Segment {
                input: rw.position,
                output: self.code.len(),
                len: rw.replacement.len(),
                substituted: true,
            });
            self.code.push_str(&rw.replacement);
            cursor = rw.position + m.end();
        }

        self.push_copied(cursor, to);
    }

    fn push_copied(&mut self, from: usize, to: usize) {
        if from >= to {
            return;
        }
        self.segments.push(Segment {
            input: from,
            output: self.code.len(),
            len: to - from,
            substituted: false,
        });
        self.code.push_str(&self.input[from..to]);
    }
}
