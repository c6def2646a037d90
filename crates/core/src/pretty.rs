//! Cosmetic post-pass for `pretty_print`.
//!
//! Not position-preserving, which is why it is refused when a sourcemap is requested.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static UNICODE_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})").expect("valid regex"));
static LEADING_INDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(?: {4})+").expect("valid regex"));

/// Decode `\uXXXX` escapes and halve four-space indentation.
pub fn pretty_print(code: &str) -> String {
    let decoded = UNICODE_ESCAPE.replace_all(code, |caps: &Captures<'_>| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), String::from)
    });

    LEADING_INDENT
        .replace_all(&decoded, |caps: &Captures<'_>| " ".repeat(caps[0].len() / 2))
        .into_owned()
}
