//! Module specifier remapping and extension rewriting.
//!
//! Two independent, composable transforms run on the text between the quotes of an import/export
//! source or a literal dynamic `import("...")`:
//!
//! 1. Alias remapping ([`remap_specifier`]): the first configured alias prefix the specifier
//!    starts with is replaced. Matching is by configuration order, not longest prefix.
//! 2. Extension rewriting ([`rewrite_extension`]): `.ts`/`.mts`/`.cts` become
//!    `.js`/`.mjs`/`.cjs`.
//!
//! Relative alias targets are declared against a common root (like an import map next to a
//! package manifest). They are re-expressed relative to the directory of the file being
//! stripped, so files at different depths each get a correct path.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use url::Url;

use crate::{StripError, edit::SpecifierRewrite};

/// Alias configuration for specifier remapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapConfig {
    /// Path of the file being stripped, relative to the root the aliases are declared against.
    pub file_path: String,
    /// Alias prefix to replacement path, in priority order.
    pub imports: IndexMap<String, String>,
}

static ROOT: Lazy<Url> = Lazy::new(|| Url::parse("file:///").expect("valid root url"));

/// Resolve `specifier` through the first matching alias, if any.
pub fn remap_specifier(specifier: &str, config: &RemapConfig) -> Option<String> {
    let (alias, target) = config
        .imports
        .iter()
        .find(|(alias, _)| specifier.starts_with(alias.as_str()))?;
    let rest = &specifier[alias.len()..];

    let base = if is_relative(target) {
        relative_to_file(&config.file_path, target)?
    } else {
        target.clone()
    };
    Some(format!("{base}{rest}"))
}

/// Map a TypeScript source extension to its runtime counterpart.
///
/// Declaration files (`.d.ts` and friends) are left alone.
pub fn rewrite_extension(specifier: &str) -> Option<String> {
    const EXTENSIONS: [(&str, &str); 3] = [(".mts", ".mjs"), (".cts", ".cjs"), (".ts", ".js")];

    let (stem, to) = EXTENSIONS
        .iter()
        .find_map(|(from, to)| Some((specifier.strip_suffix(from)?, to)))?;
    if stem.is_empty() || stem.ends_with('/') || stem.ends_with(".d") {
        return None;
    }
    Some(format!("{stem}{to}"))
}

/// Build the rewrite for the specifier text found at `position`, if anything changes.
pub(crate) fn specifier_rewrite(
    text: &str,
    position: usize,
    remap: Option<&RemapConfig>,
    path_rewriting: bool,
) -> Result<Option<SpecifierRewrite>, StripError> {
    let remapped = remap.and_then(|config| remap_specifier(text, config));
    if let Some(remapped) = &remapped {
        log::debug!("remapped specifier {text:?} to {remapped:?}");
    }

    let current = remapped.as_deref().unwrap_or(text);
    let rewritten = if path_rewriting {
        rewrite_extension(current).or(remapped)
    } else {
        remapped
    };

    match rewritten {
        Some(replacement) if replacement != text => {
            SpecifierRewrite::literal(position, text, replacement).map(Some)
        }
        _ => Ok(None),
    }
}

fn is_relative(path: &str) -> bool {
    path == "." || path == ".." || path.starts_with("./") || path.starts_with("../")
}

/// Express root-relative `target` relative to the directory containing `file_path`.
fn relative_to_file(file_path: &str, target: &str) -> Option<String> {
    let from = ROOT.join(file_path).ok()?;
    let to = ROOT.join(target).ok()?;
    let relative = from.make_relative(&to)?;
    let relative = percent_decode_str(&relative).decode_utf8().ok()?;

    Some(if relative.starts_with("../") || relative == ".." {
        relative.into_owned()
    } else {
        format!("./{relative}")
    })
}
