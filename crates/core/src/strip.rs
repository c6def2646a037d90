//! TypeScript type stripping with optional sourcemap support.
//!
//! The pipeline is a pure function of `(source, options)`:
//!
//! 1. Reject unusable file names ([`check_file_name`]).
//! 2. Parse with tree-sitter.
//! 3. Classify nodes and collect removal ranges and specifier rewrites ([`Erasure`]).
//! 4. Validate and assemble the output in one pass over the input ([`assemble`]).
//! 5. Optionally pretty-print, or build a sourcemap from the assembled segments.
//!
//! All state lives in the call; concurrent calls on different threads share nothing but each
//! thread's cached parser.

use crate::{
    RemapConfig, StripError,
    edit::{Assembled, RemovalRange, Trailing, assemble, validate_ranges},
    mapping::create_sourcemap,
    parse::{check_file_name, parse},
    pretty::pretty_print,
    visit::Erasure,
};

/// Options for type stripping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripOptions {
    /// Remove comments as well as types.
    pub remove_comments: bool,
    /// Name of the input file. Must carry a `.ts`, `.mts` or `.cts` extension; also used as the
    /// sourcemap source name.
    pub file_name: String,
    /// Run the cosmetic [`pretty_print`] pass on the output.
    pub pretty_print: bool,
    /// Rewrite `.ts`/`.mts`/`.cts` module specifiers to `.js`/`.mjs`/`.cjs`.
    pub path_rewriting: bool,
    /// Remap aliased module specifiers.
    pub remap_specifiers: Option<RemapConfig>,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            remove_comments: false,
            file_name: "input.ts".to_string(),
            pretty_print: false,
            path_rewriting: false,
            remap_specifiers: None,
        }
    }
}

/// Output code and its corresponding sourcemap JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAndSourcemap {
    /// The stripped JavaScript.
    pub code: String,
    /// Sourcemap JSON mapping `code` back to the TypeScript input.
    pub sourcemap: String,
}

/// Strip type syntax from `source`.
pub fn strip(source: &str, options: &StripOptions) -> Result<String, StripError> {
    let assembled = rewrite(source, options)?;
    if options.pretty_print {
        return Ok(pretty_print(&assembled.code));
    }
    Ok(assembled.code)
}

/// Strip type syntax and create a sourcemap for the result.
///
/// `pretty_print` moves text around and cannot be combined with a sourcemap.
pub fn strip_with_sourcemap(
    source: &str,
    options: &StripOptions,
) -> Result<CodeAndSourcemap, StripError> {
    if options.pretty_print {
        return Err(StripError::InvalidOptions(
            "pretty_print cannot be combined with sourcemap output".to_string(),
        ));
    }

    let assembled = rewrite(source, options)?;
    let sourcemap = create_sourcemap(source, &assembled, &options.file_name)?;
    Ok(CodeAndSourcemap {
        code: assembled.code,
        sourcemap,
    })
}

/// Shared core of the public entry points.
fn rewrite(source: &str, options: &StripOptions) -> Result<Assembled, StripError> {
    check_file_name(&options.file_name)?;

    let parsed = parse(source)?;
    let mut collected = Erasure::new(source, options).collect(parsed.tree.root_node())?;
    collected.ranges.extend(
        parsed
            .masked
            .into_iter()
            .map(|kw| RemovalRange::with_trailing(kw.start, kw.end, Trailing::Space)),
    );
    validate_ranges(source, &collected.ranges, &collected.rewrites)?;

    log::debug!(
        "{}: {} removal ranges, {} specifier rewrites",
        options.file_name,
        collected.ranges.len(),
        collected.rewrites.len()
    );
    Ok(assemble(source, collected.ranges, collected.rewrites))
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ErrorCode;

    /// Strips using the default options.
    fn strip_default(src: &str) -> String {
        strip(src, &StripOptions::default()).unwrap()
    }

    /// Strips with a remap configuration and path rewriting enabled.
    fn strip_remapped(src: &str, file_path: &str, imports: &[(&str, &str)]) -> String {
        let options = StripOptions {
            path_rewriting: true,
            remap_specifiers: Some(RemapConfig {
                file_path: file_path.to_string(),
                imports: imports
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<IndexMap<_, _>>(),
            }),
            ..StripOptions::default()
        };
        strip(src, &options).unwrap()
    }

    /// The canonical single-annotation case.
    #[test]
    fn strips_annotation() {
        assert_eq!(strip_default("const x: number = 1;"), "const x = 1;");
    }

    /// A file with nothing type-level is returned unchanged.
    #[test]
    fn plain_javascript_is_untouched() {
        let src = "// hi\nexport function f(a, b = 1) {\n  return a?.b ?? b;\n}\n";
        assert_eq!(strip_default(src), src);
    }

    /// Stripping is idempotent.
    #[test]
    fn stripping_twice_is_stable() {
        let src = "export class A<T> implements B {\n  private x: T;\n  m<U>(u: U): T { return this.x as T; }\n}\n";
        let once = strip_default(src);
        assert_eq!(once, "export class A {\n  x;\n  m(u) { return this.x; }\n}\n");
        assert_eq!(strip_default(&once), once);
    }

    /// Aliased specifiers are remapped relative to the importing file, then their extension
    /// rewritten.
    #[test]
    fn remaps_and_rewrites_specifiers() {
        assert_eq!(
            strip_remapped(r#"import { b } from "$a/b.ts";"#, "./x.ts", &[("$a/", "./lib/a/")]),
            r#"import { b } from "./lib/a/b.js";"#
        );

        let src = "import { foo } from \"$foo/foo.ts\";\nimport { baz } from \"$baz\";\n";
        assert_eq!(
            strip_remapped(src, "./lib/a.ts", &[("$foo/", "./foo/"), ("$baz", "@baz")]),
            "import { foo } from \"../foo/foo.js\";\nimport { baz } from \"@baz\";\n"
        );
    }

    /// Specifiers of removed statements are never rewritten.
    #[test]
    fn removed_statement_specifier_is_not_rewritten() {
        assert_eq!(
            strip_remapped(r#"import type { T } from "$a/t.ts";"#, "./x.ts", &[("$a/", "./a/")]),
            ""
        );
    }

    /// The pretty-print pass runs after stripping.
    #[test]
    fn pretty_print_reindents() {
        let options = StripOptions {
            pretty_print: true,
            ..StripOptions::default()
        };
        let src = "function f(a: string) {\n    return \"\\u00e9\" + a;\n}\n";
        assert_eq!(
            strip(src, &options).unwrap(),
            "function f(a) {\n  return \"é\" + a;\n}\n"
        );
    }

    /// Sourcemaps are refused together with pretty printing.
    #[test]
    fn sourcemap_rejects_pretty_print() {
        let options = StripOptions {
            pretty_print: true,
            ..StripOptions::default()
        };
        let err = strip_with_sourcemap("let a;", &options).unwrap_err();
        assert!(matches!(err, StripError::InvalidOptions(_)));
    }

    /// The file name is checked before anything is parsed.
    #[test]
    fn rejects_file_names_first() {
        let options = StripOptions {
            file_name: "App.tsx".to_string(),
            ..StripOptions::default()
        };
        let err = strip("enum E {}", &options).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::Jsx));
    }

    /// Output never grows without rewrites.
    #[test]
    fn output_is_never_longer() {
        let src = "type A = { a: 1 };\nlet v: A | undefined = undefined!;\n";
        let out = strip_default(src);
        assert_eq!(out, "let v = undefined;\n");
        assert!(out.len() <= src.len());
    }

    /// An anonymous default-exported abstract class loses the keyword and its abstract members.
    #[test]
    fn strips_default_abstract_class() {
        assert_eq!(
            strip_default("export default abstract class { abstract m(): void; x: number = 1; }"),
            "export default class { x = 1; }"
        );
    }
}
