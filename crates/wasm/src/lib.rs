//! wasm-bindgen exports.
//!
//! This module exposes the type stripper to JavaScript via `wasm-bindgen`.
//! The underlying logic lives in the `ts-type-strip` crate.

use indexmap::IndexMap;
use wasm_bindgen::prelude::*;

use ts_type_strip::{RemapConfig, StripError, StripOptions};

/// Options for type stripping. Every field is optional.
#[derive(Debug, Clone, Default, serde::Deserialize, tsify::Tsify)]
#[serde(rename_all = "camelCase")]
#[tsify(from_wasm_abi)]
pub struct TypeStripOptions {
    /// Remove comments as well as types.
    #[serde(default)]
    #[tsify(optional)]
    pub remove_comments: Option<bool>,
    /// Input file name (`.ts`, `.mts` or `.cts`). Defaults to `input.ts`.
    #[serde(default)]
    #[tsify(optional)]
    pub file_name: Option<String>,
    /// Decode `\uXXXX` escapes and halve four-space indentation.
    #[serde(default)]
    #[tsify(optional)]
    pub pretty_print: Option<bool>,
    /// Rewrite `.ts`/`.mts`/`.cts` specifiers to `.js`/`.mjs`/`.cjs`.
    #[serde(default, alias = "rewritePaths")]
    #[tsify(optional)]
    pub path_rewriting: Option<bool>,
    /// Remap aliased module specifiers.
    #[serde(default)]
    #[tsify(optional)]
    pub remap_specifiers: Option<RemapSpecifiers>,
}

/// Alias table for specifier remapping.
#[derive(Debug, Clone, Default, serde::Deserialize, tsify::Tsify)]
#[serde(rename_all = "camelCase")]
pub struct RemapSpecifiers {
    /// Path of the file being stripped, relative to the alias root.
    pub file_path: String,
    /// Alias prefix to replacement path; the first matching key wins.
    #[tsify(type = "Record<string, string>")]
    pub imports: IndexMap<String, String>,
}

impl From<TypeStripOptions> for StripOptions {
    fn from(val: TypeStripOptions) -> Self {
        let defaults = StripOptions::default();
        StripOptions {
            remove_comments: val.remove_comments.unwrap_or(defaults.remove_comments),
            file_name: val.file_name.unwrap_or(defaults.file_name),
            pretty_print: val.pretty_print.unwrap_or(defaults.pretty_print),
            path_rewriting: val.path_rewriting.unwrap_or(defaults.path_rewriting),
            remap_specifiers: val.remap_specifiers.map(|remap| RemapConfig {
                file_path: remap.file_path,
                imports: remap.imports,
            }),
        }
    }
}

/// Output from the wasm API when a sourcemap is requested.
#[derive(Debug, Clone, serde::Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
pub struct StripOutput {
    /// The stripped JavaScript.
    pub code: String,
    /// The sourcemap JSON.
    pub sourcemap: String,
}

/// Convert a [`StripError`] into a JS `Error`, with `code` set for unsupported constructs.
fn to_js_error(err: StripError) -> JsValue {
    let js_err = js_sys::Error::new(&err.to_string());
    if let Some(code) = err.code() {
        // Setting a property on a fresh Error object cannot fail.
        let _ = js_sys::Reflect::set(
            &js_err,
            &JsValue::from_str("code"),
            &JsValue::from_str(code.as_str()),
        );
    }
    js_err.into()
}

/// Strip type syntax from TypeScript source.
#[wasm_bindgen(js_name = strip)]
pub fn strip_types(code: String, options: TypeStripOptions) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let options: StripOptions = options.into();
    ts_type_strip::strip(&code, &options).map_err(to_js_error)
}

/// Strip type syntax and create a sourcemap for the result.
///
/// The file name option is recorded as the sourcemap's source filename.
#[wasm_bindgen(js_name = stripWithSourcemap)]
pub fn strip_types_with_sourcemap(
    code: String,
    options: TypeStripOptions,
) -> Result<StripOutput, JsValue> {
    console_error_panic_hook::set_once();

    let options: StripOptions = options.into();
    let res = ts_type_strip::strip_with_sourcemap(&code, &options).map_err(to_js_error)?;
    Ok(StripOutput {
        code: res.code,
        sourcemap: res.sourcemap,
    })
}
