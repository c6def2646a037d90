//! TypeScript type stripping library (with WASM bindings).
//!
//! This crate erases type-only syntax from TypeScript source and leaves everything else
//! byte-for-byte in place: whitespace, line breaks and (unless asked otherwise) comments survive,
//! so the output lines up with the input without a reprint.
//!
//! Entry points:
//!
//! - [`strip()`] returns the stripped code.
//! - [`strip_with_sourcemap()`] also returns a sourcemap mapping the output back to the input.
//!
//! Constructs that carry runtime semantics (enums, namespaces, parameter properties, decorators,
//! ambient declarations, overloads, auto-accessors and `<T>expr` casts) are rejected with a
//! [`StripError::Unsupported`] carrying an [`ErrorCode`]. JSX is refused by file name.
//! Input the parser cannot read fails with [`StripError::Syntax`].
//!
//! Internals:
//!
//! - [`alloc`] contains the tree-sitter allocator override for WASM targets.
//! - [`parse`] contains the tree-sitter parsing logic and the file-name pre-check.
//! - [`visit`] classifies CST nodes and collects removal ranges.
//! - [`edit`] holds the removal model and the output assembler.
//! - [`comments`] locates the removable extent of a comment.
//! - [`specifier`] remaps and rewrites module specifiers.
//! - [`pretty`] is the cosmetic post-pass.
//! - [`mapping`] builds sourcemaps from assembled output.

use std::fmt;

pub mod alloc;
pub mod comments;
pub mod edit;
pub mod mapping;
pub mod parse;
pub mod pretty;
pub mod specifier;
pub mod strip;
pub mod visit;

pub use specifier::RemapConfig;
pub use strip::{CodeAndSourcemap, StripOptions, strip, strip_with_sourcemap};

/// Reason a construct cannot be erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Extension,
    Filename,
    Jsx,
    Enum,
    Namespace,
    Declare,
    Decorator,
    AccessorKeyword,
    Overload,
    ParameterProperty,
    TypeAssertionExpression,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 11] = [
        ErrorCode::Extension,
        ErrorCode::Filename,
        ErrorCode::Jsx,
        ErrorCode::Enum,
        ErrorCode::Namespace,
        ErrorCode::Declare,
        ErrorCode::Decorator,
        ErrorCode::AccessorKeyword,
        ErrorCode::Overload,
        ErrorCode::ParameterProperty,
        ErrorCode::TypeAssertionExpression,
    ];

    /// Stable machine-readable code, e.g. `"parameter-property"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Extension => "extension",
            ErrorCode::Filename => "filename",
            ErrorCode::Jsx => "jsx",
            ErrorCode::Enum => "enum",
            ErrorCode::Namespace => "namespace",
            ErrorCode::Declare => "declare",
            ErrorCode::Decorator => "decorator",
            ErrorCode::AccessorKeyword => "accessor-keyword",
            ErrorCode::Overload => "overload",
            ErrorCode::ParameterProperty => "parameter-property",
            ErrorCode::TypeAssertionExpression => "type-assertion-expression",
        }
    }

    /// Inverse of [`ErrorCode::as_str`].
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }

    /// Fixed human-readable message for this code.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Extension => {
                "Only TypeScript files with a .ts, .mts or .cts extension are supported"
            }
            ErrorCode::Filename => "The file name must have an extension",
            ErrorCode::Jsx => {
                "JSX is not supported by the TC39 type annotation proposal. It is a syntax extension that needs to be compiled to JavaScript function calls"
            }
            ErrorCode::Enum => {
                "Enums are not supported by the TC39 type annotation proposal. They have runtime semantics, generating JavaScript code. An alternative pattern is to use a const object"
            }
            ErrorCode::Namespace => {
                "Namespaces are a legacy TypeScript specific construct to provide modularity and an encapsulation. They are not supported by the TC39 type annotation proposal. Standard ES modules are the preferred way to address these needs"
            }
            ErrorCode::Declare => {
                "Ambient declarations using the `declare` keyword are not supported. They only describe types and belong in a declaration file"
            }
            ErrorCode::Decorator => {
                "Decorators are not supported. TypeScript experimental decorators have runtime semantics that differ from the TC39 decorators proposal"
            }
            ErrorCode::AccessorKeyword => {
                "The `accessor` keyword is not supported. Auto-accessors generate a runtime getter and setter pair"
            }
            ErrorCode::Overload => {
                "Function and method overloads are not supported. Keep only the implementation signature or move the overloads to a declaration file"
            }
            ErrorCode::ParameterProperty => {
                "Parameter properties are not supported by the TC39 type annotation proposal. They have runtime semantics, assigning constructor arguments to class fields. Declare the fields and assign them in the constructor body instead"
            }
            ErrorCode::TypeAssertionExpression => {
                "Angle-bracket type assertions are not supported by the TC39 type annotation proposal. Use the `as` operator instead"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during stripping.
#[derive(thiserror::Error, Debug)]
pub enum StripError {
    #[error("{}", .0.message())]
    Unsupported(ErrorCode),

    #[error("tree-sitter failed to parse input")]
    ParseFailed,

    #[error("syntax error at byte {0}")]
    Syntax(usize),

    #[error("invalid removal range: {0}")]
    InvalidRange(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("invalid sourcemap: {0}")]
    SourceMap(#[from] sourcemap::Error),
}

impl StripError {
    /// The [`ErrorCode`] of an unsupported-construct rejection, if this is one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            StripError::Unsupported(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<ErrorCode> for StripError {
    fn from(code: ErrorCode) -> Self {
        StripError::Unsupported(code)
    }
}
