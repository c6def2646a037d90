use std::{cell::RefCell, ops::Range};

use tree_sitter::{Node, Parser, Tree};

use crate::{ErrorCode, StripError, alloc::ensure_tree_sitter_allocator};

thread_local! {
    /// Shared Tree-sitter parser instance. We reuse it to avoid reloading the grammar for each call.
    static TYPESCRIPT_PARSER: RefCell<Parser> = {
        ensure_tree_sitter_allocator();

        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();
        parser
            .set_language(&language)
            .expect("tree-sitter-typescript language load failed");
        RefCell::new(parser)
    };
}

/// A parse tree plus the TypeScript-only keywords that had to be blanked out to get it.
pub struct Parsed {
    pub tree: Tree,
    /// Byte ranges of blanked keywords. The tree sees spaces there; the output must drop them.
    pub masked: Vec<Range<usize>>,
}

/// Parse TypeScript source.
///
/// A tree that still holds `ERROR`/`MISSING` nodes after keyword blanking is rejected with
/// [`StripError::Syntax`] at the first one.
pub fn parse(source: &str) -> Result<Parsed, StripError> {
    let mut tree = parse_tree(source)?;
    let masked = misplaced_keywords(tree.root_node());
    if !masked.is_empty() {
        let mut blanked = source.to_string();
        for range in &masked {
            log::debug!("blanking misplaced keyword at byte {}", range.start);
            blanked.replace_range(range.clone(), &" ".repeat(range.len()));
        }
        tree = parse_tree(&blanked)?;
    }

    if let Some(error) = first_error(tree.root_node()) {
        log::warn!(
            "input contains syntax errors, first at byte {} ({})",
            error.start_byte(),
            error.kind()
        );
        return Err(StripError::Syntax(error.start_byte()));
    }
    Ok(Parsed { tree, masked })
}

fn parse_tree(source: &str) -> Result<Tree, StripError> {
    ensure_tree_sitter_allocator();

    TYPESCRIPT_PARSER
        .with(|p| {
            let mut parser = p.borrow_mut();
            parser.parse(source, None)
        })
        .ok_or(StripError::ParseFailed)
}

/// The first `ERROR` or `MISSING` node in source order.
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    if !root.has_error() {
        return None;
    }
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        // Only subtrees with an error below them are entered.
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Keywords the grammar cannot place.
///
/// `export default abstract class { .. }` puts `abstract class` in an `ERROR` node and reads the
/// body as an object literal. With `abstract` blanked the statement parses as a class expression.
fn misplaced_keywords(root: Node<'_>) -> Vec<Range<usize>> {
    let mut cursor = root.walk();
    root.children(&mut cursor)
        .filter(|stmt| stmt.kind() == "export_statement")
        .filter_map(|stmt| {
            let mut cursor = stmt.walk();
            let children: Vec<Node<'_>> = stmt.children(&mut cursor).collect();
            if !children.iter().any(|c| !c.is_named() && c.kind() == "default") {
                return None;
            }
            let error = children.iter().find(|c| c.is_error())?;

            let mut cursor = error.walk();
            let tokens: Vec<Node<'_>> = error.children(&mut cursor).collect();
            match tokens.as_slice() {
                [kw, class] if kw.kind() == "abstract" && class.kind() == "class" => {
                    Some(kw.byte_range())
                }
                _ => None,
            }
        })
        .collect()
}

/// Reject file names the stripper cannot handle, before any parsing happens.
///
/// Only the last path component is inspected. `.ts`, `.mts` and `.cts` are accepted; `.tsx` and
/// `.jsx` are markup dialects.
pub fn check_file_name(file_name: &str) -> Result<(), StripError> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let Some((_, extension)) = base.rsplit_once('.') else {
        return Err(ErrorCode::Filename.into());
    };

    match extension {
        "ts" | "mts" | "cts" => Ok(()),
        "tsx" | "jsx" => Err(ErrorCode::Jsx.into()),
        _ => Err(ErrorCode::Extension.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(file_name: &str) -> Option<ErrorCode> {
        check_file_name(file_name).err().and_then(|e| e.code())
    }

    /// TypeScript module flavours are accepted.
    #[test]
    fn accepts_typescript_extensions() {
        for name in ["input.ts", "a.b.mts", "dir/file.cts", r"C:\src\main.ts", ".ts"] {
            assert!(check_file_name(name).is_ok(), "{name}");
        }
    }

    /// Markup dialects, foreign extensions and extension-less names are rejected.
    #[test]
    fn rejects_other_file_names() {
        assert_eq!(code_of("component.tsx"), Some(ErrorCode::Jsx));
        assert_eq!(code_of("component.jsx"), Some(ErrorCode::Jsx));
        assert_eq!(code_of("script.js"), Some(ErrorCode::Extension));
        assert_eq!(code_of("Makefile"), Some(ErrorCode::Filename));
        assert_eq!(code_of("dir.v2/Makefile"), Some(ErrorCode::Filename));
    }

    /// The parser yields a tree for plain TypeScript.
    #[test]
    fn parses_typescript() {
        let parsed = parse("const x: number = 1;").unwrap();
        let root = parsed.tree.root_node();
        assert_eq!(root.kind(), "program");
        assert!(!root.has_error());
        assert!(parsed.masked.is_empty());
    }

    /// `abstract` on an anonymous default-exported class is blanked so the class parses.
    #[test]
    fn blanks_default_abstract_class_keyword() {
        let src = "export default abstract class { x: number = 1; }";
        let parsed = parse(src).unwrap();
        assert_eq!(parsed.masked, vec![15..23]);
        assert_eq!(&src[15..23], "abstract");

        let root = parsed.tree.root_node();
        assert!(!root.has_error());
        let value = root
            .child(0)
            .and_then(|stmt| stmt.child_by_field_name("value"))
            .unwrap();
        assert_eq!(value.kind(), "class");
    }

    /// Input the parser had to recover from fails at the first broken node.
    #[test]
    fn rejects_recovered_trees() {
        let err = parse("export class {\n  name: string;\n}").err().unwrap();
        assert!(matches!(err, StripError::Syntax(7)), "got {err:?}");

        // Errors inside text that would be removed are still errors.
        let err = parse("interface A { a: }\nlet b;").err().unwrap();
        assert!(matches!(err, StripError::Syntax(_)), "got {err:?}");
    }

    /// Named abstract classes parse normally and need no blanking.
    #[test]
    fn named_default_abstract_class_is_untouched() {
        let parsed = parse("export default abstract class Foo {}").unwrap();
        assert!(parsed.masked.is_empty());
        assert!(!parsed.tree.root_node().has_error());
    }
}
