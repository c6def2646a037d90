use std::{fs, path::PathBuf};

use clap::Parser;
use tree_sitter::Parser as TsParser;

#[derive(Parser, Debug)]
#[command(name = "parse")]
#[command(about = "Parse a TypeScript file with tree-sitter and print the CST", long_about = None)]
struct Args {
    /// Path to the source file to parse
    input: PathBuf,

    /// Print the tree in S-expression format instead of the default dump format
    #[arg(long, short)]
    sexp: bool,

    /// Only print named nodes
    #[arg(long)]
    named: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let source = fs::read_to_string(&args.input)?;

    let mut parser = TsParser::new();
    parser.set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())?;

    let tree = parser
        .parse(&source, None)
        .ok_or_else(|| std::io::Error::other("tree-sitter failed to parse input"))?;

    let root = tree.root_node();

    if args.sexp {
        println!("{}", root.to_sexp());
    } else {
        dump_tree(&source, root, 0, args.named);
    }

    if root.has_error() {
        eprintln!("warning: the tree contains syntax errors");
    }

    Ok(())
}

fn dump_tree(source: &str, node: tree_sitter::Node<'_>, depth: usize, named_only: bool) {
    let indent = "  ".repeat(depth);

    let start = node.start_position();
    let end = node.end_position();

    let text_preview = node
        .utf8_text(source.as_bytes())
        .ok()
        .map(|t| t.replace('\n', "\\n"))
        .unwrap_or_else(|| "<non-utf8>".to_string());

    let field = node
        .parent()
        .and_then(|parent| {
            let mut cursor = parent.walk();
            let index = parent.children(&mut cursor).position(|c| c.id() == node.id())?;
            parent.field_name_for_child(index as u32)
        })
        .map(|name| format!("{name}: "))
        .unwrap_or_default();

    println!(
        "{indent}{field}{kind} [{start_byte}..{end_byte}] ({sl}:{sc})..({el}:{ec}) \"{text}\"",
        kind = node.kind(),
        start_byte = node.start_byte(),
        end_byte = node.end_byte(),
        sl = start.row,
        sc = start.column,
        el = end.row,
        ec = end.column,
        text = truncate(&text_preview, 120),
    );

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if named_only && !child.is_named() {
            continue;
        }
        dump_tree(source, child, depth + 1, named_only);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }

    // Try to truncate on a UTF-8 boundary.
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
