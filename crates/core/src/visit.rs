//! Node classification.
//!
//! [`Erasure`] walks the tree-sitter CST once, pre-order, and decides for each node kind whether
//! to remove it, strip parts of it, rewrite its module specifier, reject it, or just descend.
//! Unlisted kinds record nothing and descend into every child.
//!
//! Notes:
//!
//! - tree-sitter folds the punctuation into the type nodes: `type_annotation` starts at its `:`
//!   and `type_arguments`/`type_parameters` include both angle brackets, so removing the node
//!   removes the punctuation.
//! - Modifier keywords (`declare`, `accessor`, `readonly`, `abstract`, `?`, `!`) are anonymous
//!   children and are matched by kind on unnamed nodes.
//! - A node whose text is already scheduled for removal goes into the skip set so its subtree is
//!   never visited.
//! - The first unsupported construct aborts the walk.

use std::collections::HashSet;

use tree_sitter::Node;

use crate::{
    ErrorCode, StripError,
    comments::{at_line_end, comment_range, skip_space_back, skip_space_forward},
    edit::{RemovalRange, SpecifierRewrite, Trailing},
    specifier::specifier_rewrite,
    strip::StripOptions,
};

/// Whether the walk continues into a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Descend,
    Skip,
}

/// Everything a walk produced.
#[derive(Debug, Default)]
pub struct Collected {
    pub ranges: Vec<RemovalRange>,
    pub rewrites: Vec<SpecifierRewrite>,
}

/// Per-call erasure state.
pub struct Erasure<'a> {
    source: &'a str,
    options: &'a StripOptions,
    ranges: Vec<RemovalRange>,
    rewrites: Vec<SpecifierRewrite>,
    skip: HashSet<usize>,
}

fn reject(code: ErrorCode, node: Node<'_>) -> StripError {
    log::debug!(
        "rejecting {} at byte {} ({})",
        code,
        node.start_byte(),
        node.kind()
    );
    StripError::Unsupported(code)
}

/// First direct child that is an anonymous `keyword` token.
fn keyword<'t>(node: Node<'t>, keyword: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find(|c| !c.is_named() && c.kind() == keyword)
}

/// First named direct child of the given kind.
fn named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|c| c.kind() == kind)
}

/// First named direct child that is not a comment.
fn first_operand(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|c| c.kind() != "comment")
}

/// Direct children that come before the `name` field (the modifier area of a declaration).
fn leading_children(node: Node<'_>) -> Vec<Node<'_>> {
    let name = node.child_by_field_name("name").map(|n| n.id());
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .take_while(|c| Some(c.id()) != name)
        .collect()
}

impl<'a> Erasure<'a> {
    pub fn new(source: &'a str, options: &'a StripOptions) -> Self {
        Self {
            source,
            options,
            ranges: Vec::new(),
            rewrites: Vec::new(),
            skip: HashSet::new(),
        }
    }

    /// Walk the tree rooted at `root` and collect removals and rewrites.
    pub fn collect(mut self, root: Node<'_>) -> Result<Collected, StripError> {
        // Iterative traversal over a TreeCursor; deep inputs must not overflow the stack.
        let mut cursor = root.walk();
        'walk: loop {
            let node = cursor.node();
            let flow = if self.skip.contains(&node.id()) {
                Flow::Skip
            } else {
                self.visit(node)?
            };

            if flow == Flow::Descend && cursor.goto_first_child() {
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    break 'walk;
                }
            }
        }

        Ok(Collected {
            ranges: self.ranges,
            rewrites: self.rewrites,
        })
    }

    fn visit(&mut self, node: Node<'_>) -> Result<Flow, StripError> {
        if !node.is_named() {
            return Ok(Flow::Descend);
        }

        match node.kind() {
            "comment" => {
                if self.options.remove_comments
                    && let Some(range) =
                        comment_range(self.source, node.start_byte(), node.end_byte())
                {
                    self.ranges.push(range);
                }
                Ok(Flow::Skip)
            }

            "interface_declaration" | "type_alias_declaration" => {
                self.remove_statement(node);
                Ok(Flow::Skip)
            }
            "abstract_method_signature" | "index_signature" => {
                self.remove_member(node);
                Ok(Flow::Skip)
            }
            "type_annotation"
            | "type_arguments"
            | "type_parameters"
            | "asserts_annotation"
            | "type_predicate_annotation" => {
                self.remove(node);
                Ok(Flow::Skip)
            }

            "enum_declaration" => Err(reject(ErrorCode::Enum, node)),
            "internal_module" | "module" => Err(reject(ErrorCode::Namespace, node)),
            "ambient_declaration" => Err(reject(ErrorCode::Declare, node)),
            "decorator" => Err(reject(ErrorCode::Decorator, node)),
            "type_assertion" => Err(reject(ErrorCode::TypeAssertionExpression, node)),
            "function_signature" | "method_signature" => Err(reject(ErrorCode::Overload, node)),

            "import_statement" => self.visit_import(node),
            "export_statement" => self.visit_export(node),
            "variable_declarator" => {
                if let Some(bang) = keyword(node, "!") {
                    self.remove(bang);
                }
                Ok(Flow::Descend)
            }
            "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "arrow_function"
            | "method_definition" => self.visit_function_like(node),
            "required_parameter" | "optional_parameter" => self.visit_parameter(node),
            "class_declaration" | "abstract_class_declaration" | "class" => {
                self.visit_class_like(node)
            }
            "public_field_definition" => {
                self.check_modifiers(node)?;
                if keyword(node, "abstract").is_some() {
                    self.remove_member(node);
                    return Ok(Flow::Skip);
                }
                self.strip_member_modifiers(node);
                if let Some(ty) = node.child_by_field_name("type") {
                    self.remove(ty);
                }
                Ok(Flow::Descend)
            }
            "call_expression" => self.visit_call(node),
            "new_expression" | "instantiation_expression" => {
                if let Some(args) = node.child_by_field_name("type_arguments") {
                    self.remove(args);
                }
                Ok(Flow::Descend)
            }
            "binary_expression" => {
                self.visit_tagged_template(node);
                Ok(Flow::Descend)
            }
            "as_expression" | "satisfies_expression" | "non_null_expression" => {
                self.visit_assertion(node);
                Ok(Flow::Descend)
            }

            _ => Ok(Flow::Descend),
        }
    }

    /// Schedule exact removal of `node` and skip its subtree.
    fn remove(&mut self, node: Node<'_>) {
        self.ranges
            .push(RemovalRange::new(node.start_byte(), node.end_byte()));
        self.skip.insert(node.id());
    }

    /// Remove a statement, taking its line with it when it is alone there.
    fn remove_statement(&mut self, node: Node<'_>) {
        let range = self.line_aware(node.start_byte(), node.end_byte(), false);
        self.ranges.push(range);
        self.skip.insert(node.id());
    }

    /// Remove a class member together with its `;`/`,` terminator.
    fn remove_member(&mut self, node: Node<'_>) {
        let range = self.line_aware(node.start_byte(), node.end_byte(), true);
        self.ranges.push(range);
        self.skip.insert(node.id());
    }

    fn line_aware(&self, start: usize, end: usize, terminated: bool) -> RemovalRange {
        let bytes = self.source.as_bytes();

        let line_start = skip_space_back(bytes, start);
        let owns_line_start = line_start == 0 || bytes[line_start - 1] == b'\n';

        let mut end = end;
        let mut tail = skip_space_forward(bytes, end);
        if terminated && matches!(bytes.get(tail), Some(b';' | b',')) {
            tail = skip_space_forward(bytes, tail + 1);
        }
        // A trailing comment that is going away anyway goes with the statement.
        if let Some(comment_end) = self.removed_comment_end(tail) {
            end = comment_end;
            tail = skip_space_forward(bytes, comment_end);
        }
        let ends_line = at_line_end(bytes, tail);

        let (line_trailing, inline_trailing) = if terminated {
            (Trailing::TerminatorLineBreak, Trailing::Terminator)
        } else {
            (Trailing::LineBreak, Trailing::Space)
        };

        match (owns_line_start, ends_line) {
            (true, true) => RemovalRange::with_trailing(line_start, end, line_trailing),
            (false, true) if terminated => {
                RemovalRange::with_trailing(line_start, end, Trailing::Terminator)
            }
            (false, true) => RemovalRange::new(line_start, end),
            _ => RemovalRange::with_trailing(start, end, inline_trailing),
        }
    }

    /// End of a comment starting at `pos` that ends its line, when comments are being removed.
    fn removed_comment_end(&self, pos: usize) -> Option<usize> {
        if !self.options.remove_comments {
            return None;
        }
        let rest = &self.source[pos..];
        let end = if rest.starts_with("//") {
            let len = rest.find('\n').unwrap_or(rest.len());
            pos + rest[..len].strip_suffix('\r').map_or(len, str::len)
        } else if rest.starts_with("/*") {
            pos + rest.find("*/")? + 2
        } else {
            return None;
        };
        at_line_end(self.source.as_bytes(), skip_space_forward(self.source.as_bytes(), end))
            .then_some(end)
    }

    /// Reject modifiers that have runtime semantics: decorators, `declare` and `accessor`.
    fn check_modifiers(&self, node: Node<'_>) -> Result<(), StripError> {
        for child in leading_children(node) {
            match (child.is_named(), child.kind()) {
                (true, "decorator") => return Err(reject(ErrorCode::Decorator, child)),
                (false, "declare") => return Err(reject(ErrorCode::Declare, child)),
                (false, "accessor") => return Err(reject(ErrorCode::AccessorKeyword, child)),
                _ => {}
            }
        }
        Ok(())
    }

    /// Strip TypeScript-only member modifiers and the `?`/`!` markers after the name.
    fn strip_member_modifiers(&mut self, node: Node<'_>) {
        for child in leading_children(node) {
            let type_only = match (child.is_named(), child.kind()) {
                (true, "accessibility_modifier" | "override_modifier") => true,
                (false, "readonly" | "abstract") => true,
                _ => false,
            };
            if type_only {
                self.ranges.push(RemovalRange::with_trailing(
                    child.start_byte(),
                    child.end_byte(),
                    Trailing::Space,
                ));
                self.skip.insert(child.id());
            }
        }

        for marker in ["?", "!"] {
            if let Some(token) = keyword(node, marker) {
                self.remove(token);
            }
        }
    }

    fn visit_function_like(&mut self, node: Node<'_>) -> Result<Flow, StripError> {
        self.check_modifiers(node)?;

        if node.child_by_field_name("body").is_none() {
            return Err(reject(ErrorCode::Overload, node));
        }
        if node.kind() == "method_definition" {
            self.strip_member_modifiers(node);
        }
        for field in ["type_parameters", "return_type"] {
            if let Some(child) = node.child_by_field_name(field) {
                self.remove(child);
            }
        }
        Ok(Flow::Descend)
    }

    fn visit_parameter(&mut self, node: Node<'_>) -> Result<Flow, StripError> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match (child.is_named(), child.kind()) {
                (true, "accessibility_modifier" | "override_modifier") | (false, "readonly") => {
                    return Err(reject(ErrorCode::ParameterProperty, node));
                }
                _ => {}
            }
        }

        // `this` parameters only exist for the checker.
        if node
            .child_by_field_name("pattern")
            .is_some_and(|p| p.kind() == "this")
        {
            self.ranges.push(RemovalRange::with_trailing(
                node.start_byte(),
                node.end_byte(),
                Trailing::ListComma,
            ));
            self.skip.insert(node.id());
            return Ok(Flow::Skip);
        }

        if let Some(question) = keyword(node, "?") {
            self.remove(question);
        }
        if let Some(ty) = node.child_by_field_name("type") {
            self.remove(ty);
        }
        Ok(Flow::Descend)
    }

    fn visit_class_like(&mut self, node: Node<'_>) -> Result<Flow, StripError> {
        self.check_modifiers(node)?;

        if let Some(abstract_kw) = keyword(node, "abstract") {
            self.ranges.push(RemovalRange::with_trailing(
                abstract_kw.start_byte(),
                abstract_kw.end_byte(),
                Trailing::Space,
            ));
        }
        if let Some(params) = node.child_by_field_name("type_parameters") {
            self.remove(params);
        }
        if let Some(heritage) = named_child_of_kind(node, "class_heritage")
            && let Some(implements) = named_child_of_kind(heritage, "implements_clause")
        {
            self.ranges.push(RemovalRange::with_trailing(
                implements.start_byte(),
                implements.end_byte(),
                Trailing::Whitespace,
            ));
            self.skip.insert(implements.id());
        }
        Ok(Flow::Descend)
    }

    /// `expr as T`, `expr satisfies T` and `expr!` keep only `expr`.
    fn visit_assertion(&mut self, node: Node<'_>) {
        let Some(expr) = first_operand(node) else {
            return;
        };
        // `as const` has no named type node; the last named child is then the operand itself.
        let target = node.named_child((node.named_child_count() as u32).saturating_sub(1));
        let end = match target {
            Some(ty)
                if ty.id() != expr.id()
                    && ty.kind() != "comment"
                    && node.kind() != "non_null_expression" =>
            {
                self.type_end(ty)
            }
            _ => node.end_byte(),
        };
        self.ranges.push(RemovalRange::new(expr.end_byte(), end));

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.id() != expr.id() {
                self.skip.insert(child.id());
            }
        }
    }

    /// End of an `as`/`satisfies` target type.
    ///
    /// A `[` after a line break cannot continue a type, but the grammar folds it into
    /// `T[]`/`T[K]` anyway. The type ends before the earliest such bracket; what follows is an
    /// element access on the asserted expression.
    fn type_end(&self, ty: Node<'_>) -> usize {
        let mut end = ty.end_byte();
        let mut current = ty;
        while matches!(current.kind(), "array_type" | "lookup_type") {
            let Some(inner) = current.named_child(0) else {
                break;
            };
            if let Some(open) = keyword(current, "[")
                && self
                    .source
                    .get(inner.end_byte()..open.start_byte())
                    .is_some_and(|gap| gap.contains('\n'))
            {
                end = inner.end_byte();
            }
            current = inner;
        }
        end
    }

    /// `` tag<A>`x` `` parses as `(tag < A) > `x``, and `` tag<A, B>`x` `` as a comma list
    /// ending in `B > `x``. The comparison operators are really the type argument brackets.
    fn visit_tagged_template(&mut self, node: Node<'_>) {
        let (Some(op), Some(right)) = (
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) else {
            return;
        };
        if op.kind() != ">" || right.kind() != "template_string" {
            return;
        }
        let Some(open) = self.type_argument_open(node, op.start_byte()) else {
            return;
        };

        log::debug!("stripping tagged template type arguments at byte {}", open.start_byte());
        self.ranges
            .push(RemovalRange::new(open.start_byte(), op.end_byte()));
        if let Some(less) = open.parent()
            && let Some(argument) = less.child_by_field_name("right")
            && argument.end_byte() <= op.start_byte()
        {
            self.skip.insert(argument.id());
        }
    }

    /// The `<` operator token that pairs with a `>` at `close`, if the text between them reads
    /// like a type argument list.
    fn type_argument_open<'t>(&self, node: Node<'t>, close: usize) -> Option<Node<'t>> {
        let bytes = self.source.as_bytes();
        let mut depth = 1usize;
        let mut pos = close;
        let lt = loop {
            pos = pos.checked_sub(1)?;
            match bytes[pos] {
                b'>' => depth += 1,
                b'<' => {
                    depth -= 1;
                    if depth == 0 {
                        break pos;
                    }
                }
                b if b.is_ascii_alphanumeric() || b.is_ascii_whitespace() => {}
                b'_' | b'$' | b',' | b'.' | b'[' | b']' | b'|' | b'&' => {}
                _ => return None,
            }
        };

        // The `<` must be the operator of a comparison whose left side is the tag.
        let mut scope = node;
        while scope.start_byte() > lt {
            scope = scope.parent()?;
        }
        let token = scope.descendant_for_byte_range(lt, lt + 1)?;
        let less = token.parent()?;
        let is_tag_bracket = !token.is_named()
            && token.kind() == "<"
            && less.kind() == "binary_expression"
            && less
                .child_by_field_name("left")
                .is_some_and(|tag| tag.end_byte() <= lt);
        if !is_tag_bracket {
            return None;
        }

        // Either `(tag < A) > `x``, or `tag < A` and `B > `x`` as items of one comma list.
        let nested = node
            .child_by_field_name("left")
            .is_some_and(|left| left.id() == less.id());
        let listed = match (less.parent(), node.parent()) {
            (Some(a), Some(b)) => {
                a.id() == b.id()
                    && matches!(a.kind(), "sequence_expression" | "arguments" | "array")
            }
            _ => false,
        };
        let between = &self.source[lt..close];
        let logical = between.contains("&&") || between.contains("||");
        ((nested || listed) && !logical).then_some(token)
    }

    fn visit_call(&mut self, node: Node<'_>) -> Result<Flow, StripError> {
        if let Some(args) = node.child_by_field_name("type_arguments") {
            self.remove(args);
        }

        let Some(arguments) = node.child_by_field_name("arguments") else {
            return Ok(Flow::Descend);
        };
        let is_dynamic_import = node
            .child_by_field_name("function")
            .is_some_and(|f| f.kind() == "import");
        if is_dynamic_import && let Some(specifier) = first_operand(arguments) {
            self.visit_specifier(specifier)?;
        }

        // Plain identifiers carry nothing to strip.
        let mut cursor = arguments.walk();
        for arg in arguments.named_children(&mut cursor) {
            if arg.kind() == "identifier" {
                self.skip.insert(arg.id());
            }
        }
        Ok(Flow::Descend)
    }

    fn visit_import(&mut self, node: Node<'_>) -> Result<Flow, StripError> {
        if keyword(node, "type").is_some() || keyword(node, "typeof").is_some() {
            self.remove_statement(node);
            return Ok(Flow::Skip);
        }

        if let Some(clause) = named_child_of_kind(node, "import_clause")
            && let Some(named) = named_child_of_kind(clause, "named_imports")
        {
            let specifiers = Self::specifiers(named, "import_specifier");
            if self.filter_specifiers(&specifiers) {
                match named_child_of_kind(clause, "identifier") {
                    // `import D, { type T }` keeps the default binding.
                    Some(default) => {
                        self.ranges
                            .push(RemovalRange::new(default.end_byte(), named.end_byte()));
                        self.skip.insert(named.id());
                    }
                    None => {
                        self.remove_statement(node);
                        return Ok(Flow::Skip);
                    }
                }
            }
        }

        if let Some(source) = node.child_by_field_name("source") {
            self.visit_specifier(source)?;
        }
        Ok(Flow::Descend)
    }

    fn visit_export(&mut self, node: Node<'_>) -> Result<Flow, StripError> {
        if keyword(node, "type").is_some() {
            self.remove_statement(node);
            return Ok(Flow::Skip);
        }

        if let Some(declaration) = node.child_by_field_name("declaration") {
            if matches!(
                declaration.kind(),
                "interface_declaration" | "type_alias_declaration"
            ) {
                self.remove_statement(node);
                return Ok(Flow::Skip);
            }
            return Ok(Flow::Descend);
        }

        if let Some(clause) = named_child_of_kind(node, "export_clause") {
            let specifiers = Self::specifiers(clause, "export_specifier");
            if self.filter_specifiers(&specifiers) {
                self.remove_statement(node);
                return Ok(Flow::Skip);
            }
        }

        if let Some(source) = node.child_by_field_name("source") {
            self.visit_specifier(source)?;
        }
        Ok(Flow::Descend)
    }

    fn specifiers<'t>(list: Node<'t>, kind: &str) -> Vec<Node<'t>> {
        let mut cursor = list.walk();
        list.named_children(&mut cursor)
            .filter(|c| c.kind() == kind)
            .collect()
    }

    /// Remove `type`-only specifiers from a named import/export list.
    ///
    /// Returns true when the list was non-empty and every specifier was type-only; nothing is
    /// scheduled in that case and the caller decides what to drop.
    fn filter_specifiers(&mut self, specifiers: &[Node<'_>]) -> bool {
        let type_only: Vec<bool> = specifiers
            .iter()
            .map(|s| keyword(*s, "type").is_some() || keyword(*s, "typeof").is_some())
            .collect();

        let Some(last_kept) = type_only.iter().rposition(|t| !t) else {
            return !specifiers.is_empty();
        };

        for (idx, specifier) in specifiers.iter().enumerate() {
            if !type_only[idx] {
                continue;
            }
            if idx < last_kept {
                self.ranges.push(RemovalRange::with_trailing(
                    specifier.start_byte(),
                    specifier.end_byte(),
                    Trailing::ListComma,
                ));
            }
            self.skip.insert(specifier.id());
        }

        // Removed specifiers after the last kept one go as a single run, leading comma included.
        if let Some(last) = specifiers.last()
            && last_kept + 1 < specifiers.len()
        {
            self.ranges.push(RemovalRange::new(
                specifiers[last_kept].end_byte(),
                last.end_byte(),
            ));
        }
        false
    }

    /// Schedule the rewrite for a module specifier string literal.
    fn visit_specifier(&mut self, node: Node<'_>) -> Result<(), StripError> {
        if node.kind() != "string" || node.end_byte() < node.start_byte() + 2 {
            return Ok(());
        }
        let (start, end) = (node.start_byte() + 1, node.end_byte() - 1);
        if start == end {
            return Ok(());
        }

        let remap = self.options.remap_specifiers.as_ref();
        if remap.is_none() && !self.options.path_rewriting {
            return Ok(());
        }
        if let Some(rewrite) = specifier_rewrite(
            &self.source[start..end],
            start,
            remap,
            self.options.path_rewriting,
        )? {
            self.rewrites.push(rewrite);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::strip::strip;

    /// Strips with default options.
    fn strip_default(src: &str) -> String {
        strip(src, &StripOptions::default()).unwrap()
    }

    /// Returns the error code raised for `src`.
    fn error_code(src: &str) -> ErrorCode {
        strip(src, &StripOptions::default())
            .unwrap_err()
            .code()
            .expect("unsupported-construct error")
    }

    /// Variable annotations are removed together with their colon.
    #[test]
    fn strips_variable_annotation() {
        assert_eq!(strip_default("const x: number = 1;"), "const x = 1;");
        assert_eq!(strip_default("let a!: string;"), "let a;");
    }

    /// An interface before a class and the class's `implements` clause both go.
    #[test]
    fn strips_interface_and_implements() {
        assert_eq!(
            strip_default("interface A { a: string } class B implements A { a = 1; }"),
            "class B { a = 1; }"
        );
    }

    /// Parameter and return annotations are removed.
    #[test]
    fn strips_function_signature_types() {
        assert_eq!(
            strip_default("function f(x: number): number { return x; }"),
            "function f(x) { return x; }"
        );
        assert_eq!(
            strip_default("const g = <T>(a?: T, ...r: T[]): Promise<void> => {};"),
            "const g = (a, ...r) => {};"
        );
    }

    /// Generic arguments on calls and `new` are removed.
    #[test]
    fn strips_generic_arguments() {
        assert_eq!(
            strip_default("const m = new Map<string, number>(); f<T>(m);"),
            "const m = new Map(); f(m);"
        );
    }

    /// `as`, `satisfies` and `!` keep the inner expression and its parentheses.
    #[test]
    fn strips_assertions() {
        assert_eq!(
            strip_default("const n = (a as unknown as number) + b! + (c satisfies C);"),
            "const n = (a) + b + (c);"
        );
    }

    /// `this` parameters disappear with their comma.
    #[test]
    fn strips_this_parameter() {
        assert_eq!(
            strip_default("function f(this: Window, a: string) {}"),
            "function f(a) {}"
        );
        assert_eq!(strip_default("function g(this: Window) {}"), "function g() {}");
    }

    /// Member modifiers and markers are stripped, `static` stays.
    #[test]
    fn strips_member_modifiers() {
        assert_eq!(
            strip_default("class A { private static readonly x?: number = 1; public m?(): void {} }"),
            "class A { static x = 1; m() {} }"
        );
    }

    /// Abstract classes lose the keyword and their abstract members.
    #[test]
    fn strips_abstract_members() {
        let src = "abstract class A {\n  abstract m(): void;\n  abstract p: number;\n  n() {}\n}\n";
        assert_eq!(strip_default(src), "class A {\n  n() {}\n}\n");
    }

    /// Index signatures are removed with their terminator.
    #[test]
    fn strips_index_signature() {
        assert_eq!(
            strip_default("class A { [k: string]: any; b = 1; }"),
            "class A { b = 1; }"
        );
    }

    /// A type-only import leaves nothing behind.
    #[test]
    fn removes_type_only_import() {
        assert_eq!(strip_default(r#"import type { T } from "m";"#), "");
    }

    /// Type specifiers are filtered out of mixed lists.
    #[test]
    fn filters_type_specifiers() {
        assert_eq!(
            strip_default(r#"import { type A, b, type C } from "m";"#),
            r#"import { b } from "m";"#
        );
        assert_eq!(
            strip_default("export { a, type B, c };"),
            "export { a, c };"
        );
        assert_eq!(strip_default(r#"export { type A } from "m";"#), "");
    }

    /// A default import survives when all named imports are type-only.
    #[test]
    fn keeps_default_import() {
        assert_eq!(
            strip_default(r#"import D, { type T } from "m";"#),
            r#"import D from "m";"#
        );
    }

    /// An empty export list is a runtime module marker and stays.
    #[test]
    fn keeps_empty_export() {
        assert_eq!(strip_default("export {};"), "export {};");
    }

    /// Comments survive unless removal is requested.
    #[test]
    fn keeps_comments_by_default() {
        let src = "// note\nconst a: A = 1; /* x */\n";
        assert_eq!(strip_default(src), "// note\nconst a = 1; /* x */\n");

        let options = StripOptions {
            remove_comments: true,
            ..StripOptions::default()
        };
        assert_eq!(strip(src, &options).unwrap(), "const a = 1;\n");
    }

    /// Type arguments on a tagged template go, with one or several arguments.
    #[test]
    fn strips_tagged_template_type_arguments() {
        assert_eq!(
            strip_default("const t = tag<T>`x${a as any}`;"),
            "const t = tag`x${a}`;"
        );
        assert_eq!(strip_default("f(tag<A, B>`x`);"), "f(tag`x`);");
    }

    /// Comparisons joined by a logical operator are left alone.
    #[test]
    fn keeps_comparison_before_template() {
        let src = "if (a < b && c > `x`) {}";
        assert_eq!(strip_default(src), src);
    }

    /// A `[` on the next line indexes the asserted value instead of extending its type.
    #[test]
    fn assertion_type_ends_at_line_break() {
        assert_eq!(
            strip_default("let x = a as T\n[1].forEach(f);"),
            "let x = a\n[1].forEach(f);"
        );
        assert_eq!(strip_default("let y = a as T[];"), "let y = a;");
    }

    /// Input the parser had to recover from is refused with the error position.
    #[test]
    fn rejects_syntax_errors() {
        let err = strip("export class {\n  name: string;\n}", &StripOptions::default())
            .unwrap_err();
        assert!(matches!(err, StripError::Syntax(_)), "got {err:?}");
        assert_eq!(err.code(), None);
    }

    /// A comment after a removed statement goes with it when comments are removed.
    #[test]
    fn removes_trailing_comment_with_statement() {
        let options = StripOptions {
            remove_comments: true,
            ..StripOptions::default()
        };
        assert_eq!(
            strip("interface A {} // trailing\nlet b;", &options).unwrap(),
            "let b;"
        );
        assert_eq!(
            strip("type T = 1; /* t */\nlet c;", &options).unwrap(),
            "let c;"
        );
        assert_eq!(
            strip_default("interface A {} // trailing\nlet b;"),
            "// trailing\nlet b;"
        );
    }

    /// Each rejected construct raises its own code.
    #[test]
    fn rejects_runtime_constructs() {
        assert_eq!(error_code("enum E { A }"), ErrorCode::Enum);
        assert_eq!(error_code("namespace N {}"), ErrorCode::Namespace);
        assert_eq!(error_code("declare const x: number;"), ErrorCode::Declare);
        assert_eq!(error_code("class A { declare x: number; }"), ErrorCode::Declare);
        assert_eq!(error_code("function f(): number;"), ErrorCode::Overload);
        assert_eq!(
            error_code("class A { constructor(private x: number) {} }"),
            ErrorCode::ParameterProperty
        );
        assert_eq!(
            error_code("const x = <string>y;"),
            ErrorCode::TypeAssertionExpression
        );
    }

    /// The first unsupported construct in source order wins.
    #[test]
    fn first_error_wins() {
        assert_eq!(error_code("enum A { X }\nnamespace B {}\n"), ErrorCode::Enum);
    }
}
