use crate::syntax::{Callee, Expr, ImportName, Literal, SyntaxNode};
use tree_sitter::{Node, Parser, Tree};

use super::literal::{parse_string_literal, StringLiteral};
use super::{CellParser, ParserError};

/// Statements tree-sitter accepts but Python 3 rejects
const PYTHON2_STATEMENTS: &[&str] = &["print_statement", "exec_statement"];

pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self, ParserError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ParserError::InitError(e.to_string()))?;

        Ok(Self { parser })
    }

    /// Reject trees that Python itself would refuse to compile
    fn check_tree(&self, tree: &Tree) -> Result<(), ParserError> {
        let root = tree.root_node();
        if let Some(bad) = Self::find_error(root) {
            let what = if bad.is_missing() {
                format!("missing {}", bad.kind())
            } else {
                "syntax error".to_string()
            };
            return Err(Self::syntax_error(&what, &bad));
        }
        Ok(())
    }

    fn find_error(node: Node) -> Option<Node> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            return None;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(bad) = Self::find_error(child) {
                return Some(bad);
            }
        }
        // has_error() without a reachable error child
        Some(node)
    }

    fn syntax_error(what: &str, node: &Node) -> ParserError {
        let pos = node.start_position();
        ParserError::ParseError(format!(
            "{} at line {}, column {}",
            what,
            pos.row + 1,
            pos.column + 1
        ))
    }

    /// Reject constructs the grammar accepts but the Python 3 compiler does not
    fn validate(&self, node: &Node, source: &str) -> Result<(), ParserError> {
        match node.kind() {
            "module" | "block" => self.check_indentation(node, source)?,
            "expression_statement" => {
                let mut cursor = node.walk();
                let walrus = node
                    .named_children(&mut cursor)
                    .find(|child| child.kind() == "named_expression");
                if let Some(walrus) = walrus {
                    return Err(Self::syntax_error(
                        "unparenthesized assignment expression",
                        &walrus,
                    ));
                }
            }
            "argument_list" => self.check_argument_order(node)?,
            "concatenated_string" => self.check_concatenation(node, source)?,
            "string" if self.is_backtick(node, source) => {
                return Err(Self::syntax_error("backtick repr", node));
            }
            kind if PYTHON2_STATEMENTS.contains(&kind) => {
                let what = format!("Python 2 {}", kind.replace('_', " "));
                return Err(Self::syntax_error(&what, node));
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.validate(&child, source)?;
        }
        Ok(())
    }

    /// Statements opening a line in one suite share a column; module level is column 0
    fn check_indentation(&self, node: &Node, source: &str) -> Result<(), ParserError> {
        let mut expected = if node.kind() == "module" { Some(0) } else { None };

        let mut cursor = node.walk();
        for statement in node.named_children(&mut cursor) {
            if matches!(statement.kind(), "comment" | "line_continuation")
                || !Self::starts_line(&statement, source)
            {
                continue;
            }
            let column = statement.start_position().column;
            match expected {
                None => expected = Some(column),
                Some(col) if col != column => {
                    return Err(Self::syntax_error("inconsistent indentation", &statement));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn starts_line(node: &Node, source: &str) -> bool {
        let start = node.start_byte();
        let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
        source[line_start..start].trim().is_empty()
    }

    /// `f(a=1, b)`, `f(**kw, b)` and `f(**kw, *a)` are rejected
    fn check_argument_order(&self, node: &Node) -> Result<(), ParserError> {
        let mut seen_keyword = false;
        let mut seen_double_splat = false;

        let mut cursor = node.walk();
        for arg in node.named_children(&mut cursor) {
            match arg.kind() {
                "comment" => {}
                "keyword_argument" => seen_keyword = true,
                "dictionary_splat" => seen_double_splat = true,
                "list_splat" if seen_double_splat => {
                    return Err(Self::syntax_error(
                        "iterable unpacking follows keyword argument unpacking",
                        &arg,
                    ));
                }
                "list_splat" => {}
                _ if seen_keyword || seen_double_splat => {
                    return Err(Self::syntax_error(
                        "positional argument follows keyword argument",
                        &arg,
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn check_concatenation(&self, node: &Node, source: &str) -> Result<(), ParserError> {
        let mut saw_text = false;
        let mut saw_bytes = false;

        let mut cursor = node.walk();
        for part in node.named_children(&mut cursor) {
            if part.kind() != "string" {
                continue;
            }
            match parse_string_literal(&self.get_node_text(&part, source)) {
                Some(StringLiteral::Bytes) => saw_bytes = true,
                _ => saw_text = true,
            }
        }

        if saw_text && saw_bytes {
            return Err(Self::syntax_error(
                "cannot mix bytes and nonbytes literals",
                node,
            ));
        }
        Ok(())
    }

    /// The scanner lexes Python 2 `` `x` `` as a string
    fn is_backtick(&self, node: &Node, source: &str) -> bool {
        let text = &source[node.byte_range()];
        text.find(['\'', '"', '`'])
            .is_some_and(|i| text[i..].starts_with('`'))
    }

    /// Visit every node, collecting the ones the analysis cares about
    fn lower(&self, node: &Node, source: &str, nodes: &mut Vec<SyntaxNode>) {
        match node.kind() {
            "import_statement" => nodes.push(self.lower_import(node, source)),
            "import_from_statement" => nodes.push(self.lower_from_import(node, source)),
            "future_import_statement" => nodes.push(SyntaxNode::FromImport {
                module: Some("__future__".to_string()),
                names: self.import_names(node, source),
            }),
            "call" => nodes.push(self.lower_call(node, source)),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.lower(&child, source, nodes);
        }
    }

    /// `(x)` and `((x))` are just `x`
    fn unparenthesize(mut node: Node) -> Node {
        while node.kind() == "parenthesized_expression" {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|child| child.kind() != "comment");
            match inner {
                Some(inner) => node = inner,
                None => break,
            }
        }
        node
    }

    /// `import x, y.z as w`
    fn lower_import(&self, node: &Node, source: &str) -> SyntaxNode {
        SyntaxNode::Import {
            names: self.import_names(node, source),
        }
    }

    /// `from x import y`, `from . import x`, `from ..x import *`
    fn lower_from_import(&self, node: &Node, source: &str) -> SyntaxNode {
        let module = node
            .child_by_field_name("module_name")
            .and_then(|module| match module.kind() {
                "dotted_name" => Some(self.dotted_name(&module, source)),
                "relative_import" => {
                    let mut cursor = module.walk();
                    let dotted = module
                        .named_children(&mut cursor)
                        .find(|child| child.kind() == "dotted_name");
                    dotted.map(|d| self.dotted_name(&d, source))
                }
                _ => None,
            });

        let mut names = self.import_names(node, source);

        let mut cursor = node.walk();
        if node
            .named_children(&mut cursor)
            .any(|child| child.kind() == "wildcard_import")
        {
            names.push(ImportName {
                name: "*".to_string(),
            });
        }

        SyntaxNode::FromImport { module, names }
    }

    fn import_names(&self, node: &Node, source: &str) -> Vec<ImportName> {
        let mut names = Vec::new();
        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            match child.kind() {
                "dotted_name" => names.push(ImportName {
                    name: self.dotted_name(&child, source),
                }),
                // the alias binds a local name only
                "aliased_import" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        names.push(ImportName {
                            name: self.dotted_name(&name, source),
                        });
                    }
                }
                _ => {}
            }
        }
        names
    }

    /// Dotted name with any inner whitespace or comments dropped
    fn dotted_name(&self, node: &Node, source: &str) -> String {
        if node.kind() != "dotted_name" {
            return self.get_node_text(node, source);
        }
        let mut cursor = node.walk();
        let parts: Vec<String> = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "identifier")
            .map(|child| self.get_node_text(&child, source))
            .collect();
        parts.join(".")
    }

    fn lower_call(&self, node: &Node, source: &str) -> SyntaxNode {
        let function = node
            .child_by_field_name("function")
            .map(Self::unparenthesize);
        let callee = match function {
            Some(function) if function.kind() == "attribute" => function
                .child_by_field_name("attribute")
                .map(|attr| Callee::Attribute {
                    method: self.get_node_text(&attr, source),
                })
                .unwrap_or(Callee::Other),
            Some(function) if function.kind() == "identifier" => {
                Callee::Name(self.get_node_text(&function, source))
            }
            _ => Callee::Other,
        };

        let args = match node.child_by_field_name("arguments") {
            Some(arguments) if arguments.kind() == "argument_list" => {
                let mut cursor = arguments.walk();
                arguments
                    .named_children(&mut cursor)
                    .filter(|arg| {
                        !matches!(arg.kind(), "comment" | "keyword_argument" | "dictionary_splat")
                    })
                    .map(|arg| self.lower_expr(&arg, source))
                    .collect()
            }
            // f(x for x in xs)
            Some(_) => vec![Expr::Other],
            None => vec![],
        };

        SyntaxNode::Call { callee, args }
    }

    fn lower_expr(&self, node: &Node, source: &str) -> Expr {
        match node.kind() {
            "string" => match parse_string_literal(&self.get_node_text(node, source)) {
                Some(StringLiteral::Str(value)) => Expr::Literal(Literal::Str(value)),
                Some(StringLiteral::Bytes) => Expr::Literal(Literal::Other),
                Some(StringLiteral::Formatted) | None => Expr::Other,
            },
            "concatenated_string" => self.lower_concatenated(node, source),
            "integer" | "float" | "true" | "false" | "none" | "ellipsis" => {
                Expr::Literal(Literal::Other)
            }
            "identifier" => Expr::Name(self.get_node_text(node, source)),
            "parenthesized_expression" => {
                let inner = Self::unparenthesize(*node);
                if inner.kind() == "parenthesized_expression" {
                    Expr::Other
                } else {
                    self.lower_expr(&inner, source)
                }
            }
            _ => Expr::Other,
        }
    }

    /// `"a" "b"` folds to one constant unless a part is an f-string.
    /// Mixed bytes and str parts were already rejected by `validate`.
    fn lower_concatenated(&self, node: &Node, source: &str) -> Expr {
        let mut value = String::new();
        let mut saw_bytes = false;

        let mut cursor = node.walk();
        for part in node.named_children(&mut cursor) {
            if part.kind() != "string" {
                continue;
            }
            match parse_string_literal(&self.get_node_text(&part, source)) {
                Some(StringLiteral::Str(text)) => value.push_str(&text),
                Some(StringLiteral::Bytes) => saw_bytes = true,
                Some(StringLiteral::Formatted) | None => return Expr::Other,
            }
        }

        if saw_bytes {
            Expr::Literal(Literal::Other)
        } else {
            Expr::Literal(Literal::Str(value))
        }
    }

    fn get_node_text(&self, node: &Node, source: &str) -> String {
        source[node.byte_range()].to_string()
    }
}

impl CellParser for PythonParser {
    fn parse(&mut self, source: &str) -> Result<Vec<SyntaxNode>, ParserError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParserError::ParseError("parser returned no tree".to_string()))?;
        self.check_tree(&tree)?;
        self.validate(&tree.root_node(), source)?;

        let mut nodes = Vec::new();
        self.lower(&tree.root_node(), source, &mut nodes);
        Ok(nodes)
    }
}
