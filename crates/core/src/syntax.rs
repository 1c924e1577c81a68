//! Reduced syntax tree for cell analysis
//!
//! Parsers lower their concrete trees into this closed set of node kinds.
//! Only the shapes that matter for import and file-access extraction are
//! modelled; everything else becomes [`SyntaxNode::Other`].

/// A constant appearing in source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// A text constant, escapes already decoded
    Str(String),
    /// Any other constant (number, bytes, `True`, `None`, `...`)
    Other,
}

/// An expression in argument position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(Literal),
    Name(String),
    Other,
}

impl Expr {
    /// Text value when this is a string constant
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Literal(Literal::Str(value)) => Some(value),
            _ => None,
        }
    }
}

/// Shape of the thing being called
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// `object.method(...)`
    Attribute { method: String },
    /// `name(...)`
    Name(String),
    Other,
}

/// One imported name in an import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportName {
    /// Dotted name as written, without any `as` alias
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    /// `import a, b.c as d`
    Import { names: Vec<ImportName> },
    /// `from m import x, y`; `module` is `None` for bare relative imports
    FromImport {
        module: Option<String>,
        names: Vec<ImportName>,
    },
    /// A call with its positional arguments, in order
    Call { callee: Callee, args: Vec<Expr> },
    Other,
}

/// Receives every node of a lowered tree
pub trait Visitor {
    fn visit(&mut self, node: &SyntaxNode);
}

/// Visit each node in order
pub fn walk<V: Visitor>(nodes: &[SyntaxNode], visitor: &mut V) {
    for node in nodes {
        visitor.visit(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        calls: usize,
        imports: usize,
    }

    impl Visitor for Counter {
        fn visit(&mut self, node: &SyntaxNode) {
            match node {
                SyntaxNode::Call { .. } => self.calls += 1,
                SyntaxNode::Import { .. } | SyntaxNode::FromImport { .. } => self.imports += 1,
                SyntaxNode::Other => {}
            }
        }
    }

    #[test]
    fn test_walk_visits_all() {
        let nodes = vec![
            SyntaxNode::Import { names: vec![] },
            SyntaxNode::Other,
            SyntaxNode::Call {
                callee: Callee::Other,
                args: vec![],
            },
            SyntaxNode::FromImport {
                module: None,
                names: vec![],
            },
        ];
        let mut counter = Counter { calls: 0, imports: 0 };
        walk(&nodes, &mut counter);
        assert_eq!(counter.calls, 1);
        assert_eq!(counter.imports, 2);
    }

    #[test]
    fn test_expr_as_str() {
        assert_eq!(Expr::Literal(Literal::Str("a.csv".into())).as_str(), Some("a.csv"));
        assert_eq!(Expr::Literal(Literal::Other).as_str(), None);
        assert_eq!(Expr::Name("path".into()).as_str(), None);
    }
}
