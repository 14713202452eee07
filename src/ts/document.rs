use crate::ast::{
    ConditionalExpr, Expr, ExprKind, ExpressionContainer, Literal, LogicalExpr, LogicalOperator,
    Token,
};
use crate::host::{SourceText, TokenLookup};
use crate::range::{Position, TextRange};
use tree_sitter::{Node, Tree};

/// A parsed JSX document: the tree, its token index and the lowered
/// expression containers in document order.
pub struct ParsedDocument<'a> {
    pub source: &'a str,
    pub tree: Tree,
    tokens: Vec<Token>,
    containers: Vec<ExpressionContainer>,
}

/// Information about an ERROR or MISSING node in the parse tree.
#[derive(Debug, Clone)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start: Position,
}

impl<'a> ParsedDocument<'a> {
    pub fn new(source: &'a str, tree: Tree) -> Self {
        let mut tokens = Vec::new();
        let mut containers = Vec::new();

        // Pre-order walk: containers come out in document order, leaves come
        // out sorted by start offset.
        {
            let mut cursor = tree.walk();
            'walk: loop {
                let node = cursor.node();
                if node.kind() == "jsx_expression" {
                    containers.push(lower_container(node, source));
                }
                if node.child_count() == 0 && !node.is_missing() {
                    tokens.push(Token {
                        kind: node.kind(),
                        range: node.byte_range().into(),
                    });
                }

                if cursor.goto_first_child() {
                    continue;
                }
                while !cursor.goto_next_sibling() {
                    if !cursor.goto_parent() {
                        break 'walk;
                    }
                }
            }
        }

        Self {
            source,
            tree,
            tokens,
            containers,
        }
    }

    pub fn containers(&self) -> &[ExpressionContainer] {
        &self.containers
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &mut errors);
        errors
    }
}

impl TokenLookup for ParsedDocument<'_> {
    fn tokens_between(&self, left: TextRange, right: TextRange) -> Vec<Token> {
        let from = self
            .tokens
            .partition_point(|token| token.range.start < left.end);
        let to = self
            .tokens
            .partition_point(|token| token.range.start < right.start);
        if from >= to {
            return Vec::new();
        }
        self.tokens[from..to]
            .iter()
            .filter(|token| token.range.end <= right.start)
            .copied()
            .collect()
    }
}

impl SourceText for ParsedDocument<'_> {
    fn text_of(&self, range: TextRange) -> &str {
        &self.source[range.start..range.end]
    }
}

fn position(point: tree_sitter::Point) -> Position {
    Position {
        line: point.row + 1,
        column: point.column,
    }
}

fn lower_container(node: Node<'_>, source: &str) -> ExpressionContainer {
    let expression = match first_named_child(node) {
        Some(child) if child.kind() == "spread_element" => None,
        Some(child) => Some(lower_expr(child, source)),
        None => None,
    };

    let in_attribute = node.parent().is_some_and(|parent| {
        matches!(
            parent.kind(),
            "jsx_attribute" | "jsx_opening_element" | "jsx_self_closing_element"
        )
    });

    ExpressionContainer {
        range: node.byte_range().into(),
        start: position(node.start_position()),
        end: position(node.end_position()),
        expression,
        in_attribute,
    }
}

/// First named child that is not a comment.
fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let mut children = node.named_children(&mut cursor);
    children.find(|child| child.kind() != "comment")
}

fn lower_expr(node: Node<'_>, source: &str) -> Expr {
    let kind = match node.kind() {
        "ternary_expression" => lower_ternary(node, source).unwrap_or(ExprKind::Other),
        "binary_expression" => lower_logical(node, source).unwrap_or(ExprKind::Other),
        "null" => ExprKind::Literal(Literal::Null),
        "undefined" => ExprKind::Identifier("undefined".to_string()),
        "identifier" => ExprKind::Identifier(source[node.byte_range()].to_string()),
        "number" | "string" | "template_string" | "true" | "false" | "regex" => {
            ExprKind::Literal(Literal::Other)
        }
        "jsx_self_closing_element" => ExprKind::Element,
        "jsx_element" => {
            let opening = node
                .child_by_field_name("open_tag")
                .or_else(|| node.named_child(0));
            match opening.and_then(|open| open.child_by_field_name("name")) {
                Some(_) => ExprKind::Element,
                None => ExprKind::Fragment,
            }
        }
        "arrow_function"
        | "assignment_expression"
        | "augmented_assignment_expression"
        | "yield_expression" => ExprKind::LowPrecedence,
        "parenthesized_expression" => match first_named_child(node) {
            Some(inner) => ExprKind::Parenthesized(Box::new(lower_expr(inner, source))),
            None => ExprKind::Other,
        },
        _ => ExprKind::Other,
    };

    Expr::new(node.byte_range(), kind)
}

fn lower_ternary(node: Node<'_>, source: &str) -> Option<ExprKind> {
    let test = node.child_by_field_name("condition")?;
    let consequent = node.child_by_field_name("consequence")?;
    let alternate = node.child_by_field_name("alternative")?;

    Some(ExprKind::Conditional(Box::new(ConditionalExpr {
        test: lower_expr(test, source),
        consequent: lower_expr(consequent, source),
        alternate: lower_expr(alternate, source),
    })))
}

fn lower_logical(node: Node<'_>, source: &str) -> Option<ExprKind> {
    let operator = node.child_by_field_name("operator")?;
    let operator = LogicalOperator::from_token(operator.kind())?;
    let left = node.child_by_field_name("left")?;
    let right = node.child_by_field_name("right")?;

    Some(ExprKind::Logical(Box::new(LogicalExpr {
        left: lower_expr(left, source),
        operator,
        right: lower_expr(right, source),
    })))
}

fn collect_error_nodes(node: Node<'_>, errors: &mut Vec<ErrorNode>) {
    if node.is_error() || node.is_missing() {
        errors.push(ErrorNode {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            start: position(node.start_position()),
        });
    }

    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}
