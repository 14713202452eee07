//! Shape classification of expression containers.

use crate::ast::{ConditionalExpr, Expr, ExprKind, ExpressionContainer, LogicalExpr, LogicalOperator};

/// Conditional-rendering shape of a container's expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape<'a> {
    /// `test ? consequent : alternate`
    Ternary {
        expr: &'a Expr,
        conditional: &'a ConditionalExpr,
    },
    /// `test && <Element />`
    ShortCircuitAnd {
        expr: &'a Expr,
        logical: &'a LogicalExpr,
    },
    NotApplicable,
}

/// Classify the expression wrapped by `container`.
///
/// Parentheses around the whole expression are looked through. A logical
/// expression only qualifies when the operator is `&&` and the right operand
/// renders an element or fragment; `a || b` and `a && 1` are not conditional
/// renders and are left alone whatever the configured preference.
pub fn classify(container: &ExpressionContainer) -> Shape<'_> {
    let Some(expr) = container.expression.as_ref() else {
        return Shape::NotApplicable;
    };
    let expr = expr.unparenthesized();

    match &expr.kind {
        ExprKind::Conditional(conditional) => Shape::Ternary { expr, conditional },
        ExprKind::Logical(logical)
            if logical.operator == LogicalOperator::And && logical.right.is_renderable() =>
        {
            Shape::ShortCircuitAnd { expr, logical }
        }
        ExprKind::Logical(_)
        | ExprKind::Literal(_)
        | ExprKind::Identifier(_)
        | ExprKind::Element
        | ExprKind::Fragment
        | ExprKind::Parenthesized(_)
        | ExprKind::LowPrecedence
        | ExprKind::Other => Shape::NotApplicable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::with_parser;
    use crate::ts::Dialect;

    fn shape_name(source: &str) -> &'static str {
        with_parser(Dialect::Jsx, |parser| {
            let doc = parser.parse_document(source).unwrap();
            match classify(&doc.containers()[0]) {
                Shape::Ternary { .. } => "ternary",
                Shape::ShortCircuitAnd { .. } => "and",
                Shape::NotApplicable => "none",
            }
        })
        .unwrap()
    }

    #[test]
    fn ternaries_always_match() {
        assert_eq!(shape_name("<div>{a ? <b /> : null}</div>"), "ternary");
        assert_eq!(shape_name("<div>{a ? 1 : 2}</div>"), "ternary");
        assert_eq!(shape_name("<div>{(a ? <b /> : <c />)}</div>"), "ternary");
    }

    #[test]
    fn and_with_element_or_fragment() {
        assert_eq!(shape_name("<div>{a && <b />}</div>"), "and");
        assert_eq!(shape_name("<div>{a && <b>text</b>}</div>"), "and");
        assert_eq!(shape_name("<div>{a && <>text</>}</div>"), "and");
        assert_eq!(shape_name("<div>{a && (\n  <b />\n)}</div>"), "and");
        assert_eq!(shape_name("<div>{a.b && c() && <b />}</div>"), "and");
    }

    #[test]
    fn other_shapes_do_not_match() {
        assert_eq!(shape_name("<div>{a || 1}</div>"), "none");
        assert_eq!(shape_name("<div>{a && 1}</div>"), "none");
        assert_eq!(shape_name("<div>{a || <b />}</div>"), "none");
        assert_eq!(shape_name("<div>{a ?? <b />}</div>"), "none");
        assert_eq!(shape_name("<div>{'text'}</div>"), "none");
        assert_eq!(shape_name("<div>{value}</div>"), "none");
        assert_eq!(shape_name("<div>{}</div>"), "none");
    }
}
