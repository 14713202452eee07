//! Expression model consumed by the rules.
//!
//! The host adapter lowers its concrete syntax tree into these types once per
//! document. Only the shapes the rules distinguish get their own variant;
//! everything else collapses into [`ExprKind::Other`].

use crate::range::{Position, TextRange};

/// An expression with the byte range it occupies in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub range: TextRange,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    /// `test ? consequent : alternate`
    Conditional(Box<ConditionalExpr>),
    /// `left && right`, `left || right`, `left ?? right`
    Logical(Box<LogicalExpr>),
    Literal(Literal),
    Identifier(String),
    /// `<div>...</div>` or `<Span />`
    Element,
    /// `<>...</>`
    Fragment,
    /// `( inner )`
    Parenthesized(Box<Expr>),
    /// Arrow functions, assignments and `yield`: everything that binds looser
    /// than a conditional and cannot stand bare as an `&&` operand.
    LowPrecedence,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Null,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalExpr {
    pub test: Expr,
    pub consequent: Expr,
    pub alternate: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    Coalesce,
}

impl LogicalOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "&&" => Some(LogicalOperator::And),
            "||" => Some(LogicalOperator::Or),
            "??" => Some(LogicalOperator::Coalesce),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
            LogicalOperator::Coalesce => "??",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalExpr {
    pub left: Expr,
    pub operator: LogicalOperator,
    pub right: Expr,
}

impl Expr {
    pub fn new(range: impl Into<TextRange>, kind: ExprKind) -> Self {
        Self {
            range: range.into(),
            kind,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expr {
        let mut expr = self;
        while let ExprKind::Parenthesized(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }

    /// `null` or the `undefined` identifier, looking through parentheses.
    pub fn is_nullish(&self) -> bool {
        match &self.unparenthesized().kind {
            ExprKind::Literal(Literal::Null) => true,
            ExprKind::Identifier(name) => name == "undefined",
            _ => false,
        }
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, ExprKind::Identifier(_))
    }

    /// Element or fragment literal, looking through parentheses.
    pub fn is_renderable(&self) -> bool {
        matches!(
            self.unparenthesized().kind,
            ExprKind::Element | ExprKind::Fragment
        )
    }
}

/// A `{ ... }` expression container inside markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionContainer {
    pub range: TextRange,
    pub start: Position,
    pub end: Position,
    /// `None` for empty or comment-only containers and spread children.
    pub expression: Option<Expr>,
    /// Attribute value (`kind={...}`) rather than an element child.
    pub in_attribute: bool,
}

/// A lexical token of the host document. Comments are tokens too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: &'static str,
    pub range: TextRange,
}
