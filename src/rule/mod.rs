//! Rule contract and the built-in conditional-shape rule.
//!
//! A rule sees one [`ExpressionContainer`] at a time through a read-only
//! [`RuleContext`] and either stays silent or returns a [`Diagnostic`] with a
//! [`Fix`]. Rules keep no state between containers.

pub mod conditional;
pub mod matcher;
pub mod options;

pub use conditional::JsxConditional;
pub use matcher::{classify, Shape};
pub use options::{ConditionalOptions, OptionsError, Preference};

use crate::ast::ExpressionContainer;
use crate::edit::Fix;
use crate::host::RuleContext;
use crate::range::{Position, TextRange};
use serde::Serialize;
use serde_json::{json, Value};

pub trait Rule: Send + Sync {
    fn meta(&self) -> &'static RuleMeta;

    /// Inspect one container. Malformed or inapplicable input yields `None`,
    /// never an error.
    fn check(&self, container: &ExpressionContainer, ctx: &RuleContext<'_>) -> Option<Diagnostic>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Formatting-level change that never alters behaviour.
    Layout,
}

/// What a rule's fixes are allowed to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Fixable {
    Whitespace,
}

/// Static description of a rule, exposed to configuration and the CLI.
#[derive(Debug)]
pub struct RuleMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub kind: RuleKind,
    pub fixable: Option<Fixable>,
    pub recommended: bool,
    pub messages: &'static [MessageKind],
    /// JSON schema of the positional options array.
    pub schema: fn() -> Value,
}

impl RuleMeta {
    pub fn to_json(&self) -> Value {
        let messages: serde_json::Map<String, Value> = self
            .messages
            .iter()
            .map(|kind| (kind.id().to_string(), Value::from(kind.template())))
            .collect();

        json!({
            "name": self.name,
            "type": self.kind,
            "docs": {
                "description": self.description,
                "category": self.category,
                "recommended": self.recommended,
            },
            "fixable": self.fixable,
            "schema": (self.schema)(),
            "messages": messages,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageKind {
    PreferTernary,
    PreferAndOperator,
}

impl MessageKind {
    pub fn id(&self) -> &'static str {
        match self {
            MessageKind::PreferTernary => "preferTernary",
            MessageKind::PreferAndOperator => "preferAndOperator",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            MessageKind::PreferTernary => {
                "Ternary operator is preferred over AND (&&) operator in conditional expression"
            }
            MessageKind::PreferAndOperator => {
                "And operator is preferred over ternary operator in conditional expression"
            }
        }
    }
}

/// A reported violation anchored at an expression container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub rule: &'static str,
    pub message_kind: MessageKind,
    pub range: TextRange,
    pub start: Position,
    pub end: Position,
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub fn at(
        rule: &'static str,
        container: &ExpressionContainer,
        message_kind: MessageKind,
        fix: Fix,
    ) -> Self {
        Self {
            rule,
            message_kind,
            range: container.range,
            start: container.start,
            end: container.end,
            fix: Some(fix),
        }
    }

    pub fn message(&self) -> &'static str {
        self.message_kind.template()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_json() {
        let value = conditional::META.to_json();
        assert_eq!(value["name"], "jsx-conditional");
        assert_eq!(value["type"], "layout");
        assert_eq!(value["fixable"], "whitespace");
        assert_eq!(value["docs"]["category"], "Stylistic issues");
        assert_eq!(value["docs"]["recommended"], false);
        assert_eq!(
            value["messages"]["preferAndOperator"],
            "And operator is preferred over ternary operator in conditional expression"
        );
        assert_eq!(value["schema"][0]["enum"][1], "prefer-and-operator");
    }
}
