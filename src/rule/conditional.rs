//! `jsx-conditional`: one conditional-rendering idiom per codebase.
//!
//! With `prefer-ternary`, `{test && <El />}` becomes `{test ? <El /> : null}`.
//! With `prefer-and-operator`, `{test ? <El /> : null}` becomes
//! `{test && <El />}`, and a ternary with two real branches is split into two
//! adjacent containers, `{test && <A />}{!test && <B />}`, unless
//! `exceptNotNullishAlternates` is set.

use crate::ast::{ConditionalExpr, Expr, ExprKind, ExpressionContainer, LogicalExpr, LogicalOperator};
use crate::edit::{Fix, TextEdit};
use crate::host::RuleContext;
use crate::range::TextRange;
use crate::rule::matcher::{classify, Shape};
use crate::rule::options::{ConditionalOptions, OptionsError, Preference};
use crate::rule::{Diagnostic, Fixable, MessageKind, Rule, RuleKind, RuleMeta};
use serde_json::Value;

pub const NAME: &str = "jsx-conditional";

pub static META: RuleMeta = RuleMeta {
    name: NAME,
    description:
        "enforce the consistent use of either ternary operators or and operators for conditions in JSX",
    category: "Stylistic issues",
    kind: RuleKind::Layout,
    fixable: Some(Fixable::Whitespace),
    recommended: false,
    messages: &[MessageKind::PreferTernary, MessageKind::PreferAndOperator],
    schema: ConditionalOptions::schema,
};

#[derive(Debug, Clone, Default)]
pub struct JsxConditional {
    options: ConditionalOptions,
}

impl JsxConditional {
    pub fn new(options: ConditionalOptions) -> Self {
        Self { options }
    }

    pub fn from_values(values: &[Value]) -> Result<Self, OptionsError> {
        ConditionalOptions::from_values(values).map(Self::new)
    }
}

impl Rule for JsxConditional {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn check(&self, container: &ExpressionContainer, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
        let (message_kind, fix) = match (self.options.preference, classify(container)) {
            (Preference::PreferTernary, Shape::ShortCircuitAnd { logical, .. }) => {
                (MessageKind::PreferTernary, to_ternary(logical, ctx)?)
            }
            (Preference::PreferAndOperator, Shape::Ternary { expr, conditional }) => {
                if !conditional.alternate.is_nullish() {
                    if self.options.except_not_nullish_alternates {
                        return None;
                    }
                    // A second container cannot follow an attribute value.
                    if container.in_attribute {
                        tracing::debug!(
                            "two-branch ternary in attribute at {}; skipping",
                            container.start
                        );
                        return None;
                    }
                }
                (
                    MessageKind::PreferAndOperator,
                    to_and_operator(container, expr, conditional, ctx),
                )
            }
            _ => return None,
        };

        Some(Diagnostic::at(NAME, container, message_kind, fix))
    }
}

/// `left && right` → `left ? right : null`
///
/// The `&&` token is found by scanning the tokens between the operands, since
/// comments and line breaks may sit on either side of it.
fn to_ternary(logical: &LogicalExpr, ctx: &RuleContext<'_>) -> Option<Fix> {
    let operator = ctx
        .tokens
        .tokens_between(logical.left.range, logical.right.range)
        .into_iter()
        .find(|token| token.kind == LogicalOperator::And.as_str());

    let Some(operator) = operator else {
        tracing::debug!(
            "no && token between {} and {}; skipping",
            logical.left.range,
            logical.right.range
        );
        return None;
    };

    Some(Fix::new(vec![
        TextEdit::replace(operator.range, "?"),
        TextEdit::insert(logical.right.range.end, " : null"),
    ]))
}

/// `test ? consequent : alternate` → `test && consequent`, followed by
/// `{!test && alternate}` when the alternate is not nullish.
fn to_and_operator(
    container: &ExpressionContainer,
    expr: &Expr,
    conditional: &ConditionalExpr,
    ctx: &RuleContext<'_>,
) -> Fix {
    let ConditionalExpr {
        test,
        consequent,
        alternate,
    } = conditional;

    let mut edits = Vec::with_capacity(6);
    if needs_parens(test) {
        edits.push(TextEdit::insert(test.range.start, "("));
        edits.push(TextEdit::insert(test.range.end, ")"));
    }
    edits.push(TextEdit::replace(
        TextRange::new(test.range.end, consequent.range.start),
        " && ",
    ));
    if needs_parens(consequent) {
        edits.push(TextEdit::insert(consequent.range.start, "("));
        edits.push(TextEdit::insert(consequent.range.end, ")"));
    }
    edits.push(TextEdit::remove(TextRange::new(
        consequent.range.end,
        expr.range.end,
    )));

    if !alternate.is_nullish() {
        let alternate_text = ctx.source.text_of(alternate.range);
        let alternate_text = if needs_parens(alternate) {
            format!("({alternate_text})")
        } else {
            alternate_text.to_string()
        };
        edits.push(TextEdit::insert(
            container.range.end,
            format!("{{{} && {}}}", negate(test, ctx), alternate_text),
        ));
    }

    Fix::new(edits)
}

/// `!name` for identifiers and already parenthesized tests, `!(text)` for
/// everything else.
fn negate(test: &Expr, ctx: &RuleContext<'_>) -> String {
    let text = ctx.source.text_of(test.range);
    if test.is_identifier() || matches!(test.kind, ExprKind::Parenthesized(_)) {
        format!("!{text}")
    } else {
        format!("!({text})")
    }
}

/// Operands that bind looser than `&&` and would regroup once placed next to it.
fn needs_parens(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Conditional(_) | ExprKind::LowPrecedence => true,
        ExprKind::Logical(logical) => logical.operator != LogicalOperator::And,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::with_parser;
    use crate::ts::Dialect;

    fn run(rule: &JsxConditional, source: &str) -> Option<(MessageKind, String)> {
        with_parser(Dialect::Jsx, |parser| {
            let doc = parser.parse_document(source).unwrap();
            let ctx = RuleContext::new(&doc);
            let container = &doc.containers()[0];
            rule.check(container, &ctx).map(|diagnostic| {
                let fixed = diagnostic.fix.as_ref().unwrap().apply_to(source).unwrap();
                (diagnostic.message_kind, fixed)
            })
        })
        .unwrap()
    }

    fn prefer_and(except: bool) -> JsxConditional {
        JsxConditional::new(ConditionalOptions {
            preference: Preference::PreferAndOperator,
            except_not_nullish_alternates: except,
        })
    }

    #[test]
    fn and_operator_to_ternary() {
        let rule = JsxConditional::default();
        let result = run(&rule, "<div>{propA && <span>Hello</span>}</div>");
        assert_eq!(
            result,
            Some((
                MessageKind::PreferTernary,
                "<div>{propA ? <span>Hello</span> : null}</div>".to_string()
            ))
        );
    }

    #[test]
    fn ternary_is_left_alone_when_preferred() {
        let rule = JsxConditional::default();
        assert_eq!(run(&rule, "<div>{propA ? <Span /> : null}</div>"), None);
    }

    #[test]
    fn operator_found_across_comments() {
        let rule = JsxConditional::default();
        let (_, fixed) = run(&rule, "<div>{a /* && */ &&\n  <b />}</div>").unwrap();
        assert_eq!(fixed, "<div>{a /* && */ ?\n  <b /> : null}</div>");
    }

    #[test]
    fn parenthesized_element_keeps_parens() {
        let rule = JsxConditional::default();
        let (_, fixed) = run(&rule, "<div>{a && (\n  <b />\n)}</div>").unwrap();
        assert_eq!(fixed, "<div>{a ? (\n  <b />\n) : null}</div>");
    }

    #[test]
    fn nullish_ternary_to_and_operator() {
        let rule = prefer_and(false);
        let (kind, fixed) = run(&rule, "<div>{propA ? <Span /> : null}</div>").unwrap();
        assert_eq!(kind, MessageKind::PreferAndOperator);
        assert_eq!(fixed, "<div>{propA && <Span />}</div>");

        let (_, fixed) = run(&rule, "<div>{propA ? <Span /> : undefined}</div>").unwrap();
        assert_eq!(fixed, "<div>{propA && <Span />}</div>");
    }

    #[test]
    fn two_branch_ternary_is_split() {
        let rule = prefer_and(false);
        let (_, fixed) = run(&rule, "<div>{a ? <Span /> : <Other />}</div>").unwrap();
        assert_eq!(fixed, "<div>{a && <Span />}{!a && <Other />}</div>");
    }

    #[test]
    fn split_negates_compound_test_with_parens() {
        let rule = prefer_and(false);
        let (_, fixed) = run(&rule, "<div>{isSomething() ? <A /> : <B />}</div>").unwrap();
        assert_eq!(
            fixed,
            "<div>{isSomething() && <A />}{!(isSomething()) && <B />}</div>"
        );
    }

    #[test]
    fn split_wraps_low_precedence_operands() {
        let rule = prefer_and(false);
        let (_, fixed) = run(&rule, "<div>{a || b ? <A /> : c ? <B /> : <C />}</div>").unwrap();
        assert_eq!(
            fixed,
            "<div>{(a || b) && <A />}{!(a || b) && (c ? <B /> : <C />)}</div>"
        );
    }

    #[test]
    fn arrow_and_assignment_operands_are_wrapped() {
        let rule = prefer_and(false);
        let (_, fixed) = run(&rule, "<button onClick={enabled ? () => go() : undefined} />").unwrap();
        assert_eq!(fixed, "<button onClick={enabled && (() => go())} />");

        let (_, fixed) = run(&rule, "<div>{a ? <A /> : x = <B />}</div>").unwrap();
        assert_eq!(fixed, "<div>{a && <A />}{!a && (x = <B />)}</div>");

        let (_, fixed) = run(&rule, "<div>{a ? n += 1 : null}</div>").unwrap();
        assert_eq!(fixed, "<div>{a && (n += 1)}</div>");
    }

    #[test]
    fn two_branch_ternary_in_attribute_is_not_split() {
        let rule = prefer_and(false);
        assert_eq!(run(&rule, "<Icon kind={open ? <Up /> : <Down />} />"), None);

        let (_, fixed) = run(&rule, "<Icon kind={open ? <Up /> : null} />").unwrap();
        assert_eq!(fixed, "<Icon kind={open && <Up />} />");
    }

    #[test]
    fn exemption_keeps_two_branch_ternary() {
        let rule = prefer_and(true);
        assert_eq!(run(&rule, "<div>{a ? <Span /> : <Other />}</div>"), None);

        let (_, fixed) = run(&rule, "<div>{a ? <Span /> : null}</div>").unwrap();
        assert_eq!(fixed, "<div>{a && <Span />}</div>");
    }

    #[test]
    fn non_element_and_is_never_reported() {
        let rule = JsxConditional::default();
        assert_eq!(run(&rule, "<div>{a && 1}</div>"), None);
        assert_eq!(run(&rule, "<div>{a || <b />}</div>"), None);
        assert_eq!(run(&prefer_and(false), "<div>{a && 1}</div>"), None);
    }

    #[test]
    fn diagnostic_is_anchored_at_container() {
        let rule = JsxConditional::default();
        let source = "<div>\n  {a && <b />}\n</div>";
        with_parser(Dialect::Jsx, |parser| {
            let doc = parser.parse_document(source).unwrap();
            let ctx = RuleContext::new(&doc);
            let diagnostic = rule.check(&doc.containers()[0], &ctx).unwrap();
            assert_eq!(diagnostic.rule, NAME);
            assert_eq!((diagnostic.start.line, diagnostic.start.column), (2, 2));
            assert_eq!((diagnostic.end.line, diagnostic.end.column), (2, 14));
            assert_eq!(&source[diagnostic.range.start..diagnostic.range.end], "{a && <b />}");
        })
        .unwrap();
    }

    struct NoTokens<'a>(&'a str);

    impl crate::host::TokenLookup for NoTokens<'_> {
        fn tokens_between(&self, _: TextRange, _: TextRange) -> Vec<crate::ast::Token> {
            Vec::new()
        }
    }

    impl crate::host::SourceText for NoTokens<'_> {
        fn text_of(&self, range: TextRange) -> &str {
            &self.0[range.start..range.end]
        }
    }

    #[test]
    fn missing_operator_token_is_skipped() {
        let source = "{a && <b />}";
        let left = Expr::new(1..2, ExprKind::Identifier("a".to_string()));
        let right = Expr::new(6..11, ExprKind::Element);
        let container = ExpressionContainer {
            range: TextRange::new(0, 12),
            start: crate::range::Position { line: 1, column: 0 },
            end: crate::range::Position { line: 1, column: 12 },
            expression: Some(Expr::new(
                1..11,
                ExprKind::Logical(Box::new(LogicalExpr {
                    left,
                    operator: LogicalOperator::And,
                    right,
                })),
            )),
            in_attribute: false,
        };
        let host = NoTokens(source);
        let ctx = RuleContext::new(&host);
        assert!(JsxConditional::default().check(&container, &ctx).is_none());
    }
}
