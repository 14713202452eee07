//! Read-only capabilities a document host hands to rules.
//!
//! Rules never see the host's parser or tree; they ask for tokens between two
//! sub-expressions and for the original text of a range, nothing more.

use crate::ast::Token;
use crate::range::TextRange;

/// Lexical token queries over the original document.
pub trait TokenLookup {
    /// Tokens (comments included) lying between the end of `left` and the
    /// start of `right`, in document order.
    fn tokens_between(&self, left: TextRange, right: TextRange) -> Vec<Token>;
}

/// Access to the original source text.
pub trait SourceText {
    fn text_of(&self, range: TextRange) -> &str;
}

/// Everything a rule may consult while checking one container.
pub struct RuleContext<'a> {
    pub tokens: &'a dyn TokenLookup,
    pub source: &'a dyn SourceText,
}

impl<'a> RuleContext<'a> {
    pub fn new<H>(host: &'a H) -> Self
    where
        H: TokenLookup + SourceText + 'a,
    {
        Self {
            tokens: host,
            source: host,
        }
    }
}
