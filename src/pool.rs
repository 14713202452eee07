//! Thread-local parser pooling.
//!
//! One parser per dialect per thread, created on first use and reused for
//! every later document on that thread.

use crate::ts::{Dialect, JsxParser, TreeSitterError};
use std::cell::RefCell;

thread_local! {
    static JSX_PARSER: RefCell<Option<JsxParser>> = const { RefCell::new(None) };
    static TSX_PARSER: RefCell<Option<JsxParser>> = const { RefCell::new(None) };
}

/// Execute `f` with the pooled parser for `dialect`.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use jsx_conditional::pool::with_parser;
/// use jsx_conditional::ts::Dialect;
///
/// let containers = with_parser(Dialect::Jsx, |parser| {
///     parser
///         .parse_document("<div>{a && <b />}</div>")
///         .map(|doc| doc.containers().len())
/// })??;
/// assert_eq!(containers, 1);
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(dialect: Dialect, f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut JsxParser) -> R,
{
    let slot = match dialect {
        Dialect::Jsx => &JSX_PARSER,
        Dialect::Tsx => &TSX_PARSER,
    };
    slot.with(|cell| {
        let mut opt = cell.borrow_mut();
        let parser = match opt.take() {
            Some(parser) => parser,
            None => JsxParser::new(dialect)?,
        };
        Ok(f(opt.insert(parser)))
    })
}
