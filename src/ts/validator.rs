use crate::pool::with_parser;
use crate::ts::document::ErrorNode;
use crate::ts::errors::TreeSitterError;
use crate::ts::parser::Dialect;

fn error_nodes(dialect: Dialect, source: &str) -> Result<Vec<ErrorNode>, TreeSitterError> {
    with_parser(dialect, |parser| {
        parser
            .parse_document(source)
            .map(|document| document.error_nodes())
    })?
}

fn into_result(errors: &[ErrorNode]) -> Result<(), TreeSitterError> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(TreeSitterError::SyntaxError {
            byte_start: errors[0].byte_start,
            byte_end: errors[0].byte_end,
        }),
        n => Err(TreeSitterError::MultipleSyntaxErrors { count: n }),
    }
}

/// Validate that a JSX source has no syntax errors.
pub fn validate_syntax(dialect: Dialect, source: &str) -> Result<(), TreeSitterError> {
    into_result(&error_nodes(dialect, source)?)
}

/// Validate that rewriting `before` into `after` does not introduce syntax
/// errors.
///
/// Offsets shift once fixes are spliced in, so errors are compared by count:
/// a document that was already broken may stay broken, but no worse.
pub fn validate_fix(dialect: Dialect, before: &str, after: &str) -> Result<(), TreeSitterError> {
    let original_errors = error_nodes(dialect, before)?;
    let new_errors = error_nodes(dialect, after)?;

    if new_errors.len() <= original_errors.len() {
        return Ok(());
    }
    match new_errors.len() - original_errors.len() {
        1 => into_result(&new_errors[..1]),
        n => Err(TreeSitterError::MultipleSyntaxErrors { count: n }),
    }
}
