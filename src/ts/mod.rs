//! Tree-sitter host adapter for JSX documents.
//!
//! Parses JavaScript/TSX sources, lowers every `jsx_expression` node into the
//! rule-facing [`ExpressionContainer`](crate::ast::ExpressionContainer) model,
//! and answers token and source-text queries against the original bytes.

pub mod document;
pub mod errors;
pub mod parser;
pub mod validator;

pub use document::{ErrorNode, ParsedDocument};
pub use errors::TreeSitterError;
pub use parser::{Dialect, JsxParser};
pub use validator::{validate_fix, validate_syntax};
