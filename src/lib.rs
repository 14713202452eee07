//! jsx-conditional: enforce one conditional rendering style in JSX
//!
//! Inside a JSX expression container a conditional element can be written as
//! a ternary (`{cond ? <X /> : null}`) or as a short-circuit
//! (`{cond && <X />}`). The `jsx-conditional` rule reports the form the
//! configuration does not prefer and produces a fix converting it.
//!
//! # Architecture
//!
//! Rules never touch the parser. The [`ts`] adapter lowers every
//! `jsx_expression` node into an [`ast::ExpressionContainer`] and exposes
//! token lookup and source text through the [`host`] traits. A rule returns a
//! [`rule::Diagnostic`] carrying a [`edit::Fix`]; the [`linter::Linter`]
//! collects fixes, splices non-overlapping ones in a single pass and repeats
//! until the document converges.
//!
//! # Safety
//!
//! - Fixes are computed against the original text and applied left to right
//! - Output that parses with more errors than the input is never written
//! - Atomic file writes (tempfile + fsync + rename) guarded by a content hash
//!
//! # Example
//!
//! ```no_run
//! use jsx_conditional::config::LintConfig;
//! use jsx_conditional::registry::RuleRegistry;
//! use jsx_conditional::ts::Dialect;
//! use jsx_conditional::Linter;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = RuleRegistry::builtin();
//! let linter = Linter::new(LintConfig::default().resolve(&registry)?);
//!
//! let report = linter.fix_source(Dialect::Jsx, "<div>{a && <b />}</div>")?;
//! assert_eq!(report.output, "<div>{a ? <b /> : null}</div>");
//! # Ok(())
//! # }
//! ```

pub mod ast;
pub mod config;
pub mod edit;
pub mod host;
pub mod linter;
pub mod pool;
pub mod range;
pub mod registry;
pub mod rule;
pub mod ts;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, LintConfig, Severity};
pub use edit::{apply_fixes, EditError, Fix, FixOutcome, SourceFile, TextEdit, WriteResult};
pub use linter::{FixReport, LintError, LintMessage, Linter};
pub use range::{Position, TextRange};
pub use registry::{Preset, RuleRegistry};
pub use rule::{
    ConditionalOptions, Diagnostic, JsxConditional, MessageKind, OptionsError, Preference, Rule,
};
pub use ts::{Dialect, TreeSitterError};
