//! Runs the active rules over documents and converges their fixes.

use crate::config::{ActiveRule, Severity};
use crate::edit::{apply_fixes, EditError, Fix, SourceFile, WriteResult};
use crate::host::RuleContext;
use crate::pool::with_parser;
use crate::range::{Position, TextRange};
use crate::rule::Diagnostic;
use crate::ts::{validate_fix, Dialect, ParsedDocument, TreeSitterError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upper bound on lint+apply rounds for one document.
pub const MAX_FIX_PASSES: usize = 10;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("unsupported file type: {path}")]
    UnsupportedFile { path: PathBuf },

    #[error(transparent)]
    Parse(#[from] TreeSitterError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("fixed output would introduce syntax errors: {source}")]
    IntroducedSyntaxErrors { source: TreeSitterError },
}

/// One reported problem, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintMessage {
    pub rule: &'static str,
    pub severity: Severity,
    pub message_id: &'static str,
    pub message: &'static str,
    pub range: TextRange,
    pub start: Position,
    pub end: Position,
    #[serde(skip)]
    pub fix: Option<Fix>,
}

impl LintMessage {
    fn new(diagnostic: Diagnostic, severity: Severity) -> Self {
        Self {
            rule: diagnostic.rule,
            severity,
            message_id: diagnostic.message_kind.id(),
            message: diagnostic.message(),
            range: diagnostic.range,
            start: diagnostic.start,
            end: diagnostic.end,
            fix: diagnostic.fix,
        }
    }

    pub fn fixable(&self) -> bool {
        self.fix.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct FixReport {
    pub output: String,
    /// Number of fixes applied across all passes.
    pub fixed: usize,
    pub passes: usize,
    /// Diagnostics still reported against `output`.
    pub remaining: Vec<LintMessage>,
}

impl FixReport {
    pub fn changed(&self) -> bool {
        self.fixed > 0
    }
}

/// Result of fixing one file on disk.
#[derive(Debug)]
pub struct FileFix {
    pub file: SourceFile,
    pub report: FixReport,
    /// `None` when the run did not write.
    pub write: Option<WriteResult>,
}

#[derive(Debug, Default)]
pub struct Linter {
    rules: Vec<ActiveRule>,
}

impl Linter {
    pub fn new(rules: Vec<ActiveRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ActiveRule] {
        &self.rules
    }

    pub fn lint_source(
        &self,
        dialect: Dialect,
        source: &str,
    ) -> Result<Vec<LintMessage>, LintError> {
        with_parser(dialect, |parser| -> Result<Vec<LintMessage>, LintError> {
            let document = parser.parse_document(source)?;
            if document.has_errors() {
                tracing::debug!("document has syntax errors, linting best-effort");
            }
            Ok(self.lint_document(&document))
        })?
    }

    /// Check every container against every active rule, in document order.
    pub fn lint_document(&self, document: &ParsedDocument<'_>) -> Vec<LintMessage> {
        let ctx = RuleContext::new(document);
        let mut messages = Vec::new();
        for container in document.containers() {
            for active in &self.rules {
                if let Some(diagnostic) = active.rule.check(container, &ctx) {
                    tracing::trace!(
                        "{} reported {} at {}",
                        active.name,
                        diagnostic.message_kind.id(),
                        diagnostic.start
                    );
                    messages.push(LintMessage::new(diagnostic, active.severity));
                }
            }
        }
        messages
    }

    /// Lint and apply fixes until nothing changes or [`MAX_FIX_PASSES`] is
    /// reached. Fixed output that parses worse than `source` is an error.
    pub fn fix_source(&self, dialect: Dialect, source: &str) -> Result<FixReport, LintError> {
        let mut output = source.to_string();
        let mut fixed = 0;
        let mut passes = 0;
        let mut remaining = self.lint_source(dialect, &output)?;

        while passes < MAX_FIX_PASSES {
            let fixes: Vec<Fix> = remaining.iter().filter_map(|m| m.fix.clone()).collect();
            if fixes.is_empty() {
                break;
            }
            let outcome = apply_fixes(&output, &fixes);
            if !outcome.changed() {
                break;
            }
            passes += 1;
            fixed += outcome.applied.len();
            tracing::debug!(
                "pass {passes}: applied {}, deferred {}",
                outcome.applied.len(),
                outcome.deferred.len()
            );
            output = outcome.output;
            remaining = self.lint_source(dialect, &output)?;
        }

        if output != source {
            validate_fix(dialect, source, &output)
                .map_err(|source| LintError::IntroducedSyntaxErrors { source })?;
        }

        Ok(FixReport {
            output,
            fixed,
            passes,
            remaining,
        })
    }

    pub fn lint_path(&self, path: &Path) -> Result<Vec<LintMessage>, LintError> {
        let dialect = dialect_for(path)?;
        let file = SourceFile::read(path)?;
        tracing::debug!("linting {}", path.display());
        self.lint_source(dialect, &file.text)
    }

    /// Fix one file, writing the result back when `write` is set.
    pub fn fix_path(&self, path: &Path, write: bool) -> Result<FileFix, LintError> {
        let dialect = dialect_for(path)?;
        let file = SourceFile::read(path)?;
        let report = self.fix_source(dialect, &file.text)?;
        let write = if write {
            Some(file.write_fixed(&report.output)?)
        } else {
            None
        };
        Ok(FileFix {
            file,
            report,
            write,
        })
    }
}

fn dialect_for(path: &Path) -> Result<Dialect, LintError> {
    Dialect::from_path(path).ok_or_else(|| LintError::UnsupportedFile {
        path: path.to_path_buf(),
    })
}
