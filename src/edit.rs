use crate::range::TextRange;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// A single text operation against the original document.
///
/// All offsets refer to the document as it was parsed; nothing is applied
/// until a whole batch of fixes is spliced in one pass by [`apply_fixes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    /// Replace `[range.start, range.end)` with `text`.
    Replace { range: TextRange, text: String },
    /// Insert `text` at byte offset `at`.
    Insert { at: usize, text: String },
    /// Delete `[range.start, range.end)`.
    Remove { range: TextRange },
}

impl TextEdit {
    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        TextEdit::Replace {
            range,
            text: text.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        TextEdit::Insert {
            at,
            text: text.into(),
        }
    }

    pub fn remove(range: TextRange) -> Self {
        TextEdit::Remove { range }
    }

    /// The original-document range this edit consumes.
    pub fn range(&self) -> TextRange {
        match self {
            TextEdit::Replace { range, .. } | TextEdit::Remove { range } => *range,
            TextEdit::Insert { at, .. } => TextRange::empty(*at),
        }
    }

    pub fn new_text(&self) -> &str {
        match self {
            TextEdit::Replace { text, .. } | TextEdit::Insert { text, .. } => text,
            TextEdit::Remove { .. } => "",
        }
    }
}

/// The ordered edits that resolve one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    edits: Vec<TextEdit>,
}

impl Fix {
    /// Edits are kept in document order; insertions sort before a
    /// replacement starting at the same offset.
    pub fn new(mut edits: Vec<TextEdit>) -> Self {
        edits.sort_by_key(|edit| {
            let range = edit.range();
            (range.start, range.end)
        });
        Self { edits }
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    /// The smallest range covering every edit; two fixes conflict when their
    /// spans touch.
    pub fn span(&self) -> Option<TextRange> {
        let mut iter = self.edits.iter().map(TextEdit::range);
        let first = iter.next()?;
        Some(iter.fold(first, |acc, range| acc.cover(range)))
    }

    /// Check the edits against the document they were computed from.
    pub fn validate(&self, source: &str) -> Result<(), EditError> {
        let mut last_end = 0usize;
        for edit in &self.edits {
            let range = edit.range();
            if range.start > range.end || range.end > source.len() {
                return Err(EditError::InvalidByteRange {
                    byte_start: range.start,
                    byte_end: range.end,
                    len: source.len(),
                });
            }
            if !source.is_char_boundary(range.start) || !source.is_char_boundary(range.end) {
                return Err(EditError::InvalidUtf8Edit);
            }
            if range.start < last_end {
                return Err(EditError::OverlappingEdits {
                    byte_start: range.start,
                    previous_end: last_end,
                });
            }
            last_end = range.end;
        }
        Ok(())
    }

    /// Apply this fix alone to `source`.
    pub fn apply_to(&self, source: &str) -> Result<String, EditError> {
        self.validate(source)?;
        let mut out = String::with_capacity(source.len() + 16);
        let mut cursor = 0;
        splice_into(&mut out, source, &mut cursor, &self.edits);
        out.push_str(&source[cursor..]);
        Ok(out)
    }
}

fn splice_into(out: &mut String, source: &str, cursor: &mut usize, edits: &[TextEdit]) {
    for edit in edits {
        let range = edit.range();
        out.push_str(&source[*cursor..range.start]);
        out.push_str(edit.new_text());
        *cursor = range.end;
    }
}

/// Result of splicing a batch of fixes into one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub output: String,
    /// Indices (into the input slice) of fixes that were spliced in.
    pub applied: Vec<usize>,
    /// Fixes that touched an already accepted fix; retry them on a later pass.
    pub deferred: Vec<usize>,
    /// Fixes whose edits were invalid for this document.
    pub rejected: Vec<usize>,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Apply many fixes to `source` in a single left-to-right pass.
///
/// Fixes are taken in order of their span start. A fix whose span starts at or
/// before the end of the previously accepted one is deferred, so edits from
/// different fixes never interleave.
pub fn apply_fixes(source: &str, fixes: &[Fix]) -> FixOutcome {
    let mut order: Vec<(usize, TextRange)> = Vec::with_capacity(fixes.len());
    let mut rejected = Vec::new();

    for (idx, fix) in fixes.iter().enumerate() {
        match (fix.validate(source), fix.span()) {
            (Ok(()), Some(span)) => order.push((idx, span)),
            (Err(err), _) => {
                tracing::warn!("rejecting fix #{idx}: {err}");
                rejected.push(idx);
            }
            (Ok(()), None) => rejected.push(idx),
        }
    }
    order.sort_by_key(|&(idx, span)| (span.start, span.end, idx));

    let mut out = String::with_capacity(source.len() + 16 * order.len());
    let mut cursor = 0usize;
    let mut last_end: Option<usize> = None;
    let mut applied = Vec::new();
    let mut deferred = Vec::new();

    for (idx, span) in order {
        if last_end.is_some_and(|end| span.start <= end) {
            tracing::debug!("deferring fix #{idx} at {span}: touches a previous fix");
            deferred.push(idx);
            continue;
        }
        splice_into(&mut out, source, &mut cursor, fixes[idx].edits());
        last_end = Some(span.end);
        applied.push(idx);
    }
    out.push_str(&source[cursor..]);

    applied.sort_unstable();
    deferred.sort_unstable();
    rejected.sort_unstable();
    FixOutcome {
        output: out,
        applied,
        deferred,
        rejected,
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("{path} changed on disk since it was read")]
    ContentChanged { path: PathBuf },

    #[error("Invalid byte range: [{byte_start}, {byte_end}) in document of length {len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        len: usize,
    },

    #[error("Edit at byte {byte_start} overlaps a previous edit ending at {previous_end}")]
    OverlappingEdits {
        byte_start: usize,
        previous_end: usize,
    },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid edit would split a UTF-8 character")]
    InvalidUtf8Edit,
}

/// Result of writing fixed text back to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "WriteResult should be checked for success/unchanged"]
pub enum WriteResult {
    Written { file: PathBuf, bytes: usize },
    Unchanged { file: PathBuf },
}

/// A source file snapshot with the hash of the contents that were analysed.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    hash: u64,
}

impl SourceFile {
    pub fn read(path: impl Into<PathBuf>) -> Result<Self, EditError> {
        let path = path.into();
        let text = fs::read_to_string(&path)?;
        let hash = xxh3_64(text.as_bytes());
        Ok(Self { path, text, hash })
    }

    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let hash = xxh3_64(text.as_bytes());
        Self {
            path: path.into(),
            text,
            hash,
        }
    }

    /// Replace the file's contents with `fixed`, refusing if the file on disk
    /// no longer matches the snapshot.
    pub fn write_fixed(&self, fixed: &str) -> Result<WriteResult, EditError> {
        if fixed == self.text {
            return Ok(WriteResult::Unchanged {
                file: self.path.clone(),
            });
        }

        let current = fs::read(&self.path)?;
        if xxh3_64(&current) != self.hash {
            return Err(EditError::ContentChanged {
                path: self.path.clone(),
            });
        }

        atomic_write(&self.path, fixed.as_bytes())?;
        Ok(WriteResult::Written {
            file: self.path.clone(),
            bytes: fixed.len(),
        })
    }
}

/// Atomic file write: tempfile + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), EditError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
