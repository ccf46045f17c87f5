//! Structured warning events.
//!
//! The parsers never fail: every problem becomes a [`Warning`] pushed onto
//! [`Diagnostics`], and parsing continues with the next line, section or
//! file. Formatting for a terminal is left to the caller.

use crate::source::SourceFile;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WarningKind {
    #[error("no module or class defined")]
    NoModule,
    #[error("duplicate class, module, markdown document or mainpage")]
    Duplicate,
    #[error("function does not follow comment")]
    NoFunction,
    #[error("function does not precede doc string")]
    BadDocString,
    #[error("invalid syntax")]
    Syntax,
    #[error("empty content in example: expected a code block")]
    EmptyExample,
    #[error("file or folder doesn't exist")]
    InvalidInput,
    #[error("couldn't create folder")]
    CreateFolder,
    #[error("couldn't create file")]
    CreateFile,
    #[error("no objects or documents defined. Nothing to do")]
    NoObjects,
    #[error("image file not found")]
    NoImage,
    #[error("could not read possibly empty file")]
    ReadFile,
}

impl WarningKind {
    /// Stable short code, e.g. `W002`.
    pub fn code(self) -> &'static str {
        match self {
            WarningKind::NoModule => "W001",
            WarningKind::Duplicate => "W002",
            WarningKind::NoFunction => "W003",
            WarningKind::BadDocString => "W004",
            WarningKind::Syntax => "W005",
            WarningKind::EmptyExample => "W006",
            WarningKind::InvalidInput => "W007",
            WarningKind::CreateFolder => "W009",
            WarningKind::CreateFile => "W010",
            WarningKind::NoObjects => "W011",
            WarningKind::NoImage => "W012",
            WarningKind::ReadFile => "W014",
        }
    }
}

/// Where in an input file a warning applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub line: usize,
    pub col: usize,
    /// The offending line, for caret display.
    pub text: String,
}

impl Location {
    pub fn resolve(source: &SourceFile, offset: usize) -> Self {
        let (line, col) = source.locate(offset);
        Location {
            path: source.path().to_path_buf(),
            line,
            col,
            text: source.line_text(line).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub detail: Option<String>,
    pub location: Option<Location>,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.kind.code(), self.kind)?;
        if let Some(ref detail) = self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning with no file position.
    pub fn warn(&mut self, kind: WarningKind, detail: Option<String>) {
        tracing::debug!(code = kind.code(), ?detail, "warning");
        self.warnings.push(Warning {
            kind,
            detail,
            location: None,
        });
    }

    /// Record a warning at a byte offset of `source`.
    pub fn warn_at(
        &mut self,
        kind: WarningKind,
        detail: Option<String>,
        source: &SourceFile,
        offset: usize,
    ) {
        let location = Location::resolve(source, offset);
        tracing::debug!(
            code = kind.code(),
            ?detail,
            line = location.line,
            col = location.col,
            "warning"
        );
        self.warnings.push(Warning {
            kind,
            detail,
            location: Some(location),
        });
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of warnings of one kind.
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }
}
