//! Parser module: source comment headers and markdown files into the
//! document model.
//!
//! One [`Parser`] lives for the whole run and accumulates every file into a
//! single [`Document`]. Each file gets a fresh [`FileContext`], so the
//! current module set in one file never leaks into the next.

pub mod function;
pub mod markdown;
pub mod section;
pub mod text;

use crate::diag::{Diagnostics, WarningKind};
use crate::header;
use crate::model::{insert_sorted, Document, ImageFile, Module, ModuleKind};
use crate::source::SourceFile;
use std::fs;
use std::path::{Path, PathBuf};

/// Run-wide parse settings.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Keep modules, classes, functions and documents in case-insensitive
    /// alphabetical order instead of encounter order.
    pub sort: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { sort: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Source,
    Markdown,
}

/// The module or class that functions currently attach to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModuleRef {
    pub kind: ModuleKind,
    pub title: String,
}

/// Per-file parse state.
pub(crate) struct FileContext<'a> {
    pub source: &'a SourceFile,
    pub current: Option<ModuleRef>,
}

#[derive(Debug, Default)]
pub struct Parser {
    pub doc: Document,
    pub diag: Diagnostics,
    opts: ParseOptions,
}

impl Parser {
    pub fn new(opts: ParseOptions) -> Self {
        Parser {
            doc: Document::default(),
            diag: Diagnostics::default(),
            opts,
        }
    }

    /// Register an image found among the inputs, before any parsing.
    pub fn add_image_file(&mut self, path: PathBuf) {
        tracing::debug!(path = %path.display(), "input image");
        self.doc.images.files.push(ImageFile {
            path,
            referenced: false,
        });
    }

    /// Read and parse one input file. Unreadable or empty files are a warning.
    pub fn parse_file(&mut self, path: &Path, kind: FileKind) {
        self.doc.files += 1;
        match fs::read_to_string(path) {
            Ok(text) if !text.is_empty() => self.parse_source(path, &text, kind),
            _ => self
                .diag
                .warn(WarningKind::ReadFile, Some(path.display().to_string())),
        }
    }

    /// Parse file contents already in memory.
    pub fn parse_source(&mut self, path: &Path, text: &str, kind: FileKind) {
        tracing::debug!(path = %path.display(), ?kind, "parse file");
        let source = SourceFile::new(path, text);
        let mut cx = FileContext {
            source: &source,
            current: None,
        };
        match kind {
            FileKind::Source => {
                for hdr in header::find_headers(&source) {
                    self.parse_header(&mut cx, &hdr);
                }
            }
            FileKind::Markdown => self.parse_markdown(&mut cx),
        }
    }

    fn warn_at(
        &mut self,
        cx: &FileContext<'_>,
        kind: WarningKind,
        detail: Option<String>,
        offset: usize,
    ) {
        self.diag.warn_at(kind, detail, cx.source, offset);
    }

    /// Insert a module or class honoring the sort policy.
    fn insert_module(&mut self, kind: ModuleKind, module: Module) {
        let sort = self.opts.sort;
        insert_sorted(self.doc.list_mut(kind), module, sort, |m| {
            m.section.title.as_str()
        });
    }

    fn current_module_mut(&mut self, cx: &FileContext<'_>) -> Option<&mut Module> {
        let current = cx.current.as_ref()?;
        self.doc.find_mut(current.kind, &current.title)
    }
}
