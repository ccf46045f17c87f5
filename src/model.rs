//! Data model for parsed documentation -- format-agnostic.
//!
//! Built by the parsers for a whole run and handed read-only to renderers.
//! Every container is append-only; entities are never removed.

use std::path::PathBuf;

pub const DEFAULT_BAR_COLOR: &str = "w3-blue";
pub const DEFAULT_TITLE_COLOR: &str = "w3-black";
pub const DEFAULT_HEADING_COLOR: &str = "w3-text-blue";

/// Appearance overrides set by `@color`, `@font`, `@logo` and `@version`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Style {
    pub bar_color: Option<String>,
    pub title_color: Option<String>,
    /// Explicit third `@color` argument, or derived from the bar color.
    pub heading_color: Option<String>,
    pub font_body: Option<String>,
    pub font_headings: Option<String>,
    /// The markdown image given to `@logo`.
    pub logo: Option<String>,
    pub version: Option<String>,
}

impl Style {
    /// Overlay every field `other` sets. Later settings win.
    pub fn merge(&mut self, other: Style) {
        let Style {
            bar_color,
            title_color,
            heading_color,
            font_body,
            font_headings,
            logo,
            version,
        } = other;
        for (field, value) in [
            (&mut self.bar_color, bar_color),
            (&mut self.title_color, title_color),
            (&mut self.heading_color, heading_color),
            (&mut self.font_body, font_body),
            (&mut self.font_headings, font_headings),
            (&mut self.logo, logo),
            (&mut self.version, version),
        ] {
            if value.is_some() {
                *field = value;
            }
        }
    }
}

/// Style after falling back to the mainpage and then to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle<'a> {
    pub bar_color: &'a str,
    pub title_color: &'a str,
    pub heading_color: &'a str,
    pub font_body: Option<&'a str>,
    pub font_headings: Option<&'a str>,
    pub logo: Option<&'a str>,
    pub version: Option<&'a str>,
}

/// An `@example` title. The code itself stays in the owning section's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub title: String,
}

/// Shape shared by modules, classes, markdown documents and the mainpage.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub subtitle: Option<String>,
    pub text: Option<String>,
    pub style: Style,
    pub examples: Vec<Example>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Section {
            title: title.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Module,
    Class,
}

/// A module (`@defgroup`) or class (`@class`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub section: Section,
    pub functions: Vec<Function>,
    /// Created by `@ingroup`/`@inclass` and not yet declared.
    pub stub: bool,
}

impl Module {
    pub fn stub(title: impl Into<String>) -> Self {
        Module {
            section: Section::new(title),
            functions: Vec::new(),
            stub: true,
        }
    }
}

/// A documented function or method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub brief: Option<String>,
    /// Signature followed by the `@param`/`@return` lines.
    pub prototype: String,
    pub notes: Option<String>,
    pub lang: Option<String>,
}

/// A level 2-6 heading inside a markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub text: String,
}

/// A standalone markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownDoc {
    /// Title is the file name; text is the whole file verbatim.
    pub section: Section,
    pub path: PathBuf,
    pub outline: Vec<Heading>,
}

/// An image link found in text or `@logo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub link: String,
}

/// An image file discovered among the inputs before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub referenced: bool,
}

impl ImageFile {
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name()?.to_str()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Images {
    pub refs: Vec<ImageRef>,
    pub files: Vec<ImageFile>,
}

impl Images {
    /// Mark the input image named `link` as referenced. Links with a path
    /// are external and always succeed.
    pub fn reference(&mut self, link: &str) -> bool {
        if link.contains('/') {
            return true;
        }
        match self
            .files
            .iter_mut()
            .find(|f| f.file_name() == Some(link))
        {
            Some(file) => {
                file.referenced = true;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub modules: usize,
    pub functions: usize,
    pub classes: usize,
    pub methods: usize,
    pub examples: usize,
    pub documents: usize,
    pub images: usize,
    pub files: usize,
    pub comments: usize,
    pub warnings: usize,
}

#[derive(Debug, Default)]
pub struct Document {
    pub mainpage: Option<Section>,
    pub modules: Vec<Module>,
    pub classes: Vec<Module>,
    pub documents: Vec<MarkdownDoc>,
    pub images: Images,
    /// Source and markdown files read.
    pub files: usize,
    /// Comment headers processed.
    pub comments: usize,
}

impl Document {
    pub fn list(&self, kind: ModuleKind) -> &[Module] {
        match kind {
            ModuleKind::Module => &self.modules,
            ModuleKind::Class => &self.classes,
        }
    }

    pub fn list_mut(&mut self, kind: ModuleKind) -> &mut Vec<Module> {
        match kind {
            ModuleKind::Module => &mut self.modules,
            ModuleKind::Class => &mut self.classes,
        }
    }

    pub fn find(&self, kind: ModuleKind, title: &str) -> Option<&Module> {
        self.list(kind).iter().find(|m| m.section.title == title)
    }

    pub fn find_mut(&mut self, kind: ModuleKind, title: &str) -> Option<&mut Module> {
        self.list_mut(kind).iter_mut().find(|m| m.section.title == title)
    }

    fn sections(&self) -> impl Iterator<Item = &Section> {
        self.mainpage
            .iter()
            .chain(self.modules.iter().map(|m| &m.section))
            .chain(self.classes.iter().map(|m| &m.section))
            .chain(self.documents.iter().map(|d| &d.section))
    }

    pub fn stats(&self, warnings: usize) -> Stats {
        Stats {
            modules: self.modules.len(),
            functions: self.modules.iter().map(|m| m.functions.len()).sum(),
            classes: self.classes.len(),
            methods: self.classes.iter().map(|m| m.functions.len()).sum(),
            examples: self.sections().map(|s| s.examples.len()).sum(),
            documents: self.documents.len(),
            images: self.images.refs.len(),
            files: self.files,
            comments: self.comments,
            warnings,
        }
    }

    /// Everything that would produce output. Zero means there is nothing to build.
    pub fn num_objects(&self) -> usize {
        let s = self.stats(0);
        usize::from(self.mainpage.is_some())
            + s.modules
            + s.functions
            + s.classes
            + s.methods
            + s.examples
            + s.documents
    }

    /// Resolve a section's style: its own value, then the mainpage's, then the default.
    pub fn style<'a>(&'a self, section: &'a Section) -> ResolvedStyle<'a> {
        let main = self.mainpage.as_ref().map(|m| &m.style);
        let pick = |own: &'a Option<String>, from_main: fn(&'a Style) -> &'a Option<String>| {
            own.as_deref()
                .or_else(|| main.and_then(|m| from_main(m).as_deref()))
        };
        ResolvedStyle {
            bar_color: pick(&section.style.bar_color, |s| &s.bar_color)
                .unwrap_or(DEFAULT_BAR_COLOR),
            title_color: pick(&section.style.title_color, |s| &s.title_color)
                .unwrap_or(DEFAULT_TITLE_COLOR),
            heading_color: pick(&section.style.heading_color, |s| &s.heading_color)
                .unwrap_or(DEFAULT_HEADING_COLOR),
            font_body: pick(&section.style.font_body, |s| &s.font_body),
            font_headings: pick(&section.style.font_headings, |s| &s.font_headings),
            logo: pick(&section.style.logo, |s| &s.logo),
            version: pick(&section.style.version, |s| &s.version),
        }
    }
}

/// Insert into `list`, keeping case-insensitive order of `key` when `sort`
/// is set (equal keys keep encounter order), else appending. Returns the index.
pub fn insert_sorted<T>(list: &mut Vec<T>, item: T, sort: bool, key: impl Fn(&T) -> &str) -> usize {
    if !sort {
        list.push(item);
        return list.len() - 1;
    }
    let new_key = key(&item).to_lowercase();
    let idx = list
        .iter()
        .position(|existing| key(existing).to_lowercase() > new_key)
        .unwrap_or(list.len());
    list.insert(idx, item);
    idx
}
