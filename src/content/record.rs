//! Content records: pages and attachments.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::UrlPath;

/// Index of a record in its pad's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub(crate) u32);

impl RecordId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A directory with a `contents.toml`.
    Page,
    /// Any other file inside a page directory.
    Attachment,
}

impl RecordKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Page => "Page",
            Self::Attachment => "Attachment",
        }
    }
}

/// Node of the content tree.
#[derive(Debug, Clone)]
pub struct Record {
    pub(crate) id: RecordId,
    pub(crate) kind: RecordKind,
    /// Tree path, `/` for the root, `/about/more-detail` below it.
    pub(crate) path: String,
    /// Last URL segment (directory slug or attachment file name).
    pub(crate) slug: String,
    pub(crate) url_path: UrlPath,
    pub(crate) parent: Option<RecordId>,
    pub(crate) fields: toml::Table,
    pub(crate) hidden: bool,
    pub(crate) children: Vec<RecordId>,
    pub(crate) attachments: Vec<RecordId>,
    pub(crate) source_files: Vec<PathBuf>,
}

impl Record {
    #[inline]
    pub fn id(&self) -> RecordId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    #[inline]
    pub fn is_attachment(&self) -> bool {
        self.kind == RecordKind::Attachment
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Canonical URL of the record.
    #[inline]
    pub fn url_path(&self) -> &UrlPath {
        &self.url_path
    }

    #[inline]
    pub fn parent(&self) -> Option<RecordId> {
        self.parent
    }

    /// Whether the record is hidden from listings (`_hidden = true`).
    ///
    /// Hidden records still have URLs and are still built.
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Child pages, including hidden ones.
    #[inline]
    pub fn children(&self) -> &[RecordId] {
        &self.children
    }

    #[inline]
    pub fn attachments(&self) -> &[RecordId] {
        &self.attachments
    }

    /// Files on disk this record was loaded from.
    pub fn source_files(&self) -> impl Iterator<Item = &Path> {
        self.source_files.iter().map(PathBuf::as_path)
    }

    /// Raw field value by name.
    pub fn field(&self, name: &str) -> Option<&toml::Value> {
        self.fields.get(name)
    }

    /// Field value read as a list of strings.
    ///
    /// Arrays must hold only strings. A plain string is split into its
    /// non-blank lines. Anything else reads as absent.
    pub fn string_list(&self, name: &str) -> Option<Vec<&str>> {
        match self.field(name)? {
            toml::Value::Array(items) => items.iter().map(toml::Value::as_str).collect(),
            toml::Value::String(text) => Some(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} path='{}'>", self.kind.name(), self.path)
    }
}

/// Static file from the assets directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub(crate) url_path: UrlPath,
    pub(crate) source: PathBuf,
}

impl Asset {
    #[inline]
    pub fn url_path(&self) -> &UrlPath {
        &self.url_path
    }

    #[inline]
    pub fn source(&self) -> &Path {
        &self.source
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Asset path='{}'>", self.url_path)
    }
}

/// Input to a generator: a record or a static asset.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Record(&'a Record),
    Asset(&'a Asset),
}

impl<'a> Source<'a> {
    pub fn as_record(&self) -> Option<&'a Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::Asset(_) => None,
        }
    }

    pub fn url_path(&self) -> &'a UrlPath {
        match self {
            Self::Record(record) => record.url_path(),
            Self::Asset(asset) => asset.url_path(),
        }
    }
}

impl fmt::Display for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(record) => fmt::Display::fmt(record, f),
            Self::Asset(asset) => fmt::Display::fmt(asset, f),
        }
    }
}
