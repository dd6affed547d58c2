//! Content tree snapshot.
//!
//! A [`Pad`] owns every record of one load of the content tree in an arena,
//! plus path and URL lookup tables and the static assets. Pads are immutable;
//! reloading content produces a new pad with a new [`PadId`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;

use super::{Asset, LoadError, Record, RecordId, RecordKind};
use crate::context;
use crate::core::UrlPath;
use crate::env::{Env, ResolveOptions};
use crate::redirect::VirtualSource;

static NEXT_PAD_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a pad. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PadId(u64);

impl PadId {
    fn next() -> Self {
        Self(NEXT_PAD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Result of a path or URL lookup.
#[derive(Debug, Clone)]
pub enum Resolved<'a> {
    Record(&'a Record),
    Asset(&'a Asset),
    Virtual(VirtualSource),
}

impl Resolved<'_> {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_virtual(&self) -> Option<&VirtualSource> {
        match self {
            Self::Virtual(source) => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(record) => fmt::Display::fmt(record, f),
            Self::Asset(asset) => fmt::Display::fmt(asset, f),
            Self::Virtual(source) => fmt::Display::fmt(source, f),
        }
    }
}

pub struct Pad {
    id: PadId,
    env: Arc<Env>,
    records: Vec<Record>,
    by_path: FxHashMap<String, RecordId>,
    assets: BTreeMap<UrlPath, Asset>,
}

impl Pad {
    #[inline]
    pub fn id(&self) -> PadId {
        self.id
    }

    #[inline]
    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    #[inline]
    pub fn root(&self) -> &Record {
        &self.records[0]
    }

    /// Record by arena id. Does not record a dependency.
    #[inline]
    pub fn record(&self, id: RecordId) -> &Record {
        &self.records[id.index()]
    }

    /// All records in load order (parents before children).
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    /// Parent of `record`, or the record itself for the root.
    pub fn parent_or_self<'a>(&'a self, record: &'a Record) -> &'a Record {
        record.parent.map_or(record, |id| self.record(id))
    }

    /// Look up a record by tree path, recording its source files as
    /// dependencies of the active build context.
    pub fn get_record(&self, path: &str) -> Option<&Record> {
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        let record = self.record(*self.by_path.get(path)?);
        context::record_dependencies(&record.source_files);
        Some(record)
    }

    pub fn get_asset(&self, url_path: &str) -> Option<&Asset> {
        self.assets.get(url_path)
    }

    /// Look up a record or virtual source by path.
    ///
    /// ```ignore
    /// pad.get("/about");                       // record
    /// pad.get("/about@redirect/see/other");    // virtual source below /about
    /// pad.get("/@redirect-map/.redirect.map"); // virtual source below the root
    /// ```
    pub fn get(self: &Arc<Self>, path: &str) -> Option<Resolved<'_>> {
        let Some((record_path, virtual_path)) = path.split_once('@') else {
            return self.get_record(path).map(Resolved::Record);
        };

        let record = self.get_record(if record_path.is_empty() {
            "/"
        } else {
            record_path
        })?;
        let (prefix, rest) = virtual_path.split_once('/').unwrap_or((virtual_path, ""));
        let resolver = self.env.virtual_path_resolver(prefix)?;
        let pieces: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        resolver
            .resolve_virtual_path(self, record, &pieces)
            .map(Resolved::Virtual)
    }

    /// Resolve an incoming URL path.
    ///
    /// Walks the tree segment by segment from the root, matching child page
    /// slugs (hidden pages included) and attachment names. Where the walk
    /// stops, the registered URL resolvers get the remaining segments, from
    /// the deepest matched record back up to the root. Static assets are
    /// tried last.
    pub fn resolve_url_path(
        self: &Arc<Self>,
        url_path: &str,
        options: ResolveOptions,
    ) -> Option<Resolved<'_>> {
        let pieces: Vec<&str> = url_path.split('/').filter(|s| !s.is_empty()).collect();
        if let Some(resolved) = self.resolve_below(self.root(), &pieces, options) {
            return Some(resolved);
        }
        let normalized = UrlPath::normalize(&UrlPath::root(), url_path);
        self.assets.get(&normalized).map(Resolved::Asset)
    }

    fn resolve_below<'a>(
        self: &'a Arc<Self>,
        record: &'a Record,
        pieces: &[&str],
        options: ResolveOptions,
    ) -> Option<Resolved<'a>> {
        if pieces.is_empty() {
            return Some(Resolved::Record(record));
        }

        // Slugs may span several segments.
        for end in 1..=pieces.len() {
            let slug = pieces[..end].join("/");
            let child = record
                .children
                .iter()
                .map(|id| self.record(*id))
                .find(|child| child.slug == slug);
            if let Some(child) = child
                && let Some(resolved) = self.resolve_below(child, &pieces[end..], options)
            {
                return Some(resolved);
            }
        }

        if let [name] = pieces
            && let Some(attachment) = record
                .attachments
                .iter()
                .map(|id| self.record(*id))
                .find(|att| att.slug == *name)
        {
            return Some(Resolved::Record(attachment));
        }

        self.env
            .url_resolvers()
            .iter()
            .find_map(|resolver| resolver.resolve_url(self, record, pieces, options))
            .map(Resolved::Virtual)
    }
}

impl fmt::Debug for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pad")
            .field("id", &self.id)
            .field("records", &self.records.len())
            .field("assets", &self.assets.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PadBuilder
// ============================================================================

/// Assembles a pad record by record.
///
/// The root page exists from the start; adding `/` again replaces its fields.
/// Parents must be added before their children.
pub struct PadBuilder {
    env: Arc<Env>,
    records: Vec<Record>,
    by_path: FxHashMap<String, RecordId>,
    assets: BTreeMap<UrlPath, Asset>,
}

impl PadBuilder {
    pub fn new(env: Arc<Env>) -> Self {
        let root = Record {
            id: RecordId(0),
            kind: RecordKind::Page,
            path: "/".into(),
            slug: String::new(),
            url_path: UrlPath::root(),
            parent: None,
            fields: toml::Table::new(),
            hidden: false,
            children: Vec::new(),
            attachments: Vec::new(),
            source_files: Vec::new(),
        };
        let mut by_path = FxHashMap::default();
        by_path.insert("/".to_string(), RecordId(0));
        Self {
            env,
            records: vec![root],
            by_path,
            assets: BTreeMap::new(),
        }
    }

    /// Add a page at tree path `path` (e.g. `/about/more-detail`).
    pub fn page(
        &mut self,
        path: &str,
        fields: toml::Table,
        source_files: Vec<PathBuf>,
    ) -> Result<RecordId, LoadError> {
        if path == "/" {
            let root = &mut self.records[0];
            root.hidden = fields.get("_hidden").and_then(toml::Value::as_bool) == Some(true);
            root.fields = fields;
            root.source_files = source_files;
            return Ok(RecordId(0));
        }
        self.add(RecordKind::Page, path, fields, source_files)
    }

    /// Add an attachment at tree path `path` (e.g. `/images/apple-pie.jpg`).
    pub fn attachment(
        &mut self,
        path: &str,
        fields: toml::Table,
        source_files: Vec<PathBuf>,
    ) -> Result<RecordId, LoadError> {
        self.add(RecordKind::Attachment, path, fields, source_files)
    }

    /// Add a static asset served at `url_path`.
    pub fn asset(&mut self, url_path: &str, source: PathBuf) {
        let url_path = UrlPath::normalize(&UrlPath::root(), url_path);
        self.assets
            .insert(url_path.clone(), Asset { url_path, source });
    }

    fn add(
        &mut self,
        kind: RecordKind,
        path: &str,
        fields: toml::Table,
        source_files: Vec<PathBuf>,
    ) -> Result<RecordId, LoadError> {
        let path = path.trim_end_matches('/');
        let (parent_path, name) = path
            .rsplit_once('/')
            .filter(|(_, name)| !name.is_empty())
            .ok_or_else(|| LoadError::InvalidPath(path.to_string()))?;
        let parent_path = if parent_path.is_empty() {
            "/"
        } else {
            parent_path
        };

        if self.by_path.contains_key(path) {
            return Err(LoadError::Duplicate(path.to_string()));
        }
        let parent_id = *self
            .by_path
            .get(parent_path)
            .ok_or_else(|| LoadError::MissingParent(path.to_string()))?;
        let parent = &self.records[parent_id.index()];
        if parent.kind != RecordKind::Page {
            return Err(LoadError::NotAPage(parent_path.to_string()));
        }

        let slug = match kind {
            RecordKind::Page => fields
                .get("_slug")
                .and_then(toml::Value::as_str)
                .map(|s| s.trim_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| name.to_string()),
            RecordKind::Attachment => name.to_string(),
        };
        let url_path = match kind {
            RecordKind::Page => format!("{}{}/", parent.url_path, slug),
            RecordKind::Attachment => format!("{}{}", parent.url_path, slug),
        };

        let id = RecordId(
            u32::try_from(self.records.len()).map_err(|_| LoadError::TooLarge)?,
        );
        let hidden = fields.get("_hidden").and_then(toml::Value::as_bool) == Some(true);
        self.records.push(Record {
            id,
            kind,
            path: path.to_string(),
            slug,
            url_path: UrlPath::from_record(url_path),
            parent: Some(parent_id),
            fields,
            hidden,
            children: Vec::new(),
            attachments: Vec::new(),
            source_files,
        });
        self.by_path.insert(path.to_string(), id);

        let parent = &mut self.records[parent_id.index()];
        match kind {
            RecordKind::Page => parent.children.push(id),
            RecordKind::Attachment => parent.attachments.push(id),
        }
        Ok(id)
    }

    pub fn build(self) -> Arc<Pad> {
        Arc::new(Pad {
            id: PadId::next(),
            env: self.env,
            records: self.records,
            by_path: self.by_path,
            assets: self.assets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::fixture::{demo_pad, fields};
    use crate::report::BufferReporter;

    fn env() -> Arc<Env> {
        Env::new(SiteConfig::default(), Arc::new(BufferReporter::new()))
    }

    #[test]
    fn test_pad_ids_are_unique() {
        let env = env();
        let a = PadBuilder::new(Arc::clone(&env)).build();
        let b = PadBuilder::new(env).build();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_record_urls() {
        let pad = demo_pad(env());
        let detail = pad.get_record("/about/more-detail").unwrap();
        assert_eq!(detail.url_path(), "/about/more-detail/");
        assert_eq!(pad.record(detail.parent().unwrap()).path(), "/about");

        let pie = pad.get_record("/images/apple-pie.jpg").unwrap();
        assert!(pie.is_attachment());
        assert_eq!(pie.url_path(), "/images/apple-pie.jpg");

        assert_eq!(pad.root().url_path(), "/");
        assert!(pad.get_record("/missing").is_none());
    }

    #[test]
    fn test_slug_override() {
        let mut builder = PadBuilder::new(env());
        builder
            .page("/blog", fields("_slug = \"news\""), Vec::new())
            .unwrap();
        builder.page("/blog/first", fields(""), Vec::new()).unwrap();
        let pad = builder.build();

        let first = pad.get_record("/blog/first").unwrap();
        assert_eq!(first.url_path(), "/news/first/");
        assert_eq!(
            pad.resolve_url_path("/news/first/", ResolveOptions::default())
                .and_then(|r| r.as_record().map(|r| r.path().to_string())),
            Some("/blog/first".to_string())
        );
        assert!(
            pad.resolve_url_path("/blog/first/", ResolveOptions::default())
                .is_none()
        );
    }

    #[test]
    fn test_builder_errors() {
        let mut builder = PadBuilder::new(env());
        assert!(matches!(
            builder.page("/a/b", fields(""), Vec::new()),
            Err(LoadError::MissingParent(_))
        ));
        builder
            .attachment("/file.txt", fields(""), Vec::new())
            .unwrap();
        assert!(matches!(
            builder.page("/file.txt/x", fields(""), Vec::new()),
            Err(LoadError::NotAPage(_))
        ));
        assert!(matches!(
            builder.attachment("/file.txt", fields(""), Vec::new()),
            Err(LoadError::Duplicate(_))
        ));
    }

    #[test]
    fn test_resolve_url_path_records_and_assets() {
        let pad = demo_pad(env());
        let opts = ResolveOptions::default();

        let about = pad.resolve_url_path("/about/", opts).unwrap();
        assert_eq!(about.as_record().unwrap().path(), "/about");

        let hidden = pad.resolve_url_path("/projects", opts).unwrap();
        assert_eq!(hidden.as_record().unwrap().path(), "/projects");

        let pie = pad.resolve_url_path("/images/apple-pie.jpg", opts).unwrap();
        assert!(pie.as_record().unwrap().is_attachment());

        let css = pad.resolve_url_path("/static/style.css", opts).unwrap();
        assert!(matches!(css, Resolved::Asset(_)));

        assert!(pad.resolve_url_path("/nope/", opts).is_none());
    }

    #[test]
    fn test_get_records_dependencies() {
        let pad = demo_pad(env());
        let ctx = context::Context::new();
        {
            let _guard = context::enter(&ctx);
            pad.get_record("/about");
            pad.record(pad.root().id());
        }
        assert_eq!(
            ctx.dependencies(),
            [PathBuf::from("content/about/contents.toml")]
        );
    }

    #[test]
    fn test_get_unknown_virtual_prefix() {
        let pad = demo_pad(env());
        assert!(pad.get("/about@nothing/here").is_none());
        assert!(pad.get("/missing@redirect/x").is_none());
    }
}
