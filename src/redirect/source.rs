//! Virtual sources produced by the redirect plugin.
//!
//! | Source        | Virtual path                     | Artifact                  |
//! |---------------|----------------------------------|---------------------------|
//! | `Redirect`    | `/about@redirect/see/other`      | `see/other/index.html`    |
//! | `RedirectMap` | `/@redirect-map/.redirect.map`   | `.redirect.map`           |
//!
//! Two sources are equal when their virtual paths are equal.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use super::{RedirectPlugin, quote_for_map};
use crate::content::{Pad, Record, RecordId};
use crate::core::UrlPath;
use crate::embed::Template;
use crate::embed::build::RedirectVars;

/// Virtual path prefix of redirect pages.
pub const REDIRECT_PREFIX: &str = "redirect";
/// Virtual path prefix of the redirect map.
pub const REDIRECT_MAP_PREFIX: &str = "redirect-map";

const HTML_EXTS: [&str; 2] = ["html", "htm"];

/// `<record_path>@<prefix><url_path without trailing slash>`
fn virtual_path(record_path: &str, prefix: &str, url_path: &UrlPath) -> String {
    format!(
        "{}@{}{}",
        record_path,
        prefix,
        url_path.as_str().trim_end_matches('/')
    )
}

/// URL path addressed by the pieces after `@prefix`.
///
/// `["see", "other"]` -> `/see/other/`, `["flag.html"]` -> `/flag.html`.
/// No pieces address nothing.
pub(crate) fn url_from_pieces(pieces: &[&str]) -> Option<UrlPath> {
    if pieces.is_empty() {
        return None;
    }
    Some(UrlPath::normalize(&UrlPath::root(), &pieces.join("/")))
}

// ============================================================================
// VirtualSource
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VirtualSource {
    Redirect(Redirect),
    RedirectMap(RedirectMap),
}

impl VirtualSource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Redirect(_) => "Redirect",
            Self::RedirectMap(_) => "RedirectMap",
        }
    }

    /// Virtual path identifying this source.
    pub fn path(&self) -> String {
        match self {
            Self::Redirect(redirect) => redirect.path(),
            Self::RedirectMap(map) => map.path(),
        }
    }

    pub fn url_path(&self) -> &UrlPath {
        match self {
            Self::Redirect(redirect) => redirect.url_path(),
            Self::RedirectMap(map) => map.url_path(),
        }
    }

    /// Record the source hangs off: the redirect target, or the root.
    pub fn record(&self) -> RecordId {
        match self {
            Self::Redirect(redirect) => redirect.target(),
            Self::RedirectMap(map) => map.root(),
        }
    }

    /// Output path relative to the output directory, with a leading `/`.
    pub fn artifact_name(&self) -> String {
        match self {
            Self::Redirect(redirect) => redirect.artifact_name(),
            Self::RedirectMap(map) => map.artifact_name(),
        }
    }

    pub fn as_redirect(&self) -> Option<&Redirect> {
        match self {
            Self::Redirect(redirect) => Some(redirect),
            Self::RedirectMap(_) => None,
        }
    }

    pub fn as_redirect_map(&self) -> Option<&RedirectMap> {
        match self {
            Self::RedirectMap(map) => Some(map),
            Self::Redirect(_) => None,
        }
    }
}

impl fmt::Display for VirtualSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} path='{}'>", self.kind(), self.path())
    }
}

// ============================================================================
// Redirect
// ============================================================================

/// A redirect page from `url_path` to a target record.
#[derive(Debug, Clone)]
pub struct Redirect {
    target: RecordId,
    target_path: Arc<str>,
    url_path: UrlPath,
}

impl Redirect {
    pub fn new(target: &Record, url_path: UrlPath) -> Self {
        Self {
            target: target.id(),
            target_path: Arc::from(target.path()),
            url_path,
        }
    }

    pub fn target(&self) -> RecordId {
        self.target
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    /// URL redirected from.
    pub fn url_path(&self) -> &UrlPath {
        &self.url_path
    }

    pub fn path(&self) -> String {
        virtual_path(&self.target_path, REDIRECT_PREFIX, &self.url_path)
    }

    /// `/old/` -> `/old/index.html`, `/old.html` -> `/old.html`,
    /// `/old.jpg` -> `/old.jpg/index.html`
    pub fn artifact_name(&self) -> String {
        let url = self.url_path.as_str();
        if self.url_path.is_page_url() {
            return format!("{url}index.html");
        }
        let is_html = url
            .rsplit('/')
            .next()
            .and_then(|name| name.rsplit_once('.'))
            .is_some_and(|(_, ext)| HTML_EXTS.contains(&ext.to_ascii_lowercase().as_str()));
        if is_html {
            url.to_string()
        } else {
            format!("{url}/index.html")
        }
    }

    /// Render the redirect page for this source.
    pub fn render(&self, pad: &Pad, template: &Template<RedirectVars>) -> String {
        let base_path = pad.env().config().base_path();
        let target = pad.record(self.target);
        template.render(&RedirectVars {
            target_url: target.url_path().with_base(&base_path),
            redirect_url: self.url_path.to_string(),
            target_path: target.path().to_string(),
        })
    }
}

impl PartialEq for Redirect {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for Redirect {}

impl Hash for Redirect {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path().hash(state);
    }
}

// ============================================================================
// RedirectMap
// ============================================================================

/// The nginx redirect map of a whole site, hung off the root record.
///
/// Entries are computed once per source (clones share them) from a fresh
/// redirect index, so they must first be requested outside any build
/// context.
#[derive(Debug, Clone)]
pub struct RedirectMap {
    root: RecordId,
    root_path: Arc<str>,
    url_path: UrlPath,
    entries: Arc<OnceLock<Vec<(String, String)>>>,
}

impl RedirectMap {
    pub fn new(root: &Record, url_path: UrlPath) -> Self {
        Self {
            root: root.id(),
            root_path: Arc::from(root.path()),
            url_path,
            entries: Arc::default(),
        }
    }

    pub fn root(&self) -> RecordId {
        self.root
    }

    pub fn url_path(&self) -> &UrlPath {
        &self.url_path
    }

    pub fn path(&self) -> String {
        virtual_path(&self.root_path, REDIRECT_MAP_PREFIX, &self.url_path)
    }

    pub fn artifact_name(&self) -> String {
        self.url_path.to_string()
    }

    /// `(from, to)` pairs sorted by source URL, both joined onto the base path.
    pub fn entries(&self, plugin: &RedirectPlugin, pad: &Arc<Pad>) -> &[(String, String)] {
        self.entries.get_or_init(|| plugin.iter_redirect_map(pad))
    }

    /// Digest of the map contents, hex encoded.
    pub fn checksum(&self, plugin: &RedirectPlugin, pad: &Arc<Pad>) -> String {
        let mut hasher = blake3::Hasher::new();
        for (from, to) in self.entries(plugin, pad) {
            hasher.update(from.as_bytes());
            hasher.update(b"\0");
            hasher.update(to.as_bytes());
            hasher.update(b"\0");
        }
        hex::encode(hasher.finalize().as_bytes())
    }

    /// The map file: one `from to;` line per entry.
    pub fn render(&self, plugin: &RedirectPlugin, pad: &Arc<Pad>) -> String {
        let entries = self.entries(plugin, pad);
        let mut out = String::with_capacity(entries.len() * 48);
        for (from, to) in entries {
            out.push_str(&quote_for_map(from));
            out.push(' ');
            out.push_str(&quote_for_map(to));
            out.push_str(";\n");
        }
        out
    }
}

impl PartialEq for RedirectMap {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for RedirectMap {}

impl Hash for RedirectMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path().hash(state);
    }
}
