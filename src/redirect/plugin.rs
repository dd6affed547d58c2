//! The redirect plugin: configuration access, index caching, and the hooks
//! it registers with an [`Env`].

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{
    IndexCache, REDIRECT_MAP_PREFIX, REDIRECT_PREFIX, Redirect, RedirectIndex, RedirectMap,
    SetupError, VirtualSource, declared_redirects, url_from_pieces,
};
use crate::config::SiteConfig;
use crate::content::{Pad, Record, Source};
use crate::core::UrlPath;
use crate::env::{Env, Generator, ResolveOptions, UrlResolver, VirtualPathResolver};
use crate::debug;

#[derive(Debug, Default)]
pub struct RedirectPlugin {
    cache: IndexCache,
}

impl RedirectPlugin {
    pub const NAME: &'static str = "redirect";

    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register the redirect and redirect-map hooks with `env`.
    ///
    /// Fails when the site configures alternates.
    pub fn setup_env(self: &Arc<Self>, env: &Env) -> Result<(), SetupError> {
        self.ensure_alts_disabled(env.config())?;

        let redirects = Arc::new(RedirectHooks(Arc::clone(self)));
        env.add_virtual_path_resolver(REDIRECT_PREFIX, redirects.clone());
        env.add_url_resolver(redirects.clone());
        env.add_generator(redirects);

        let map = Arc::new(RedirectMapHooks(Arc::clone(self)));
        env.add_virtual_path_resolver(REDIRECT_MAP_PREFIX, map.clone());
        env.add_url_resolver(map.clone());
        env.add_generator(map);

        debug!("plugin"; "{} hooks registered", Self::NAME);
        Ok(())
    }

    pub fn ensure_alts_disabled(&self, config: &SiteConfig) -> Result<(), SetupError> {
        if config.has_alternatives() {
            return Err(SetupError::AlternativesUnsupported);
        }
        Ok(())
    }

    /// Redirect index of `pad`, built on first use and cached for the
    /// lifetime of the pad.
    pub fn get_index(&self, pad: &Arc<Pad>) -> Arc<RedirectIndex> {
        let field = Self::redirect_from_field(pad.env());
        self.cache
            .get_or_build(pad, |pad| RedirectIndex::build(pad, field))
    }

    /// Drop the cached index of a pad.
    pub fn evict(&self, pad: &Pad) -> bool {
        self.cache.evict(pad.id())
    }

    pub fn redirect_from_field(env: &Env) -> &str {
        &env.config().redirect.redirect_from_field
    }

    /// Name of the redirect page template; `None` disables redirect pages.
    pub fn redirect_template(env: &Env) -> Option<&str> {
        env.config().redirect.template.as_deref()
    }

    /// URL of the redirect map; `None` disables the map.
    pub fn redirect_map_url(env: &Env) -> Option<UrlPath> {
        env.config().redirect.map_url()
    }

    /// Redirect URLs `source` declares, with every conflicting one dropped
    /// and reported. Assets declare nothing.
    pub fn get_redirect_urls(&self, pad: &Arc<Pad>, source: Source<'_>) -> BTreeSet<UrlPath> {
        let Some(record) = source.as_record() else {
            return BTreeSet::new();
        };
        let mut urls = declared_redirects(pad, record, Self::redirect_from_field(pad.env()));
        if urls.is_empty() {
            return urls;
        }

        let index = self.get_index(pad);
        urls.retain(|url_path| !index.is_conflict(pad, url_path, record, true));
        urls
    }

    /// Every valid redirect of `pad` as `(from, to)`, sorted by source URL
    /// and joined onto the site base path.
    ///
    /// Uses a fresh index rather than the cached one. Conflicts are dropped
    /// and reported.
    pub fn iter_redirect_map(&self, pad: &Arc<Pad>) -> Vec<(String, String)> {
        let base_path = pad.env().config().base_path();
        let index = RedirectIndex::build(pad, Self::redirect_from_field(pad.env()));
        index
            .iter()
            .filter_map(|(url_path, id)| {
                let target = pad.record(id);
                if index.is_conflict(pad, url_path, target, true) {
                    return None;
                }
                Some((
                    url_path.with_base(&base_path),
                    target.url_path().with_base(&base_path),
                ))
            })
            .collect()
    }

    /// Redirect answering `segments` below `record`, if any.
    ///
    /// The joined segments normalize against `record`'s URL. Answers nothing
    /// when `options` disable redirects.
    pub fn resolve(
        &self,
        pad: &Arc<Pad>,
        record: &Record,
        segments: &[&str],
        options: ResolveOptions,
    ) -> Option<VirtualSource> {
        if !options.redirects || segments.is_empty() {
            return None;
        }
        let url_path = UrlPath::normalize(record.url_path(), &segments.join("/"));
        let target = self.get_index(pad).get(url_path.as_str())?;
        Some(VirtualSource::Redirect(Redirect::new(
            pad.record(target),
            url_path,
        )))
    }

    /// The redirect map, when `segments` below the root address it.
    pub fn resolve_map(
        &self,
        pad: &Arc<Pad>,
        record: &Record,
        segments: &[&str],
    ) -> Option<VirtualSource> {
        if !record.is_root() || segments.is_empty() {
            return None;
        }
        let map_url = Self::redirect_map_url(pad.env())?;
        let url_path = UrlPath::normalize(record.url_path(), &segments.join("/"));
        (url_path == map_url).then(|| VirtualSource::RedirectMap(RedirectMap::new(record, url_path)))
    }
}

// ============================================================================
// Hooks
// ============================================================================

/// Hooks for redirect pages.
struct RedirectHooks(Arc<RedirectPlugin>);

impl UrlResolver for RedirectHooks {
    fn resolve_url(
        &self,
        pad: &Arc<Pad>,
        record: &Record,
        segments: &[&str],
        options: ResolveOptions,
    ) -> Option<VirtualSource> {
        self.0.resolve(pad, record, segments, options)
    }
}

impl VirtualPathResolver for RedirectHooks {
    fn resolve_virtual_path(
        &self,
        _pad: &Arc<Pad>,
        record: &Record,
        pieces: &[&str],
    ) -> Option<VirtualSource> {
        let url_path = url_from_pieces(pieces)?;
        Some(VirtualSource::Redirect(Redirect::new(record, url_path)))
    }
}

impl Generator for RedirectHooks {
    fn generate(&self, pad: &Arc<Pad>, source: Source<'_>) -> Vec<VirtualSource> {
        let Some(record) = source.as_record() else {
            return Vec::new();
        };
        if RedirectPlugin::redirect_template(pad.env()).is_none() {
            return Vec::new();
        }
        self.0
            .get_redirect_urls(pad, source)
            .into_iter()
            .map(|url_path| VirtualSource::Redirect(Redirect::new(record, url_path)))
            .collect()
    }
}

/// Hooks for the redirect map.
struct RedirectMapHooks(Arc<RedirectPlugin>);

impl UrlResolver for RedirectMapHooks {
    fn resolve_url(
        &self,
        pad: &Arc<Pad>,
        record: &Record,
        segments: &[&str],
        _options: ResolveOptions,
    ) -> Option<VirtualSource> {
        self.0.resolve_map(pad, record, segments)
    }
}

impl VirtualPathResolver for RedirectMapHooks {
    fn resolve_virtual_path(
        &self,
        _pad: &Arc<Pad>,
        record: &Record,
        pieces: &[&str],
    ) -> Option<VirtualSource> {
        let url_path = url_from_pieces(pieces)?;
        Some(VirtualSource::RedirectMap(RedirectMap::new(record, url_path)))
    }
}

impl Generator for RedirectMapHooks {
    fn generate(&self, pad: &Arc<Pad>, source: Source<'_>) -> Vec<VirtualSource> {
        let Some(root) = source.as_record().filter(|record| record.is_root()) else {
            return Vec::new();
        };
        RedirectPlugin::redirect_map_url(pad.env())
            .map(|url_path| VirtualSource::RedirectMap(RedirectMap::new(root, url_path)))
            .into_iter()
            .collect()
    }
}
