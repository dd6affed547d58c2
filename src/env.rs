//! Build environment: configuration, reporter, and plugin registries.
//!
//! Plugins extend the content tree through three hooks:
//!
//! | Registry               | Called for                                      |
//! |------------------------|-------------------------------------------------|
//! | URL resolvers          | URLs not answered by a record or asset          |
//! | Virtual path resolvers | `record_path@prefix/rest` paths                 |
//! | Generators             | every record and asset, yielding extra sources  |

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::config::SiteConfig;
use crate::content::{LoadError, Pad, Record, Source, load_pad};
use crate::redirect::VirtualSource;
use crate::report::Reporter;

/// Options threaded through a URL resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Whether redirect sources may answer the lookup.
    pub redirects: bool,
}

impl ResolveOptions {
    /// Resolve only records, assets and non-redirect virtual sources.
    pub const fn without_redirects() -> Self {
        Self { redirects: false }
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { redirects: true }
    }
}

/// Resolves the remaining URL segments below `record`.
pub trait UrlResolver: Send + Sync {
    fn resolve_url(
        &self,
        pad: &Arc<Pad>,
        record: &Record,
        segments: &[&str],
        options: ResolveOptions,
    ) -> Option<VirtualSource>;
}

/// Resolves the part after `@prefix` of a virtual path.
pub trait VirtualPathResolver: Send + Sync {
    fn resolve_virtual_path(
        &self,
        pad: &Arc<Pad>,
        record: &Record,
        pieces: &[&str],
    ) -> Option<VirtualSource>;
}

/// Produces virtual sources for a record or asset.
pub trait Generator: Send + Sync {
    fn generate(&self, pad: &Arc<Pad>, source: Source<'_>) -> Vec<VirtualSource>;
}

impl<F> UrlResolver for F
where
    F: Fn(&Arc<Pad>, &Record, &[&str], ResolveOptions) -> Option<VirtualSource> + Send + Sync,
{
    fn resolve_url(
        &self,
        pad: &Arc<Pad>,
        record: &Record,
        segments: &[&str],
        options: ResolveOptions,
    ) -> Option<VirtualSource> {
        self(pad, record, segments, options)
    }
}

impl<F> VirtualPathResolver for F
where
    F: Fn(&Arc<Pad>, &Record, &[&str]) -> Option<VirtualSource> + Send + Sync,
{
    fn resolve_virtual_path(
        &self,
        pad: &Arc<Pad>,
        record: &Record,
        pieces: &[&str],
    ) -> Option<VirtualSource> {
        self(pad, record, pieces)
    }
}

impl<F> Generator for F
where
    F: Fn(&Arc<Pad>, Source<'_>) -> Vec<VirtualSource> + Send + Sync,
{
    fn generate(&self, pad: &Arc<Pad>, source: Source<'_>) -> Vec<VirtualSource> {
        self(pad, source)
    }
}

/// Site environment shared by every pad built from it.
pub struct Env {
    config: SiteConfig,
    reporter: Arc<dyn Reporter>,
    url_resolvers: RwLock<Vec<Arc<dyn UrlResolver>>>,
    virtual_paths: RwLock<FxHashMap<String, Arc<dyn VirtualPathResolver>>>,
    generators: RwLock<Vec<Arc<dyn Generator>>>,
}

impl Env {
    pub fn new(config: SiteConfig, reporter: Arc<dyn Reporter>) -> Arc<Self> {
        Arc::new(Self {
            config,
            reporter,
            url_resolvers: RwLock::default(),
            virtual_paths: RwLock::default(),
            generators: RwLock::default(),
        })
    }

    #[inline]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[inline]
    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    /// Load a fresh snapshot of the content tree from disk.
    pub fn new_pad(self: &Arc<Self>) -> Result<Arc<Pad>, LoadError> {
        load_pad(Arc::clone(self))
    }

    pub fn add_url_resolver(&self, resolver: Arc<dyn UrlResolver>) {
        self.url_resolvers.write().push(resolver);
    }

    /// Register the resolver for `record_path@<prefix>/...` paths.
    ///
    /// A later registration for the same prefix replaces the earlier one.
    pub fn add_virtual_path_resolver(
        &self,
        prefix: impl Into<String>,
        resolver: Arc<dyn VirtualPathResolver>,
    ) {
        self.virtual_paths.write().insert(prefix.into(), resolver);
    }

    pub fn add_generator(&self, generator: Arc<dyn Generator>) {
        self.generators.write().push(generator);
    }

    // Registries are snapshotted so resolvers may reenter the pad.

    pub fn url_resolvers(&self) -> Vec<Arc<dyn UrlResolver>> {
        self.url_resolvers.read().clone()
    }

    pub fn virtual_path_resolver(&self, prefix: &str) -> Option<Arc<dyn VirtualPathResolver>> {
        self.virtual_paths.read().get(prefix).cloned()
    }

    pub fn has_virtual_path_prefix(&self, prefix: &str) -> bool {
        self.virtual_paths.read().contains_key(prefix)
    }

    pub fn generators(&self) -> Vec<Arc<dyn Generator>> {
        self.generators.read().clone()
    }
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("root", &self.config.root)
            .field("url_resolvers", &self.url_resolvers.read().len())
            .field(
                "virtual_paths",
                &self.virtual_paths.read().keys().collect::<Vec<_>>(),
            )
            .field("generators", &self.generators.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::BufferReporter;

    fn env() -> Arc<Env> {
        Env::new(SiteConfig::default(), Arc::new(BufferReporter::new()))
    }

    #[test]
    fn test_resolve_options() {
        assert!(ResolveOptions::default().redirects);
        assert!(!ResolveOptions::without_redirects().redirects);
    }

    #[test]
    fn test_registries() {
        let env = env();
        assert!(env.url_resolvers().is_empty());

        env.add_url_resolver(Arc::new(
            |_: &Arc<Pad>, _: &Record, _: &[&str], _: ResolveOptions| -> Option<VirtualSource> {
                None
            },
        ));
        env.add_virtual_path_resolver(
            "redirect",
            Arc::new(|_: &Arc<Pad>, _: &Record, _: &[&str]| -> Option<VirtualSource> { None }),
        );
        env.add_generator(Arc::new(
            |_: &Arc<Pad>, _: Source<'_>| -> Vec<VirtualSource> { Vec::new() },
        ));

        assert_eq!(env.url_resolvers().len(), 1);
        assert!(env.has_virtual_path_prefix("redirect"));
        assert!(env.virtual_path_resolver("redirect-map").is_none());
        assert_eq!(env.generators().len(), 1);
    }
}
