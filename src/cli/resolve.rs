//! `waymark resolve`: show what an incoming URL resolves to.

use anyhow::{Result, bail};

use super::common::Site;
use crate::config::SiteConfig;
use crate::content::{Pad, Resolved};
use crate::core::UrlPath;
use crate::env::ResolveOptions;
use crate::log;
use crate::redirect::VirtualSource;

pub fn resolve_url(config: SiteConfig, url: &str) -> Result<()> {
    let site = Site::load(config)?;
    let base_path = site.config().base_path();
    let url_path = strip_base_path(&UrlPath::from_browser(url), &base_path);

    let Some(resolved) = site
        .pad
        .resolve_url_path(url_path.as_str(), ResolveOptions::default())
    else {
        bail!("nothing at {}", url_path);
    };
    log!("resolve"; "{} => {}", url_path, describe(&site.pad, &resolved, &base_path));
    Ok(())
}

/// Remove the site base path from an incoming URL.
///
/// `/prefix/about/` on base `/prefix/` -> `/about/`. URLs outside the base
/// path are kept as they are.
fn strip_base_path(url_path: &UrlPath, base_path: &str) -> UrlPath {
    let prefix = base_path.trim_end_matches('/');
    match url_path.as_str().strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
            UrlPath::normalize(&UrlPath::root(), rest)
        }
        _ => url_path.clone(),
    }
}

fn describe(pad: &Pad, resolved: &Resolved<'_>, base_path: &str) -> String {
    match resolved {
        Resolved::Record(record) => record.to_string(),
        Resolved::Asset(asset) => format!("{} ({})", asset, asset.source().display()),
        Resolved::Virtual(VirtualSource::Redirect(redirect)) => {
            let target = pad.record(redirect.target());
            format!(
                "redirect to {} {}",
                target.url_path().with_base(base_path),
                target
            )
        }
        Resolved::Virtual(source @ VirtualSource::RedirectMap(_)) => source.to_string(),
    }
}
