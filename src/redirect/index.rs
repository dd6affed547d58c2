//! Redirect index: every declared redirect of a content tree.
//!
//! Construction never fails. Conflicts are checked lazily, per redirect,
//! through [`RedirectIndex::raise_on_conflict`] and
//! [`RedirectIndex::is_conflict`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{InvalidRedirect, RecordRef};
use crate::content::{Pad, Record, RecordId, walk_records};
use crate::core::UrlPath;
use crate::env::ResolveOptions;
use crate::{debug, utils::plural_count};

/// Redirect URLs `record` declares in `field`, normalized and deduplicated.
///
/// Relative URLs resolve against the record's parent (the root against
/// itself). Conflicts are not checked.
pub fn declared_redirects(pad: &Pad, record: &Record, field: &str) -> BTreeSet<UrlPath> {
    let Some(raw) = record.string_list(field) else {
        return BTreeSet::new();
    };
    let base = pad.parent_or_self(record).url_path();
    raw.into_iter()
        .map(|url| UrlPath::normalize(base, url))
        .collect()
}

#[derive(Debug, Default)]
pub struct RedirectIndex {
    /// Redirect URL -> declaring records, in walk order.
    redirects: BTreeMap<UrlPath, Vec<RecordId>>,
    /// Canonical URL -> record, for every record.
    records_by_url: FxHashMap<UrlPath, RecordId>,
}

impl RedirectIndex {
    /// Scan every record of `pad` for redirects declared in `field`.
    pub fn build(pad: &Pad, field: &str) -> Self {
        let mut redirects: BTreeMap<UrlPath, Vec<RecordId>> = BTreeMap::new();
        let mut records_by_url = FxHashMap::default();

        for id in walk_records(pad) {
            let record = pad.record(id);
            for url_path in declared_redirects(pad, record, field) {
                let candidates = redirects.entry(url_path).or_default();
                if !candidates.contains(&id) {
                    candidates.push(id);
                }
            }
            records_by_url
                .entry(record.url_path().clone())
                .or_insert(id);
        }

        // A record never redirects to itself.
        for (url_path, id) in &records_by_url {
            if let Some(candidates) = redirects.get_mut(url_path) {
                candidates.retain(|candidate| candidate != id);
            }
        }
        redirects.retain(|_, candidates| !candidates.is_empty());

        debug!("index"; "{} in {:?}", plural_count(redirects.len(), "redirect"), pad.id());
        Self {
            redirects,
            records_by_url,
        }
    }

    /// Target of `url_path`: the first declaring record in walk order.
    pub fn get(&self, url_path: &str) -> Option<RecordId> {
        self.redirects.get(url_path).map(|candidates| candidates[0])
    }

    /// Every record declaring `url_path`.
    pub fn candidates(&self, url_path: &str) -> &[RecordId] {
        self.redirects
            .get(url_path)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, url_path: &str) -> bool {
        self.redirects.contains_key(url_path)
    }

    pub fn len(&self) -> usize {
        self.redirects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.redirects.is_empty()
    }

    /// `(redirect url, target)` sorted by URL.
    pub fn iter(&self) -> impl Iterator<Item = (&UrlPath, RecordId)> {
        self.redirects
            .iter()
            .map(|(url_path, candidates)| (url_path, candidates[0]))
    }

    /// Record owning `url_path` as its canonical URL.
    pub fn record_by_url(&self, url_path: &str) -> Option<RecordId> {
        self.records_by_url.get(url_path).copied()
    }

    /// Check a single redirect from `url_path` to `target`.
    ///
    /// In order: a redirect to the target's own URL, a URL already taken by
    /// something else in the tree, a URL also claimed by another record.
    pub fn raise_on_conflict(
        &self,
        pad: &Arc<Pad>,
        url_path: &UrlPath,
        target: &Record,
    ) -> Result<(), InvalidRedirect> {
        if target.url_path() == url_path {
            return Err(InvalidRedirect::RedirectToSelf {
                url_path: url_path.clone(),
                target: target.into(),
            });
        }

        let existing = match self.record_by_url(url_path.as_str()) {
            Some(id) => Some(RecordRef::from(pad.record(id))),
            None => pad
                .resolve_url_path(url_path.as_str(), ResolveOptions::without_redirects())
                .as_ref()
                .map(RecordRef::from),
        };
        if let Some(existing) = existing {
            return Err(InvalidRedirect::ShadowsExistingRecord {
                url_path: url_path.clone(),
                target: target.into(),
                existing,
            });
        }

        if let Some(other) = self
            .candidates(url_path.as_str())
            .iter()
            .find(|id| **id != target.id())
        {
            return Err(InvalidRedirect::AmbiguousRedirect {
                url_path: url_path.clone(),
                target: target.into(),
                other: pad.record(*other).into(),
            });
        }

        Ok(())
    }

    /// Whether the redirect from `url_path` to `target` conflicts.
    ///
    /// With `warn`, conflicts are reported: redirects to self as
    /// `Ignoring redirect: ...` (only when the reporter is verbose), all
    /// others as `Invalid redirect: ...`.
    pub fn is_conflict(
        &self,
        pad: &Arc<Pad>,
        url_path: &UrlPath,
        target: &Record,
        warn: bool,
    ) -> bool {
        let Err(err) = self.raise_on_conflict(pad, url_path, target) else {
            return false;
        };
        if warn {
            let reporter = pad.env().reporter();
            if !err.is_redirect_to_self() {
                reporter.report_generic(&format!("Invalid redirect: {err}"));
            } else if reporter.verbosity() >= 1 {
                reporter.report_generic(&format!("Ignoring redirect: {err}"));
            }
        }
        true
    }
}
