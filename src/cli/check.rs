//! `waymark check`: report every redirect conflict.

use std::sync::Arc;

use anyhow::{Result, bail};

use super::common::Site;
use crate::config::SiteConfig;
use crate::content::{Pad, walk_records};
use crate::redirect::{InvalidRedirect, RedirectIndex, RedirectPlugin, declared_redirects};
use crate::utils::plural_count;
use crate::{debug, log};

/// Outcome of checking every declared redirect.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub valid: usize,
    /// Redirects a record declares to its own URL.
    pub ignored: Vec<InvalidRedirect>,
    pub invalid: Vec<InvalidRedirect>,
}

pub fn check_site(config: SiteConfig) -> Result<()> {
    let site = Site::load(config)?;
    let report = check_redirects(&site.pad);

    for err in &report.ignored {
        debug!("check"; "ignoring redirect: {}", err);
    }
    for err in &report.invalid {
        log!("check"; "invalid redirect: {}", err);
    }
    log!(
        "check";
        "{} ok, {} ignored, {} invalid",
        plural_count(report.valid, "redirect"),
        report.ignored.len(),
        report.invalid.len()
    );

    if !report.invalid.is_empty() {
        bail!("{} found", plural_count(report.invalid.len(), "invalid redirect"));
    }
    Ok(())
}

/// Check every redirect every record declares, in walk order.
pub fn check_redirects(pad: &Arc<Pad>) -> CheckReport {
    let field = RedirectPlugin::redirect_from_field(pad.env());
    let index = RedirectIndex::build(pad, field);
    let mut report = CheckReport::default();

    for id in walk_records(pad) {
        let record = pad.record(id);
        for url_path in declared_redirects(pad, record, field) {
            match index.raise_on_conflict(pad, &url_path, record) {
                Ok(()) => report.valid += 1,
                Err(err) if err.is_redirect_to_self() => report.ignored.push(err),
                Err(err) => report.invalid.push(err),
            }
        }
    }
    report
}
