//! `waymark build`: write redirect pages and the redirect map.

use anyhow::Result;

use super::common::Site;
use crate::build::{BuildSummary, Builder};
use crate::config::SiteConfig;
use crate::log;
use crate::utils::plural_count;

pub fn build_site(config: SiteConfig) -> Result<BuildSummary> {
    let site = Site::load(config)?;
    let builder = Builder::new(site.pad, site.plugin);
    let summary = builder.build_all()?;

    if summary.redirects == 0 && summary.maps == 0 {
        log!("build"; "nothing to write: set `redirect.template` or `redirect.map_file`");
    } else {
        log!(
            "build";
            "{}, {}",
            plural_count(summary.redirects, "redirect page"),
            plural_count(summary.maps, "redirect map")
        );
    }
    Ok(summary)
}
