//! In-memory demo site shared by unit tests.

use std::path::PathBuf;
use std::sync::Arc;

use super::{Pad, PadBuilder};
use crate::env::Env;

#[derive(Clone, Copy)]
enum Kind {
    Page,
    Attachment,
}

/// `(tree path, kind, fields)` in load order.
const DEMO: &[(&str, Kind, &str)] = &[
    ("/", Kind::Page, "title = \"Welcome\""),
    ("/about", Kind::Page, "title = \"About\""),
    ("/images", Kind::Page, "title = \"Images\""),
    (
        "/projects",
        Kind::Page,
        "title = \"Projects\"\n_hidden = true\nredirect_from = [\"about/projects.html\"]",
    ),
    (
        "/about/more-detail",
        Kind::Page,
        "title = \"More Detail\"\nredirect_from = \"\"\"\ninfo\n/details\n\"\"\"",
    ),
    (
        "/images/apple-pie.jpg",
        Kind::Attachment,
        "redirect_from = [\"apple-cake.jpg\"]",
    ),
];

pub fn fields(toml: &str) -> toml::Table {
    toml::from_str(toml).unwrap()
}

/// Source files a record of the demo site would be loaded from.
pub fn demo_sources(path: &str) -> Vec<PathBuf> {
    match DEMO.iter().find(|(p, ..)| *p == path) {
        Some((_, Kind::Attachment, _)) => {
            let file = PathBuf::from(format!("content{path}"));
            vec![file.clone(), PathBuf::from(format!("content{path}.toml"))]
        }
        _ => {
            let dir = path.trim_start_matches('/');
            vec![PathBuf::from("content").join(dir).join("contents.toml")]
        }
    }
}

/// The demo site.
pub fn demo_pad(env: Arc<Env>) -> Arc<Pad> {
    demo_pad_with(env, &[])
}

/// The demo site with the fields of some records replaced.
pub fn demo_pad_with(env: Arc<Env>, overrides: &[(&str, &str)]) -> Arc<Pad> {
    let mut builder = PadBuilder::new(env);
    for (path, kind, default_fields) in DEMO {
        let toml = overrides
            .iter()
            .find(|(p, _)| p == path)
            .map_or(*default_fields, |(_, f)| *f);
        let sources = demo_sources(path);
        match kind {
            Kind::Page => builder.page(path, fields(toml), sources).unwrap(),
            Kind::Attachment => builder.attachment(path, fields(toml), sources).unwrap(),
        };
    }
    builder.asset("/static/style.css", PathBuf::from("assets/static/style.css"));
    builder.build()
}
