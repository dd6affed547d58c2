//! Load a pad from the content and assets directories.
//!
//! ```text
//! content/
//! ├── contents.toml            # root page
//! ├── about/
//! │   ├── contents.toml        # page /about
//! │   └── more-detail/
//! │       └── contents.toml    # page /about/more-detail
//! └── images/
//!     ├── contents.toml        # page /images
//!     ├── apple-pie.jpg        # attachment /images/apple-pie.jpg
//!     └── apple-pie.jpg.toml   # its fields (optional)
//! assets/
//! └── static/style.css         # asset /static/style.css
//! ```
//!
//! Directories without a `contents.toml` are skipped along with everything
//! below them. Dotfiles are ignored.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jwalk::WalkDir;
use thiserror::Error;

use super::{Pad, PadBuilder};
use crate::debug;
use crate::env::Env;

/// Name of the file holding a page's fields.
pub const CONTENTS_FILE: &str = "contents.toml";

/// Suffix of an attachment's field file (`photo.jpg` -> `photo.jpg.toml`).
const SIDECAR_SUFFIX: &str = ".toml";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse `{0}`")]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("invalid record path `{0}`")]
    InvalidPath(String),

    #[error("record `{0}` added twice")]
    Duplicate(String),

    #[error("parent of `{0}` not loaded")]
    MissingParent(String),

    #[error("`{0}` is an attachment and cannot hold records")]
    NotAPage(String),

    #[error("content tree has too many records")]
    TooLarge,
}

/// Load the content tree configured for `env`.
pub fn load_pad(env: Arc<Env>) -> Result<Arc<Pad>, LoadError> {
    let content_dir = env.config().build.content.clone();
    let assets_dir = env.config().build.assets.clone();

    let mut builder = PadBuilder::new(env);
    load_page(&mut builder, &content_dir, "/")?;

    if assets_dir.is_dir() {
        for (url_path, source) in collect_assets(&assets_dir) {
            builder.asset(&url_path, source);
        }
    }

    let pad = builder.build();
    debug!("content"; "loaded {:?}", pad);
    Ok(pad)
}

fn load_page(builder: &mut PadBuilder, dir: &Path, tree_path: &str) -> Result<(), LoadError> {
    let contents = dir.join(CONTENTS_FILE);
    let (fields, sources) = if contents.is_file() {
        (read_fields(&contents)?, vec![contents])
    } else {
        // Only the root may lack a contents file.
        (toml::Table::new(), Vec::new())
    };
    builder.page(tree_path, fields, sources)?;

    for entry in sorted_entries(dir)? {
        let Some(name) = entry.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
            continue;
        };
        if name.starts_with('.') || name == CONTENTS_FILE {
            continue;
        }
        let child_path = join_tree_path(tree_path, &name);

        if entry.is_dir() {
            if entry.join(CONTENTS_FILE).is_file() {
                load_page(builder, &entry, &child_path)?;
            } else {
                debug!("content"; "skipping {} (no {})", entry.display(), CONTENTS_FILE);
            }
        } else if !is_sidecar(&entry) {
            let sidecar = sidecar_path(&entry);
            let mut sources = vec![entry.clone()];
            let fields = if sidecar.is_file() {
                let fields = read_fields(&sidecar)?;
                sources.push(sidecar);
                fields
            } else {
                toml::Table::new()
            };
            builder.attachment(&child_path, fields, sources)?;
        }
    }
    Ok(())
}

fn read_fields(path: &Path) -> Result<toml::Table, LoadError> {
    let text = fs::read_to_string(path).map_err(|e| LoadError::Io(path.to_path_buf(), e))?;
    toml::from_str(&text).map_err(|e| LoadError::Toml(path.to_path_buf(), e))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let read = fs::read_dir(dir).map_err(|e| LoadError::Io(dir.to_path_buf(), e))?;
    let mut entries = read
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| LoadError::Io(dir.to_path_buf(), e))?;
    entries.sort();
    Ok(entries)
}

fn join_tree_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

fn sidecar_path(file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_owned();
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// `photo.jpg.toml` is a sidecar when `photo.jpg` exists next to it.
fn is_sidecar(file: &Path) -> bool {
    file.to_str()
        .and_then(|s| s.strip_suffix(SIDECAR_SUFFIX))
        .is_some_and(|stem| Path::new(stem).is_file())
}

/// All files below `dir` as `(url_path, source)`, sorted by URL.
fn collect_assets(dir: &Path) -> Vec<(String, PathBuf)> {
    let mut assets: Vec<(String, PathBuf)> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| {
            let path = e.path();
            let relative = path.strip_prefix(dir).ok()?;
            let url = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            Some((format!("/{url}"), path))
        })
        .collect();
    assets.sort();
    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::report::BufferReporter;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn env_for(root: &Path) -> Arc<Env> {
        let mut config = SiteConfig::default();
        config.build.normalize(root);
        Env::new(config, Arc::new(BufferReporter::new()))
    }

    #[test]
    fn test_load_tree() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "content/contents.toml", "title = \"Home\"\n");
        write(root, "content/about/contents.toml", "title = \"About\"\n");
        write(
            root,
            "content/images/contents.toml",
            "title = \"Images\"\n",
        );
        write(root, "content/images/apple-pie.jpg", "jpeg");
        write(
            root,
            "content/images/apple-pie.jpg.toml",
            "redirect_from = [\"apple-cake.jpg\"]\n",
        );
        write(root, "content/drafts/notes.txt", "no contents.toml here");
        write(root, "content/.DS_Store", "");
        write(root, "assets/static/style.css", "body {}");

        let pad = load_pad(env_for(root)).unwrap();

        let paths: Vec<&str> = pad.records().map(|r| r.path()).collect();
        assert_eq!(
            paths,
            ["/", "/about", "/images", "/images/apple-pie.jpg"]
        );

        let pie = pad.get_record("/images/apple-pie.jpg").unwrap();
        assert_eq!(
            pie.string_list("redirect_from").unwrap(),
            ["apple-cake.jpg"]
        );
        assert_eq!(pie.source_files().count(), 2);

        assert!(pad.get_asset("/static/style.css").is_some());
    }

    #[test]
    fn test_root_without_contents() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("content")).unwrap();
        let pad = load_pad(env_for(dir.path())).unwrap();
        assert_eq!(pad.records().count(), 1);
        assert_eq!(pad.root().source_files().count(), 0);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/contents.toml", "title = ");
        let err = load_pad(env_for(dir.path())).unwrap_err();
        assert!(matches!(err, LoadError::Toml(..)));
    }

    #[test]
    fn test_missing_content_dir() {
        let dir = TempDir::new().unwrap();
        let err = load_pad(env_for(dir.path())).unwrap_err();
        assert!(matches!(err, LoadError::Io(..)));
    }

    #[test]
    fn test_sorted_entries_reports_unreadable_dirs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.txt", "");
        write(dir.path(), "a/contents.toml", "");
        let entries = sorted_entries(dir.path()).unwrap();
        assert_eq!(entries, [dir.path().join("a"), dir.path().join("b.txt")]);

        let missing = dir.path().join("missing");
        match sorted_entries(&missing) {
            Err(LoadError::Io(path, _)) => assert_eq!(path, missing),
            other => panic!("expected an IO error, got {other:?}"),
        }
    }
}
