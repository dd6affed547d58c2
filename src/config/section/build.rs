//! `[build]` section configuration.
//!
//! ```toml
//! [build]
//! content = "content"         # Content tree (relative to site root)
//! assets = "assets"           # Static assets (relative to site root)
//! templates = "templates"     # Redirect page templates (relative to site root)
//! output = "public"           # Build output directory (relative to site root)
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Content source directory.
    pub content: PathBuf,

    /// Static assets directory.
    pub assets: PathBuf,

    /// Template directory.
    pub templates: PathBuf,

    /// Build output directory.
    pub output: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: "content".into(),
            assets: "assets".into(),
            templates: "templates".into(),
            output: "public".into(),
        }
    }
}

pub struct BuildConfigFields {
    pub content: FieldPath,
    pub assets: FieldPath,
    pub templates: FieldPath,
    pub output: FieldPath,
}

impl BuildConfig {
    pub const FIELDS: BuildConfigFields = BuildConfigFields {
        content: FieldPath::new("build.content"),
        assets: FieldPath::new("build.assets"),
        templates: FieldPath::new("build.templates"),
        output: FieldPath::new("build.output"),
    };

    /// Resolve every directory against `root`.
    pub fn normalize(&mut self, root: &Path) {
        for dir in [
            &mut self.content,
            &mut self.assets,
            &mut self.templates,
            &mut self.output,
        ] {
            *dir = crate::utils::path::normalize_path(&root.join(&*dir));
        }
    }

    /// Validate build directories (after [`normalize`](Self::normalize)).
    ///
    /// The content directory must exist; missing assets and templates
    /// directories are only worth a warning.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.content.is_dir() {
            diag.error_with_hint(
                Self::FIELDS.content,
                format!("directory `{}` not found", self.content.display()),
                "create it or point the key at your content tree",
            );
        }
        if self.assets.exists() && !self.assets.is_dir() {
            diag.error(Self::FIELDS.assets, "must be a directory");
        }
        if !self.templates.exists() {
            diag.warn(
                Self::FIELDS.templates,
                format!("directory `{}` not found", self.templates.display()),
            );
        }
        if self.output == self.content {
            diag.error(
                Self::FIELDS.output,
                format!("must differ from {}", Self::FIELDS.content),
            );
        }
    }
}
