//! `[redirect]` section configuration.
//!
//! ```toml
//! [redirect]
//! redirect_from_field = "redirect_from"   # Field holding redirect sources
//! template = "redirect.html"              # Redirect page template (unset: no pages)
//! map_file = ".redirect.map"              # nginx map output (unset: no map)
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::UrlPath;
use serde::{Deserialize, Serialize};

/// Name of the built-in redirect page template.
pub const DEFAULT_TEMPLATE: &str = "redirect.html";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Record field listing the URLs that redirect to the record.
    pub redirect_from_field: String,

    /// Template used to render redirect pages.
    pub template: Option<String>,

    /// Output path of the nginx redirect map, relative to the output root.
    pub map_file: Option<String>,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            redirect_from_field: "redirect_from".into(),
            template: None,
            map_file: None,
        }
    }
}

pub struct RedirectConfigFields {
    pub redirect_from_field: FieldPath,
    pub template: FieldPath,
    pub map_file: FieldPath,
}

impl RedirectConfig {
    pub const FIELDS: RedirectConfigFields = RedirectConfigFields {
        redirect_from_field: FieldPath::new("redirect.redirect_from_field"),
        template: FieldPath::new("redirect.template"),
        map_file: FieldPath::new("redirect.map_file"),
    };

    /// URL of the redirect map, if one is configured.
    ///
    /// Empty and `.` segments are dropped. No trailing slash is added.
    ///
    /// `.redirect.map` -> `/.redirect.map`, `./nginx//map.txt` -> `/nginx/map.txt`
    pub fn map_url(&self) -> Option<UrlPath> {
        let segments = map_file_segments(self.map_file.as_deref()?);
        if segments.is_empty() {
            return None;
        }
        Some(UrlPath::from_record(format!("/{}", segments.join("/"))))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.redirect_from_field.trim().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.redirect_from_field,
                "must not be empty",
                "remove the key to use the default `redirect_from`",
            );
        }
        if self.template.as_deref().is_some_and(|t| t.trim().is_empty()) {
            diag.error_with_hint(
                Self::FIELDS.template,
                "must not be empty",
                "remove the key to disable redirect pages",
            );
        }
        if let Some(map_file) = &self.map_file {
            let segments = map_file_segments(map_file);
            if segments.is_empty() || map_file.ends_with('/') {
                diag.error_with_hint(
                    Self::FIELDS.map_file,
                    format!("`{map_file}` is not a file name"),
                    "use a file name like \".redirect.map\"",
                );
            } else if segments.contains(&"..") {
                diag.error(
                    Self::FIELDS.map_file,
                    "must stay inside the output directory",
                );
            }
        }
    }
}

fn map_file_segments(map_file: &str) -> Vec<&str> {
    map_file
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}
