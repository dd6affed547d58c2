//! `[site]` section configuration.
//!
//! ```toml
//! [site]
//! url = "https://example.org/prefix/"   # optional; its path is the base path
//! ```

use crate::config::{ConfigDiagnostics, FieldPath, util::url_base_path};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfoConfig {
    /// Public site URL. Its path component prefixes every generated URL.
    pub url: Option<String>,
}

pub struct SiteInfoConfigFields {
    pub url: FieldPath,
}

impl SiteInfoConfig {
    pub const FIELDS: SiteInfoConfigFields = SiteInfoConfigFields {
        url: FieldPath::new("site.url"),
    };

    /// URL path the site is served under, always `/`-delimited.
    ///
    /// `https://example.org/prefix` -> `/prefix/`, no url -> `/`
    pub fn base_path(&self) -> String {
        self.url
            .as_deref()
            .and_then(url_base_path)
            .unwrap_or_else(|| "/".to_string())
    }

    /// Validate site configuration.
    ///
    /// `url`, when set, must be an http(s) URL with a host.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(url_str) = &self.url else {
            return;
        };

        match url::Url::parse(url_str) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        Self::FIELDS.url,
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com",
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error_with_hint(
                        Self::FIELDS.url,
                        "URL must have a valid host",
                        "use format like https://example.com",
                    );
                }
            }
            Err(e) => {
                diag.error_with_hint(
                    Self::FIELDS.url,
                    format!("invalid URL: {}", e),
                    "use format like https://example.com",
                );
            }
        }
    }
}
