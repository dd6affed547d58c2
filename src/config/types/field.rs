//! Type-safe config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a `waymark.toml` key, as shown in diagnostics.
///
/// Sections list their keys in a `FIELDS` constant:
///
/// | Constant                                   | Key                             |
/// |--------------------------------------------|---------------------------------|
/// | `SiteInfoConfig::FIELDS.url`               | `site.url`                      |
/// | `BuildConfig::FIELDS.templates`            | `build.templates`               |
/// | `RedirectConfig::FIELDS.redirect_from_field` | `redirect.redirect_from_field` |
///
/// ```ignore
/// // map_file = "../escape.map"
/// diag.error(RedirectConfig::FIELDS.map_file, "must stay inside the output directory");
/// // [redirect.map_file]
/// // → must stay inside the output directory
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}
