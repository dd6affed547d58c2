//! URL path type for redirect sources and record URLs.
//!
//! - Internal representation: Always decoded (human-readable)
//! - Browser boundary: Decode on input, encode on output

use std::borrow::Borrow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Decoded, absolute URL path.
///
/// Invariants:
/// - Always decoded (no percent-encoding)
/// - Always starts with `/`
/// - Values built by [`UrlPath::normalize`] have no `.`/`..` segments and
///   no empty segments, and end with `/` unless the last segment has a `.`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UrlPath(Arc<str>);

impl UrlPath {
    /// The site root, `/`.
    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    /// Normalize `url_path` into an absolute URL path.
    ///
    /// Paths not starting with `/` are joined onto `base` first. `.` and `..`
    /// segments are resolved (`..` never climbs above the root) and repeated
    /// slashes collapse. When the final segment contains no `.`, a trailing
    /// slash is appended, so `/foo` becomes `/foo/` while `/foo.txt` stays.
    ///
    /// Normalization is total and idempotent.
    pub fn normalize(base: &UrlPath, url_path: &str) -> Self {
        let joined = if url_path.starts_with('/') {
            url_path.to_string()
        } else {
            format!("{}/{}", base.as_str(), url_path)
        };

        let mut segments: Vec<&str> = Vec::new();
        for segment in joined.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                _ => segments.push(segment),
            }
        }

        let Some(last) = segments.last() else {
            return Self::root();
        };

        let mut normalized = String::with_capacity(joined.len() + 1);
        for segment in &segments {
            normalized.push('/');
            normalized.push_str(segment);
        }
        if !last.contains('.') {
            normalized.push('/');
        }

        Self(Arc::from(normalized))
    }

    /// Create from browser URL (decode percent-encoding, strip query string).
    ///
    /// The decoded path is normalized against the site root.
    pub fn from_browser(encoded: &str) -> Self {
        use percent_encoding::percent_decode_str;
        let path = encoded.split(['?', '#']).next().unwrap_or(encoded);
        let decoded = percent_decode_str(path)
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| path.to_string());
        Self::normalize(&Self::root(), &decoded)
    }

    /// Wrap a canonical record URL as-is.
    ///
    /// Record URLs are computed by the content tree and are not re-normalized:
    /// a page with slug `v1.0` lives at `/v1.0/`.
    pub(crate) fn from_record(url: impl Into<Arc<str>>) -> Self {
        Self(url.into())
    }

    /// Get the decoded URL path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is a directory-style URL (ends with `/`).
    #[inline]
    pub fn is_page_url(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Join this path onto a `/`-terminated base path.
    ///
    /// `/about/` on base `/prefix/` -> `/prefix/about/`
    pub fn with_base(&self, base_path: &str) -> String {
        let mut joined = String::with_capacity(base_path.len() + self.0.len());
        joined.push_str(base_path);
        if !joined.ends_with('/') {
            joined.push('/');
        }
        joined.push_str(self.0.trim_start_matches('/'));
        joined
    }
}

impl std::fmt::Display for UrlPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for UrlPath {
    fn default() -> Self {
        Self::root()
    }
}

impl AsRef<str> for UrlPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UrlPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for UrlPath {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for UrlPath {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for UrlPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UrlPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::normalize(&Self::root(), &s))
    }
}
