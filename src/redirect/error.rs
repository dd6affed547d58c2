//! Redirect error types.

use std::fmt;

use thiserror::Error;

use super::VirtualSource;
use crate::content::{Asset, Record, Resolved};
use crate::core::UrlPath;

/// Owned description of a record or virtual source, used in messages.
///
/// Displays as `<Page path='/about'>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    kind: &'static str,
    path: String,
}

impl RecordRef {
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl From<&Record> for RecordRef {
    fn from(record: &Record) -> Self {
        Self {
            kind: record.kind().name(),
            path: record.path().to_string(),
        }
    }
}

impl From<&Asset> for RecordRef {
    fn from(asset: &Asset) -> Self {
        Self {
            kind: "Asset",
            path: asset.url_path().to_string(),
        }
    }
}

impl From<&VirtualSource> for RecordRef {
    fn from(source: &VirtualSource) -> Self {
        Self {
            kind: source.kind(),
            path: source.path(),
        }
    }
}

impl From<&Resolved<'_>> for RecordRef {
    fn from(resolved: &Resolved<'_>) -> Self {
        match resolved {
            Resolved::Record(record) => Self::from(*record),
            Resolved::Asset(asset) => Self::from(*asset),
            Resolved::Virtual(source) => Self::from(source),
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} path='{}'>", self.kind, self.path)
    }
}

/// A redirect that must not be generated.
///
/// None of these are fatal: the redirect is dropped and a diagnostic
/// reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRedirect {
    /// The record declares its own URL.
    #[error("'{url_path}' => {target}: redirect to self")]
    RedirectToSelf { url_path: UrlPath, target: RecordRef },

    /// The URL already belongs to a record, asset or other virtual source.
    #[error("'{url_path}' => {target}: redirect url conflicts with existing record {existing}")]
    ShadowsExistingRecord {
        url_path: UrlPath,
        target: RecordRef,
        existing: RecordRef,
    },

    /// Another record declares the same redirect URL.
    #[error("'{url_path}' => {target}: conflicts with redirect '{url_path}' => {other}")]
    AmbiguousRedirect {
        url_path: UrlPath,
        target: RecordRef,
        other: RecordRef,
    },
}

impl InvalidRedirect {
    pub fn url_path(&self) -> &UrlPath {
        match self {
            Self::RedirectToSelf { url_path, .. }
            | Self::ShadowsExistingRecord { url_path, .. }
            | Self::AmbiguousRedirect { url_path, .. } => url_path,
        }
    }

    pub fn target(&self) -> &RecordRef {
        match self {
            Self::RedirectToSelf { target, .. }
            | Self::ShadowsExistingRecord { target, .. }
            | Self::AmbiguousRedirect { target, .. } => target,
        }
    }

    /// Self redirects are harmless and only worth a low-priority notice.
    pub fn is_redirect_to_self(&self) -> bool {
        matches!(self, Self::RedirectToSelf { .. })
    }
}

/// Conditions under which the redirect plugin refuses to run.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("The redirect plugin currently does not support alts")]
    AlternativesUnsupported,
}
