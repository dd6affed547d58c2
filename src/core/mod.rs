//! Core types shared across the codebase.

mod url;

pub use url::UrlPath;
