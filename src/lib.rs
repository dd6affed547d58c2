//! Waymark - redirect pages and nginx redirect maps for record-based sites.
//!
//! Records declare the URLs they used to live at in a `redirect_from`
//! field. Waymark indexes those declarations, rejects the ones that
//! conflict with the content tree, and renders a redirect page for every
//! remaining URL plus an optional nginx `map` file.

pub mod build;
pub mod cli;
pub mod config;
pub mod content;
pub mod context;
pub mod core;
pub mod embed;
pub mod env;
pub mod logger;
pub mod redirect;
pub mod report;
pub mod utils;
