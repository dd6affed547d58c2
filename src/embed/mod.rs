//! Embedded static resources for waymark.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `build` - Build-time templates (redirect.html)
//!
//! # Usage
//!
//! ```ignore
//! use embed::build::{REDIRECT_HTML, RedirectVars};
//!
//! let html = REDIRECT_HTML.render(&RedirectVars {
//!     target_url: "/prefix/about/".into(),
//!     redirect_url: "/old/".into(),
//!     target_path: "/about".into(),
//! });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod build {
    use std::path::PathBuf;

    use super::{Template, TemplateVars};
    use crate::config::{DEFAULT_TEMPLATE, SiteConfig};
    use crate::utils::html::{escape, escape_attr};

    /// Variables for redirect page templates.
    ///
    /// | Placeholder        | Value                                   |
    /// |--------------------|-----------------------------------------|
    /// | `__TARGET_URL__`   | Target URL joined onto the base path    |
    /// | `__REDIRECT_URL__` | URL being redirected from               |
    /// | `__TARGET_PATH__`  | Tree path of the target record          |
    #[derive(Debug, Clone)]
    pub struct RedirectVars {
        pub target_url: String,
        pub redirect_url: String,
        pub target_path: String,
    }

    impl TemplateVars for RedirectVars {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__TARGET_URL__", &escape_attr(&self.target_url))
                .replace("__REDIRECT_URL__", &escape(&self.redirect_url))
                .replace("__TARGET_PATH__", &escape(&self.target_path))
        }
    }

    /// Built-in redirect page.
    pub const REDIRECT_HTML: Template<RedirectVars> = Template::new(include_str!("redirect.html"));

    /// Errors locating the configured redirect template.
    #[derive(Debug, thiserror::Error)]
    pub enum TemplateError {
        #[error("redirect template `{0}` not found")]
        NotFound(PathBuf),

        #[error("failed to read redirect template `{0}`")]
        Io(PathBuf, #[source] std::io::Error),
    }

    /// Template for redirect pages, or `None` when pages are disabled.
    ///
    /// A file in the templates directory wins. The built-in page stands in
    /// for [`DEFAULT_TEMPLATE`] when no such file exists.
    pub fn redirect_template(
        config: &SiteConfig,
    ) -> Result<Option<Template<RedirectVars>>, TemplateError> {
        let Some(name) = config.redirect.template.as_deref() else {
            return Ok(None);
        };
        let path = config.template_path(name);
        if path.is_file() {
            return Template::load(&path)
                .map(Some)
                .map_err(|err| TemplateError::Io(path, err));
        }
        if name == DEFAULT_TEMPLATE {
            return Ok(Some(REDIRECT_HTML));
        }
        Err(TemplateError::NotFound(path))
    }
}
