//! Template types for typed variable injection.

use std::borrow::Cow;
use std::marker::PhantomData;
use std::path::Path;
use std::{fs, io};

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection.
///
/// Embedded templates are `const`; site templates are read from disk with
/// [`Template::load`] and share the same variables.
#[derive(Debug, Clone)]
pub struct Template<V> {
    content: Cow<'static, str>,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content: Cow::Borrowed(content),
            _marker: PhantomData,
        }
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        Ok(Self {
            content: Cow::Owned(fs::read_to_string(path)?),
            _marker: PhantomData,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether this is an embedded template.
    pub fn is_builtin(&self) -> bool {
        matches!(self.content, Cow::Borrowed(_))
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(&self.content)
    }
}
