//! Shared setup for every command.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::SiteConfig;
use crate::content::Pad;
use crate::env::Env;
use crate::redirect::RedirectPlugin;
use crate::report::{CliReporter, Reporter};

/// A loaded site: environment with the redirect hooks, and a pad.
pub struct Site {
    pub env: Arc<Env>,
    pub plugin: Arc<RedirectPlugin>,
    pub pad: Arc<Pad>,
}

impl Site {
    /// Set up the environment and load the content tree.
    pub fn load(config: SiteConfig) -> Result<Self> {
        Self::load_with(config, Arc::new(CliReporter))
    }

    pub fn load_with(config: SiteConfig, reporter: Arc<dyn Reporter>) -> Result<Self> {
        let env = Env::new(config, reporter);
        let plugin = RedirectPlugin::new();
        plugin.setup_env(&env)?;
        let pad = env.new_pad().context("failed to load content")?;
        Ok(Self { env, plugin, pad })
    }

    pub fn config(&self) -> &SiteConfig {
        self.env.config()
    }
}
