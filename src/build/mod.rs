//! Build orchestration for redirect output.
//!
//! Build phases:
//! - **Check** - Refuse sites with alternates
//! - **Warm** - Build the redirect index before any build context exists
//! - **Produce** - Walk the tree, run every generator, declare artifacts
//! - **Build** - Render each artifact inside its own build context
//!
//! Producing happens without a build context because the redirect index and
//! the map entries need a full walk of the tree.

mod artifact;

pub use artifact::{Artifact, BuildSummary};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use rustc_hash::FxHashSet;

use crate::content::{Pad, Source, walk_records};
use crate::context::{self, Context};
use crate::embed::Template;
use crate::embed::build::{RedirectVars, redirect_template};
use crate::redirect::{RedirectPlugin, VirtualSource};
use crate::utils::plural_count;
use crate::{debug, log};

pub struct Builder {
    pad: Arc<Pad>,
    plugin: Arc<RedirectPlugin>,
    output: PathBuf,
}

impl Builder {
    /// Builder writing into the configured output directory.
    pub fn new(pad: Arc<Pad>, plugin: Arc<RedirectPlugin>) -> Self {
        let output = pad.env().config().build.output.clone();
        Self {
            pad,
            plugin,
            output,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Build every redirect page and the redirect map.
    pub fn build_all(&self) -> Result<BuildSummary> {
        let config = self.pad.env().config();
        self.plugin.ensure_alts_disabled(config)?;
        let template = redirect_template(config)?;

        let index = self.plugin.get_index(&self.pad);
        debug!("build"; "{} indexed", plural_count(index.len(), "redirect"));

        let artifacts = self.produce_artifacts();
        fs::create_dir_all(&self.output)
            .with_context(|| format!("failed to create {}", self.output.display()))?;

        let mut summary = BuildSummary::default();
        for artifact in &artifacts {
            let Some(deps) = self.build_artifact(artifact, template.as_ref())? else {
                continue;
            };
            match artifact.source {
                VirtualSource::Redirect(_) => summary.redirects += 1,
                VirtualSource::RedirectMap(_) => summary.maps += 1,
            }
            if let Some(checksum) = &artifact.checksum {
                debug!("build"; "{} blake3:{}", artifact.name, checksum);
                summary.checksums.push((artifact.name.clone(), checksum.clone()));
            }
            summary.dependencies.push((artifact.name.clone(), deps));
        }

        log!(
            "build";
            "{} written to {}",
            plural_count(summary.total(), "file"),
            self.output.display()
        );
        Ok(summary)
    }

    /// Artifacts of every virtual source the generators produce, in walk
    /// order. Sources with the same virtual path are produced once.
    pub fn produce_artifacts(&self) -> Vec<Artifact> {
        let generators = self.pad.env().generators();
        let mut seen = FxHashSet::default();
        let mut artifacts = Vec::new();

        let records = walk_records(&self.pad)
            .into_iter()
            .map(|id| Source::Record(self.pad.record(id)));
        let sources: Vec<Source<'_>> = records
            .chain(self.pad.assets().map(Source::Asset))
            .collect();

        for source in sources {
            for generator in &generators {
                for virtual_source in generator.generate(&self.pad, source) {
                    if seen.insert(virtual_source.path()) {
                        artifacts.push(self.declare_artifact(virtual_source));
                    }
                }
            }
        }

        debug!("build"; "{} declared", plural_count(artifacts.len(), "artifact"));
        artifacts
    }

    fn declare_artifact(&self, source: VirtualSource) -> Artifact {
        let record = self.pad.record(source.record());
        // Map entries need a full walk, which is refused inside a build
        // context: collect them now.
        let checksum = source.as_redirect_map().map(|map| {
            map.entries(&self.plugin, &self.pad);
            map.checksum(&self.plugin, &self.pad)
        });
        Artifact {
            name: source.artifact_name(),
            sources: record.source_files().map(Path::to_path_buf).collect(),
            source,
            checksum,
        }
    }

    /// Render one artifact. Returns the recorded dependencies, or `None`
    /// when there was nothing to write.
    fn build_artifact(
        &self,
        artifact: &Artifact,
        template: Option<&Template<RedirectVars>>,
    ) -> Result<Option<Vec<PathBuf>>> {
        let config = self.pad.env().config();
        let ctx = Context::new();
        let content = {
            let _guard = context::enter(&ctx);
            ctx.record_dependency(&config.config_path);
            context::record_dependencies(&artifact.sources);

            match &artifact.source {
                VirtualSource::Redirect(redirect) => {
                    let Some(template) = template else {
                        return Ok(None);
                    };
                    if let Some(name) = RedirectPlugin::redirect_template(self.pad.env())
                        && !template.is_builtin()
                    {
                        ctx.record_dependency(&config.template_path(name));
                    }
                    let target = self.pad.record(redirect.target());
                    log!("redirect"; "{} -> {}", redirect.url_path(), target.url_path());
                    redirect.render(&self.pad, template)
                }
                VirtualSource::RedirectMap(map) => map.render(&self.plugin, &self.pad),
            }
        };

        let path = artifact.output_path(&self.output);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;

        Ok(Some(ctx.dependencies()))
    }
}
