//! Artifacts: output files declared by virtual sources.

use std::path::{Path, PathBuf};

use crate::redirect::VirtualSource;

/// One output file and the virtual source that renders it.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Output path relative to the output directory, with a leading `/`.
    pub name: String,
    pub source: VirtualSource,
    /// Source files of the record the artifact is derived from.
    pub sources: Vec<PathBuf>,
    /// Content digest, for artifacts that provide one.
    pub checksum: Option<String>,
}

impl Artifact {
    /// `/details/index.html` under `public/` -> `public/details/index.html`
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.name.trim_start_matches('/'))
    }
}

/// What [`Builder::build_all`](super::Builder::build_all) wrote.
#[derive(Debug, Default, Clone)]
pub struct BuildSummary {
    pub redirects: usize,
    pub maps: usize,
    /// Dependencies recorded per artifact name, sorted.
    pub dependencies: Vec<(String, Vec<PathBuf>)>,
    /// Content digest per artifact name, for artifacts that provide one.
    pub checksums: Vec<(String, String)>,
}

impl BuildSummary {
    pub fn total(&self) -> usize {
        self.redirects + self.maps
    }

    pub fn dependencies_of(&self, name: &str) -> Option<&[PathBuf]> {
        self.dependencies
            .iter()
            .find(|(artifact, _)| artifact == name)
            .map(|(_, deps)| deps.as_slice())
    }

    pub fn checksum_of(&self, name: &str) -> Option<&str> {
        self.checksums
            .iter()
            .find(|(artifact, _)| artifact == name)
            .map(|(_, checksum)| checksum.as_str())
    }
}
