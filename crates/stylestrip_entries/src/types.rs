use std::path::PathBuf;

/// A script asset dropped from a style-only entry chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub chunk: String,
    pub file: String,
}

#[derive(Debug, Clone)]
pub struct ManifestReport {
    pub manifest: PathBuf,
    pub removals: Vec<Removal>,
    pub chunks_analyzed: usize,
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub reports: Vec<ManifestReport>,
    /// Manifests that could not be read, with the reason
    pub failures: Vec<(PathBuf, String)>,
}

impl CheckResult {
    pub fn total_removals(&self) -> usize {
        self.reports.iter().map(|r| r.removals.len()).sum()
    }

    pub fn manifests_analyzed(&self) -> usize {
        self.reports.len()
    }
}
