use anyhow::{Result, anyhow};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::{path::Path, thread};
use stylestrip_core::{Compiler, discover_manifests, load_compilation, save_compilation};

use crate::{
    config::Config,
    plugin::FixStyleOnlyEntriesPlugin,
    types::{CheckResult, ManifestReport, Removal},
};

pub fn run_style_entry_check(cfg: &Config) -> Result<CheckResult> {
    info!("Starting style-only entry check");

    let options = cfg.plugin_options()?;
    let plugin = FixStyleOnlyEntriesPlugin::new(options)?;
    let mut compiler = Compiler::new();
    compiler.apply_plugin(&plugin);

    debug!("Discovering manifests under {}", cfg.input.display());
    let manifests = discover_manifests(&cfg.input)?;
    if manifests.is_empty() {
        warn!("No manifests found under {}", cfg.input.display());
        return Err(anyhow!("No manifests found under {}", cfg.input.display()));
    }
    info!("Found {} manifests", manifests.len());

    // Each manifest is its own compilation; a compilation is still processed sequentially
    let outcomes: Vec<_> = manifests
        .par_iter()
        .map(|manifest| {
            let thread_id = thread::current().id();
            debug!("Thread {:?} processing: {}", thread_id, manifest.display());
            let outcome = prune_manifest(&compiler, manifest, cfg.write);
            (manifest, outcome)
        })
        .collect();

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for (manifest, outcome) in outcomes {
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!("Error processing {}: {:#}", manifest.display(), e);
                failures.push((manifest.clone(), format!("{:#}", e)));
            }
        }
    }

    let result = CheckResult { reports, failures };
    info!(
        "Style-only entry check complete. Removed {} scripts across {} manifests",
        result.total_removals(),
        result.manifests_analyzed()
    );
    Ok(result)
}

/// Runs one manifest through the compiler and reports the script files the plugin deleted.
pub(crate) fn prune_manifest(
    compiler: &Compiler,
    manifest: &Path,
    write: bool,
) -> Result<ManifestReport> {
    let mut compilation = load_compilation(manifest)?;
    compiler.run(&mut compilation);

    let removals: Vec<Removal> = compilation
        .deleted_assets
        .iter()
        .map(|deleted| {
            trace!("Chunk '{}' lost {}", deleted.chunk, deleted.file);
            Removal { chunk: deleted.chunk.clone(), file: deleted.file.clone() }
        })
        .collect();
    debug!("{}: {} removals", manifest.display(), removals.len());

    if write && !removals.is_empty() {
        save_compilation(manifest, &compilation)?;
    }

    Ok(ManifestReport {
        manifest: manifest.to_path_buf(),
        removals,
        chunks_analyzed: compilation.chunks.len(),
    })
}
