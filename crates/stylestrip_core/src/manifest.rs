use anyhow::{Context, Result, anyhow};
use ignore::WalkBuilder;
use log::{debug, trace};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use crate::graph::Compilation;

/// Reads a compilation manifest (modules, chunks and assets) from a JSON file.
pub fn load_compilation(path: &Path) -> Result<Compilation> {
    debug!("Loading compilation manifest: {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let compilation: Compilation = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse manifest {}", path.display()))?;
    trace!(
        "Loaded {} modules, {} chunks, {} assets from {}",
        compilation.modules.len(),
        compilation.chunks.len(),
        compilation.assets.len(),
        path.display()
    );
    Ok(compilation)
}

/// Writes a compilation manifest as pretty JSON.
///
/// The JSON goes to a temporary file next to `path`, which then replaces `path`.
/// A failed write leaves any existing manifest untouched.
pub fn save_compilation(path: &Path, compilation: &Compilation) -> Result<()> {
    debug!("Writing compilation manifest: {}", path.display());
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    let mut writer = BufWriter::new(tmp);
    serde_json::to_writer_pretty(&mut writer, compilation)
        .with_context(|| format!("Failed to serialize manifest {}", path.display()))?;
    writeln!(writer)?;
    let tmp = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .with_context(|| format!("Failed to write manifest {}", path.display()))?;

    trace!("Replacing {} with {}", path.display(), tmp.path().display());
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace manifest {}", path.display()))?;
    Ok(())
}

/// Finds manifest files under `input`.
///
/// A file is returned as-is. A directory is walked (respecting `.gitignore`) and
/// every `*.json` file found is returned, sorted.
pub fn discover_manifests(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        trace!("Input is a single manifest: {}", input.display());
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(anyhow!("Manifest input does not exist: {}", input.display()));
    }

    debug!("Walking directory tree for manifests: {}", input.display());
    let walker = WalkBuilder::new(input).hidden(false).ignore(true).git_ignore(true).build();

    let mut manifests = Vec::new();
    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !p.is_file() {
            continue;
        }
        if p.extension().and_then(|e| e.to_str()) == Some("json") {
            trace!("Found manifest: {}", p.display());
            manifests.push(p.to_path_buf());
        }
    }
    manifests.sort();

    debug!("Discovered {} manifests", manifests.len());
    Ok(manifests)
}
