use anyhow::Result;
use log::{debug, info, trace, warn};
use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};
use stylestrip_core::{Assets, Chunk, ChunkAssetContext, ModuleGraph, collect_entry_resources};

use crate::{
    config::Options,
    constants::{PLUGIN_NAME, SCRIPT_FILE_SUFFIXES},
    matcher::{DevServerFilter, IgnorePattern, StyleExtensionMatcher},
};

/// Destination of the per-removal notice. Defaults to stderr.
#[derive(Clone)]
pub struct NoticeWriter(Arc<Mutex<dyn Write + Send>>);

impl NoticeWriter {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self(Arc::new(Mutex::new(writer)))
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    fn removing(&self, file: &str) {
        // A poisoned lock only means another notice panicked mid-write
        let mut writer = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let notice = writeln!(writer, "{}: removing js from style only module: {}", PLUGIN_NAME, file);
        if let Err(e) = notice {
            warn!("Failed to write removal notice for {}: {}", file, e);
        }
    }
}

impl std::fmt::Debug for NoticeWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NoticeWriter")
    }
}

/// Decides whether a chunk's script output belongs to a style-only entry, and removes it.
///
/// All patterns are compiled once at construction. Classification itself never fails:
/// anything that cannot be classified keeps its script.
#[derive(Debug, Clone)]
pub struct StyleOnlyEntries {
    styles: StyleExtensionMatcher,
    dev_server: DevServerFilter,
    ignore: Option<IgnorePattern>,
    silent: bool,
    notices: NoticeWriter,
}

pub fn is_script_file(file: &str) -> bool {
    SCRIPT_FILE_SUFFIXES.iter().any(|suffix| file.ends_with(suffix))
}

impl StyleOnlyEntries {
    pub fn new(options: &Options) -> Result<Self> {
        Self::with_notices(options, NoticeWriter::stderr())
    }

    /// Like [`StyleOnlyEntries::new`], with removal notices sent to `notices`.
    pub fn with_notices(options: &Options, notices: NoticeWriter) -> Result<Self> {
        let styles = StyleExtensionMatcher::new(options.extensions.as_slice())?;
        debug!("Style resource pattern: {}", styles.as_str());
        let ignore = options.ignore.as_ref().map(IgnorePattern::compile).transpose()?;

        Ok(Self {
            styles,
            dev_server: DevServerFilter::new()?,
            ignore,
            silent: options.silent,
            notices,
        })
    }

    /// Resources of the chunk's entry that take part in classification.
    ///
    /// Dev server client scripts and ignored resources are dropped. Returns `None`
    /// when the chunk has no entry module.
    pub fn style_resources(&self, graph: &ModuleGraph, chunk: &Chunk) -> Option<Vec<String>> {
        let entry = chunk.entry_module?;
        let resources = collect_entry_resources(graph, entry)
            .into_iter()
            .filter(|r| {
                if self.dev_server.is_match(r) {
                    trace!("Dropping dev server client resource: {}", r);
                    return false;
                }
                if let Some(ignore) = &self.ignore
                    && ignore.is_match(r)
                {
                    trace!("Dropping ignored resource: {}", r);
                    return false;
                }
                true
            })
            .collect();
        Some(resources)
    }

    /// True when `file` is a script output of a chunk whose entry resolves only to styles.
    ///
    /// An entry that resolves to no resources at all is not style-only.
    pub fn is_style_only(&self, graph: &ModuleGraph, chunk: &Chunk, file: &str) -> bool {
        if !is_script_file(file) {
            trace!("Not a script output: {}", file);
            return false;
        }
        if !chunk.has_entry_module() {
            trace!("Chunk '{}' has no entry module", chunk.name);
            return false;
        }

        let Some(resources) = self.style_resources(graph, chunk) else {
            return false;
        };

        let style_only =
            !resources.is_empty() && resources.iter().all(|r| self.styles.is_match(r));
        debug!(
            "Chunk '{}' file {}: {} resources, style-only={}",
            chunk.name,
            file,
            resources.len(),
            style_only
        );
        style_only
    }

    /// Drops `file` from the chunk and the asset table.
    ///
    /// Returns whether the asset table held the file.
    pub fn apply_removal(&self, chunk: &mut Chunk, assets: &mut Assets, file: &str) -> bool {
        if !self.silent {
            self.notices.removing(file);
        }
        info!("Removing {} from chunk '{}'", file, chunk.name);

        chunk.files.retain(|f| f != file);
        assets.remove(file).is_some()
    }

    /// Classifies and, on a positive result, removes. Returns the classification.
    pub fn should_remove(&self, ctx: &mut ChunkAssetContext<'_>, file: &str) -> bool {
        if !self.is_style_only(ctx.graph, ctx.chunk, file) {
            return false;
        }
        self.apply_removal(ctx.chunk, ctx.assets, file);
        true
    }
}
