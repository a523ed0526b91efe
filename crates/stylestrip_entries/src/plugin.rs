use anyhow::Result;
use log::debug;
use std::sync::Arc;
use stylestrip_core::{Compiler, Plugin};

use crate::{
    classifier::{NoticeWriter, StyleOnlyEntries},
    config::Options,
    constants::PLUGIN_NAME,
};

/// Removes the script asset of every entry whose resources are all stylesheets.
///
/// ```
/// use stylestrip_core::{Compilation, Compiler};
/// use stylestrip_entries::{FixStyleOnlyEntriesPlugin, Options};
///
/// # fn main() -> anyhow::Result<()> {
/// let plugin = FixStyleOnlyEntriesPlugin::new(Options::default())?;
/// let mut compiler = Compiler::new();
/// compiler.apply_plugin(&plugin);
/// compiler.run(&mut Compilation::default());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FixStyleOnlyEntriesPlugin {
    classifier: Arc<StyleOnlyEntries>,
}

impl FixStyleOnlyEntriesPlugin {
    pub fn new(options: Options) -> Result<Self> {
        Self::with_notices(options, NoticeWriter::stderr())
    }

    pub fn with_notices(options: Options, notices: NoticeWriter) -> Result<Self> {
        debug!("Creating {} with {:?}", PLUGIN_NAME, options);
        Ok(Self { classifier: Arc::new(StyleOnlyEntries::with_notices(&options, notices)?) })
    }
}

impl Plugin for FixStyleOnlyEntriesPlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn apply(&self, compiler: &mut Compiler) {
        let classifier = Arc::clone(&self.classifier);
        compiler.tap_compilation(PLUGIN_NAME, move |hooks| {
            let classifier = Arc::clone(&classifier);
            hooks.tap_chunk_asset(PLUGIN_NAME, move |ctx, file| {
                if classifier.should_remove(ctx, file) {
                    ctx.record_deleted(file);
                }
            });
        });
    }
}
