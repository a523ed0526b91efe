//! Minimal host pipeline: a compiler-level registration point that hands out a
//! per-compilation registration point, which in turn exposes the chunk asset hook.
//!
//! The hook sequence is fixed: every compilation tap runs first, then the chunk
//! asset taps are invoked once per (chunk, file) pair, chunks in order and files
//! in order. Dispatch is strictly sequential within one compilation.

use log::{debug, trace};

use crate::{
    graph::{Assets, Compilation, ModuleGraph},
    types::{Chunk, DeletedAsset},
};

type CompilationTap = Box<dyn Fn(&mut CompilationHooks) + Send + Sync>;
type ChunkAssetTap = Box<dyn Fn(&mut ChunkAssetContext<'_>, &str) + Send + Sync>;

/// What a chunk asset tap may see and mutate.
#[derive(Debug)]
pub struct ChunkAssetContext<'a> {
    pub graph: &'a ModuleGraph,
    pub chunk: &'a mut Chunk,
    pub assets: &'a mut Assets,
    pub deleted_assets: &'a mut Vec<DeletedAsset>,
}

impl ChunkAssetContext<'_> {
    /// Notes that `file` was taken out of the current chunk.
    pub fn record_deleted(&mut self, file: &str) {
        trace!("Recording deletion of {} from chunk '{}'", file, self.chunk.name);
        self.deleted_assets
            .push(DeletedAsset { chunk: self.chunk.name.clone(), file: file.to_string() });
    }
}

/// Hooks registered for a single compilation.
#[derive(Default)]
pub struct CompilationHooks {
    chunk_asset: Vec<(String, ChunkAssetTap)>,
}

impl CompilationHooks {
    pub fn tap_chunk_asset<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&mut ChunkAssetContext<'_>, &str) + Send + Sync + 'static,
    {
        trace!("Tapping chunk asset hook: {}", name);
        self.chunk_asset.push((name.to_string(), Box::new(f)));
    }

    fn call_chunk_asset(&self, ctx: &mut ChunkAssetContext<'_>, file: &str) {
        for (name, tap) in &self.chunk_asset {
            trace!("Calling chunk asset tap '{}' for {} in chunk '{}'", name, file, ctx.chunk.name);
            tap(&mut *ctx, file);
        }
    }
}

impl std::fmt::Debug for CompilationHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.chunk_asset.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("CompilationHooks").field("chunk_asset", &names).finish()
    }
}

/// Something that registers itself on a [`Compiler`].
pub trait Plugin {
    fn name(&self) -> &'static str;
    fn apply(&self, compiler: &mut Compiler);
}

/// Build instance holding the compilation taps of every applied plugin.
#[derive(Default)]
pub struct Compiler {
    compilation: Vec<(String, CompilationTap)>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_plugin<P: Plugin + ?Sized>(&mut self, plugin: &P) {
        debug!("Applying plugin: {}", plugin.name());
        plugin.apply(self);
    }

    pub fn tap_compilation<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&mut CompilationHooks) + Send + Sync + 'static,
    {
        trace!("Tapping compilation hook: {}", name);
        self.compilation.push((name.to_string(), Box::new(f)));
    }

    /// Runs one compilation pass through the registered hooks.
    pub fn run(&self, compilation: &mut Compilation) {
        let mut hooks = CompilationHooks::default();
        for (name, tap) in &self.compilation {
            trace!("Calling compilation tap '{}'", name);
            tap(&mut hooks);
        }

        let Compilation { modules, chunks, assets, deleted_assets } = compilation;
        debug!("Dispatching chunk assets for {} chunks", chunks.len());

        for chunk in chunks.iter_mut() {
            // Taps may remove files from the chunk while we are iterating them
            let files = chunk.files.clone();
            for file in &files {
                let mut ctx = ChunkAssetContext {
                    graph: &*modules,
                    chunk: &mut *chunk,
                    assets: &mut *assets,
                    deleted_assets: &mut *deleted_assets,
                };
                hooks.call_chunk_asset(&mut ctx, file);
            }
        }
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.compilation.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("Compiler").field("compilation", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Asset, ModuleId};
    use std::sync::{Arc, Mutex};

    fn compilation() -> Compilation {
        let mut c = Compilation::default();
        c.chunks.push(Chunk {
            name: "a".to_string(),
            files: vec!["a.js".to_string(), "a.css".to_string()],
            entry_module: Some(ModuleId(1)),
        });
        c.chunks.push(Chunk {
            name: "b".to_string(),
            files: vec!["b.js".to_string()],
            entry_module: None,
        });
        for f in ["a.js", "a.css", "b.js"] {
            c.assets.insert(f.to_string(), Asset { size: 1 });
        }
        c
    }

    struct Recorder {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl Plugin for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn apply(&self, compiler: &mut Compiler) {
            let seen = Arc::clone(&self.seen);
            compiler.tap_compilation(self.name(), move |hooks| {
                let seen = Arc::clone(&seen);
                hooks.tap_chunk_asset("recorder", move |ctx, file| {
                    seen.lock().unwrap().push(format!("{}:{}", ctx.chunk.name, file));
                });
            });
        }
    }

    #[test]
    fn test_chunk_asset_called_per_chunk_and_file() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut compiler = Compiler::new();
        compiler.apply_plugin(&Recorder { seen: Arc::clone(&seen) });

        let mut c = compilation();
        compiler.run(&mut c);

        assert_eq!(*seen.lock().unwrap(), vec!["a:a.js", "a:a.css", "b:b.js"]);
    }

    #[test]
    fn test_compilation_taps_run_every_pass() {
        let passes = Arc::new(Mutex::new(0));
        let mut compiler = Compiler::new();
        let counter = Arc::clone(&passes);
        compiler.tap_compilation("counter", move |_| {
            *counter.lock().unwrap() += 1;
        });

        compiler.run(&mut compilation());
        compiler.run(&mut compilation());
        assert_eq!(*passes.lock().unwrap(), 2);
    }

    #[test]
    fn test_removal_during_dispatch_does_not_skip_files() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut compiler = Compiler::new();
        compiler.tap_compilation("remover", |hooks| {
            hooks.tap_chunk_asset("remover", |ctx, file| {
                if file.ends_with(".js") {
                    ctx.chunk.files.retain(|f| f != file);
                    ctx.assets.remove(file);
                    ctx.record_deleted(file);
                }
            });
        });
        compiler.apply_plugin(&Recorder { seen: Arc::clone(&seen) });

        let mut c = compilation();
        compiler.run(&mut c);

        // Taps run in registration order; the recorder still sees every file
        assert_eq!(*seen.lock().unwrap(), vec!["a:a.js", "a:a.css", "b:b.js"]);
        assert_eq!(c.chunks[0].files, vec!["a.css"]);
        assert!(c.chunks[1].files.is_empty());
        assert_eq!(c.assets.keys().collect::<Vec<_>>(), vec!["a.css"]);
        assert_eq!(
            c.deleted_assets,
            vec![
                DeletedAsset { chunk: "a".to_string(), file: "a.js".to_string() },
                DeletedAsset { chunk: "b".to_string(), file: "b.js".to_string() },
            ]
        );
    }

    #[test]
    fn test_file_change_without_record_is_not_a_deletion() {
        let mut compiler = Compiler::new();
        compiler.tap_compilation("renamer", |hooks| {
            hooks.tap_chunk_asset("renamer", |ctx, file| {
                if file == "b.js" {
                    ctx.chunk.files = vec!["b.min.js".to_string()];
                }
            });
        });

        let mut c = compilation();
        compiler.run(&mut c);

        assert_eq!(c.chunks[1].files, vec!["b.min.js"]);
        assert!(c.deleted_assets.is_empty());
    }
}
