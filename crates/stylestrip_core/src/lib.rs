//! Core model for stylestrip.
//!
//! This crate provides the host-side pieces that style-only entry detection
//! operates on:
//! - The module graph (modules, dependency edges, chunks, assets)
//! - Collecting the source resources reachable from an entry module
//! - A hook-based compilation pipeline that plugins register on
//! - Loading and saving compilation manifests

mod collector;
mod graph;
mod hooks;
mod manifest;
mod types;

// Re-export public API
pub use collector::{VisitedSet, collect_entry_resources, collect_resources};
pub use graph::{Assets, Compilation, ModuleGraph};
pub use hooks::{ChunkAssetContext, CompilationHooks, Compiler, Plugin};
pub use manifest::{discover_manifests, load_compilation, save_compilation};
pub use types::{Asset, Chunk, DeletedAsset, Dependency, Module, ModuleId};
