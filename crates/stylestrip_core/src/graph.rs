use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::types::{Asset, Chunk, DeletedAsset, Module, ModuleId};

/// Owner of every module in a build pass, keyed by id.
///
/// Serialized as a flat list of modules ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Module>", into = "Vec<Module>")]
pub struct ModuleGraph {
    modules: HashMap<ModuleId, Module>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a module, replacing any module previously stored under the same id.
    pub fn add(&mut self, module: Module) -> Option<Module> {
        self.modules.insert(module.id, module)
    }

    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl From<Vec<Module>> for ModuleGraph {
    fn from(modules: Vec<Module>) -> Self {
        let mut graph = Self::new();
        for module in modules {
            let id = module.id;
            if graph.add(module).is_some() {
                warn!("Duplicate module id {} in graph, keeping the last definition", id);
            }
        }
        graph
    }
}

impl From<ModuleGraph> for Vec<Module> {
    fn from(graph: ModuleGraph) -> Self {
        let mut modules: Vec<Module> = graph.modules.into_values().collect();
        modules.sort_by_key(|m| m.id);
        modules
    }
}

impl FromIterator<Module> for ModuleGraph {
    fn from_iter<I: IntoIterator<Item = Module>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Asset table of a compilation, keyed by output file name.
pub type Assets = BTreeMap<String, Asset>;

/// Everything the host produced for one compilation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compilation {
    #[serde(default)]
    pub modules: ModuleGraph,
    #[serde(default)]
    pub chunks: Vec<Chunk>,
    #[serde(default)]
    pub assets: Assets,
    /// Assets removed by chunk asset taps, in dispatch order. Not part of the manifest.
    #[serde(skip)]
    pub deleted_assets: Vec<DeletedAsset>,
}
