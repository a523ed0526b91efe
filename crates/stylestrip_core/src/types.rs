use serde::{Deserialize, Serialize};

/// Identity of a module, unique and stable within one build pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub u64);

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An edge from a module to a module it references.
///
/// Both references are non-owning: modules are owned by the [`ModuleGraph`](crate::ModuleGraph),
/// edges only carry ids into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// The module this dependency resolved to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleId>,
    /// The module that issued the dependency, used when `module` is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_module: Option<ModuleId>,
}

impl Dependency {
    pub fn to(module: ModuleId) -> Self {
        Self { module: Some(module), origin_module: None }
    }

    pub fn from_origin(origin_module: ModuleId) -> Self {
        Self { module: None, origin_module: Some(origin_module) }
    }

    /// The module to descend into: the used module, falling back to the origin module.
    pub fn target(&self) -> Option<ModuleId> {
        self.module.or(self.origin_module)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    /// Absolute path of the source file, present only on terminal modules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Module {
    pub fn terminal(id: ModuleId, resource: impl Into<String>) -> Self {
        Self { id, resource: Some(resource.into()), dependencies: Vec::new() }
    }

    pub fn group(id: ModuleId, dependencies: Vec<Dependency>) -> Self {
        Self { id, resource: None, dependencies }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub name: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_module: Option<ModuleId>,
}

impl Chunk {
    pub fn has_entry_module(&self) -> bool {
        self.entry_module.is_some()
    }
}

/// A compiled output asset as recorded in the compilation's asset table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub size: usize,
}

/// An asset a chunk asset tap took out of a chunk during a compilation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedAsset {
    pub chunk: String,
    pub file: String,
}
