//! Loaded-module table

use kernel_api::{KernelModule, ModuleInfo};
use std::collections::HashMap;

/// Modules that completed `init` and have not been unloaded
#[derive(Default)]
pub struct ModuleTable {
    loaded: HashMap<&'static str, Box<dyn KernelModule>>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self {
            loaded: HashMap::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    pub(crate) fn insert(&mut self, module: Box<dyn KernelModule>) {
        self.loaded.insert(module.info().name, module);
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Box<dyn KernelModule>> {
        self.loaded.remove(name)
    }

    /// Metadata of every loaded module, sorted by name
    pub fn infos(&self) -> Vec<ModuleInfo> {
        let mut infos: Vec<ModuleInfo> = self.loaded.values().map(|m| m.info()).collect();
        infos.sort_by_key(|info| info.name);
        infos
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}
