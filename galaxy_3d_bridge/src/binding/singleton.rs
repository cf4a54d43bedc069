/// Singleton accessor: lazily resolved handles to engine-created objects.
///
/// Each slot moves `Unresolved -> Resolved` once and is never cleared. A
/// failed lookup leaves the slot unresolved, so a subsystem started later
/// can still be found.

use std::sync::RwLock;
use rustc_hash::FxHashMap;
use crate::binding::handle::Handle;
use crate::binding::native::Resolver;
use crate::error::{Error, Result};

pub struct SingletonRegistry {
    slots: RwLock<FxHashMap<String, Handle>>,
}

impl SingletonRegistry {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(FxHashMap::default()),
        }
    }

    /// Handle of the singleton `name`, asking the engine on first access
    ///
    /// # Errors
    ///
    /// `Error::SingletonUnavailable` if the engine has no such singleton
    /// (or reports a null handle for it).
    pub fn get_singleton(&self, name: &str, resolver: &dyn Resolver) -> Result<Handle> {
        if let Some(handle) = self.get(name) {
            return Ok(handle);
        }

        let handle = resolver
            .lookup_singleton(name)
            .filter(|handle| handle.is_valid())
            .ok_or_else(|| Error::SingletonUnavailable(name.to_string()))?;

        let mut slots = self.slots.write()
            .map_err(|_| crate::bridge_err!("galaxy3d::Singleton", "Singleton slots lock poisoned"))?;
        let stored = *slots.entry(name.to_string()).or_insert(handle);

        crate::bridge_debug!("galaxy3d::Singleton", "Singleton '{}' resolved to {}", name, stored);
        Ok(stored)
    }

    /// Resolved handle for `name`, without asking the engine
    pub fn get(&self, name: &str) -> Option<Handle> {
        self.slots.read().ok().and_then(|slots| slots.get(name).copied())
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl Default for SingletonRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "singleton_tests.rs"]
mod tests;
