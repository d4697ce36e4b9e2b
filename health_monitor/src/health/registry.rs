//! In-memory registry of monitored resources

use crate::error::Result;
use crate::models::{RegisteredResource, Resource, ResourceKind};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use validator::Validate;

#[derive(Debug, Default)]
struct RegistryState {
    monitors: BTreeMap<ResourceKind, BTreeMap<String, String>>,
    // Flat and append-only: a name is critical whatever kind it was registered under.
    critical: Vec<String>,
}

/// Point-in-time copy of the registry, in dispatch order.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    pub entries: Vec<(ResourceKind, String, String)>,
    pub critical: Vec<String>,
}

impl RegistrySnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_critical(&self, name: &str) -> bool {
        self.critical.iter().any(|critical| critical == name)
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    state: RwLock<RegistryState>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the handle for `(kind, name)`. Rejected resources
    /// leave the registry untouched.
    pub fn register(&self, resource: &Resource) -> Result<bool> {
        resource.validate()?;
        let kind: ResourceKind = resource.kind.parse()?;

        let mut state = self.state.write();
        state
            .monitors
            .entry(kind)
            .or_default()
            .insert(resource.name.clone(), resource.handle.clone());

        if resource.critical {
            state.critical.push(resource.name.clone());
        }

        Ok(true)
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read();
        let entries = state
            .monitors
            .iter()
            .flat_map(|(kind, by_name)| {
                by_name
                    .iter()
                    .map(move |(name, handle)| (*kind, name.clone(), handle.clone()))
            })
            .collect();

        RegistrySnapshot {
            entries,
            critical: state.critical.clone(),
        }
    }

    pub fn resources(&self) -> Vec<RegisteredResource> {
        let snapshot = self.snapshot();
        snapshot
            .entries
            .iter()
            .map(|(kind, name, handle)| RegisteredResource {
                kind: *kind,
                name: name.clone(),
                handle: handle.clone(),
                critical: snapshot.is_critical(name),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().monitors.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
