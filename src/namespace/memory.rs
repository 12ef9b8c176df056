//! In-memory attribute namespace.
//!
//! This module provides an in-memory implementation of the [`Namespace`]
//! trait, together with the observer side ([`read`](InMemoryNamespace::read))
//! that out-of-process inspection would otherwise provide.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::NamespaceError;

use super::{Namespace, RootHandle, ShowFn};

struct RootEntry {
    id: u64,
    nodes: DashMap<String, ShowFn>,
}

/// An in-memory attribute namespace.
#[derive(Clone, Default)]
pub struct InMemoryNamespace {
    /// Roots by name. A node's show callback runs under the map's read guard,
    /// so removal of its root blocks until in-flight reads finish.
    roots: Arc<DashMap<String, RootEntry>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryNamespace {
    /// Create a new, empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a node's current value, as an external observer would.
    ///
    /// Returns `None` if the root or node does not exist.
    pub fn read(&self, root: &str, node: &str) -> Option<String> {
        let entry = self.roots.get(root)?;
        let show = entry.nodes.get(node)?;
        Some(show())
    }

    /// Whether a root with this name exists.
    pub fn has_root(&self, root: &str) -> bool {
        self.roots.contains_key(root)
    }

    /// Number of roots currently published.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of nodes under a root, or `None` if the root does not exist.
    pub fn node_count(&self, root: &str) -> Option<usize> {
        self.roots.get(root).map(|entry| entry.nodes.len())
    }
}

impl Namespace for InMemoryNamespace {
    fn create_root(&self, name: &str) -> Result<RootHandle, NamespaceError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        match self.roots.entry(name.to_string()) {
            Entry::Occupied(_) => Err(NamespaceError::RootExists(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(RootEntry {
                    id,
                    nodes: DashMap::new(),
                });
                Ok(RootHandle::new(id, name.to_string()))
            }
        }
    }

    fn create_node(
        &self,
        root: &RootHandle,
        name: &str,
        show: ShowFn,
    ) -> Result<(), NamespaceError> {
        let entry = self
            .roots
            .get(root.name())
            .filter(|entry| entry.id == root.id())
            .ok_or_else(|| NamespaceError::RootNotFound(root.name().to_string()))?;

        // Bound to a local so the node entry's borrow ends before the root
        // guard is released.
        let result = match entry.nodes.entry(name.to_string()) {
            Entry::Occupied(_) => Err(NamespaceError::NodeExists(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(show);
                Ok(())
            }
        };
        result
    }

    fn remove_node(&self, root: &RootHandle, name: &str) -> bool {
        match self.roots.get(root.name()) {
            Some(entry) if entry.id == root.id() => entry.nodes.remove(name).is_some(),
            _ => false,
        }
    }

    fn remove_root(&self, root: &RootHandle) -> bool {
        self.roots
            .remove_if(root.name(), |_, entry| entry.id == root.id())
            .is_some()
    }
}
