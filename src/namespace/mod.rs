//! The exposed attribute namespace.
//!
//! This module defines the seam between the crate and the host's exposure
//! mechanism: a [`Namespace`] is a place where named, read-only nodes can be
//! published for out-of-process observers, grouped under a root. Each node
//! carries a show callback that renders its current value as text, analogous
//! to a virtual file's read handler.

mod memory;

pub use memory::InMemoryNamespace;

use crate::error::NamespaceError;

/// Callback that renders a node's current value as text.
pub type ShowFn = Box<dyn Fn() -> String + Send + Sync>;

/// Handle to a namespace root, returned on creation and required for all
/// operations under that root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootHandle {
    id: u64,
    name: String,
}

impl RootHandle {
    pub(crate) fn new(id: u64, name: String) -> Self {
        Self { id, name }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// The root's name in the namespace.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Trait for the host's attribute exposure mechanism.
///
/// Creation can fail (the host may refuse further allocations); removal never
/// fails and reports whether anything was actually removed, so cleanup paths
/// stay idempotent.
pub trait Namespace: Send + Sync {
    /// Create a root under which nodes can be published.
    ///
    /// # Returns
    ///
    /// * `Ok(RootHandle)` - Handle to the new root.
    /// * `Err(NamespaceError)` - If the root exists or the host refuses it.
    fn create_root(&self, name: &str) -> Result<RootHandle, NamespaceError>;

    /// Create a read-only node under `root` whose value is rendered by `show`.
    fn create_node(
        &self,
        root: &RootHandle,
        name: &str,
        show: ShowFn,
    ) -> Result<(), NamespaceError>;

    /// Remove a node. Returns whether the node existed.
    fn remove_node(&self, root: &RootHandle, name: &str) -> bool;

    /// Remove a root and everything under it. Returns whether the root existed.
    fn remove_root(&self, root: &RootHandle) -> bool;
}
