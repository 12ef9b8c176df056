//! The exposed attribute set.
//!
//! An [`AttributeSet`] publishes the registry's state as 33 read-only nodes
//! under one namespace root: the full-mask node `module_bits` plus one
//! `module_<N>` node per bit. Construction is all-or-nothing: a failure at
//! any step rolls back every node created so far, so external observers only
//! ever see the set fully absent or fully present. Teardown is idempotent.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::NamespaceError;
use crate::namespace::{Namespace, RootHandle, ShowFn};
use crate::query::QueryFacade;
use crate::registry::CAPABILITY_BITS;

/// Name of the full-mask node.
pub const MASK_NODE_NAME: &str = "module_bits";

/// What a single exposed node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// The full 32-bit mask, rendered as `0x%08x\n`.
    FullMask,
    /// Presence of one bit, rendered as `1\n` or `0\n`.
    BitPresence(u8),
}

/// One exposed, named, read-only node.
///
/// Nodes are created only during [`AttributeSet::publish`] and removed only
/// during teardown or rollback; they are never mutated individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeNode {
    name: String,
    kind: AttributeKind,
}

impl AttributeNode {
    /// The node's name, unique under its root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the node represents.
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }
}

/// Render the full mask the way the `module_bits` node serves it.
pub fn format_mask(mask: u32) -> String {
    format!("0x{:08x}\n", mask)
}

/// Render one bit's presence the way a `module_<N>` node serves it.
pub fn format_bit(present: bool) -> String {
    if present {
        "1\n".to_string()
    } else {
        "0\n".to_string()
    }
}

/// Name of the per-bit node for `bit`.
pub fn bit_node_name(bit: u32) -> String {
    format!("module_{}", bit)
}

/// The published set of capability attribute nodes.
///
/// Exactly one of two externally observable states exists at any time: fully
/// absent (before publish, after a failed publish, after teardown) or fully
/// present with the root and all 33 nodes.
pub struct AttributeSet {
    namespace: Arc<dyn Namespace>,
    /// `Some` while published; taken on teardown so repeat calls are no-ops.
    root: Option<RootHandle>,
    nodes: Vec<AttributeNode>,
}

// The namespace handle is a trait object and has no useful rendering.
impl fmt::Debug for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSet")
            .field("root", &self.root)
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

impl AttributeSet {
    /// Publish the attribute set under `root_name`, or publish nothing.
    ///
    /// Creates the root, then `module_bits`, then `module_0` through
    /// `module_31` in increasing order. On any failure every node created so
    /// far is rolled back along with the root before the error is returned.
    ///
    /// # Arguments
    ///
    /// * `facade` - Read access to the capability registry; the show
    ///   callbacks capture clones of it.
    /// * `namespace` - The host's exposure mechanism.
    /// * `root_name` - Name for the namespace root.
    ///
    /// # Returns
    ///
    /// * `Ok(AttributeSet)` - The set, published and discoverable.
    /// * `Err(NamespaceError)` - Root or node creation failed; nothing is
    ///   left published.
    pub fn publish(
        facade: &QueryFacade,
        namespace: Arc<dyn Namespace>,
        root_name: &str,
    ) -> Result<Self, NamespaceError> {
        let root = namespace.create_root(root_name)?;
        debug!("Created namespace root: {}", root_name);

        let mut set = Self {
            namespace,
            root: Some(root),
            nodes: Vec::with_capacity(1 + CAPABILITY_BITS as usize),
        };

        let mask_facade = facade.clone();
        if let Err(err) = set.create_node(
            MASK_NODE_NAME,
            AttributeKind::FullMask,
            Box::new(move || format_mask(mask_facade.mask())),
        ) {
            set.rollback();
            return Err(err);
        }

        for bit in 0..CAPABILITY_BITS {
            let bit_facade = facade.clone();
            let result = set.create_node(
                &bit_node_name(bit),
                AttributeKind::BitPresence(bit as u8),
                Box::new(move || format_bit(bit_facade.is_present(bit))),
            );
            if let Err(err) = result {
                set.rollback();
                return Err(err);
            }
        }

        info!(
            "Published {} attribute nodes under root {}",
            set.nodes.len(),
            root_name
        );
        Ok(set)
    }

    /// The published nodes, in creation order. Empty once torn down.
    pub fn nodes(&self) -> &[AttributeNode] {
        &self.nodes
    }

    /// Whether the set is currently published.
    pub fn is_published(&self) -> bool {
        self.root.is_some()
    }

    /// Remove all nodes and the root.
    ///
    /// Idempotent: calling this on an already-torn-down set is a no-op. Host
    /// lifecycle hooks may reach this on paths where construction never
    /// completed.
    pub fn teardown(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };

        for node in self.nodes.drain(..).rev() {
            self.namespace.remove_node(&root, node.name());
        }
        self.namespace.remove_root(&root);
        info!("Attribute set under root {} torn down", root.name());
    }

    fn create_node(
        &mut self,
        name: &str,
        kind: AttributeKind,
        show: ShowFn,
    ) -> Result<(), NamespaceError> {
        let root = self.root.as_ref().ok_or_else(|| NamespaceError::NodeCreate {
            node: name.to_string(),
            reason: "attribute set has no root".to_string(),
        })?;
        self.namespace.create_node(root, name, show)?;
        self.nodes.push(AttributeNode {
            name: name.to_string(),
            kind,
        });
        Ok(())
    }

    /// Undo a partial construction: release every node created so far, in
    /// reverse creation order, then the root. Removal failures are ignored
    /// since the nodes are independent and the root removal sweeps the rest.
    fn rollback(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };

        warn!(
            "Rolling back partially constructed attribute set under root {} ({} nodes)",
            root.name(),
            self.nodes.len()
        );
        for node in self.nodes.drain(..).rev() {
            self.namespace.remove_node(&root, node.name());
        }
        self.namespace.remove_root(&root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;

    use crate::namespace::InMemoryNamespace;
    use crate::registry::CapabilityRegistry;
    use crate::source::FixedRegister;

    fn facade_over(mask: u32) -> QueryFacade {
        let registry = CapabilityRegistry::read_from(&FixedRegister(mask)).unwrap();
        QueryFacade::attached(Arc::new(registry))
    }

    /// Namespace wrapper that fails the Nth creation call (root included).
    struct FlakyNamespace {
        inner: InMemoryNamespace,
        remaining: AtomicUsize,
    }

    impl FlakyNamespace {
        fn failing_at(inner: InMemoryNamespace, step: usize) -> Self {
            Self {
                inner,
                remaining: AtomicUsize::new(step),
            }
        }

        fn take_budget(&self) -> bool {
            // Returns false when the injected failure step is reached.
            loop {
                let left = self.remaining.load(Ordering::SeqCst);
                if left == 0 {
                    return false;
                }
                if self
                    .remaining
                    .compare_exchange(left, left - 1, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    return true;
                }
            }
        }
    }

    impl Namespace for FlakyNamespace {
        fn create_root(&self, name: &str) -> Result<RootHandle, NamespaceError> {
            if !self.take_budget() {
                return Err(NamespaceError::RootCreate("injected failure".to_string()));
            }
            self.inner.create_root(name)
        }

        fn create_node(
            &self,
            root: &RootHandle,
            name: &str,
            show: ShowFn,
        ) -> Result<(), NamespaceError> {
            if !self.take_budget() {
                return Err(NamespaceError::NodeCreate {
                    node: name.to_string(),
                    reason: "injected failure".to_string(),
                });
            }
            self.inner.create_node(root, name, show)
        }

        fn remove_node(&self, root: &RootHandle, name: &str) -> bool {
            self.inner.remove_node(root, name)
        }

        fn remove_root(&self, root: &RootHandle) -> bool {
            self.inner.remove_root(root)
        }
    }

    #[test]
    fn publish_exposes_all_33_nodes() {
        let ns = Arc::new(InMemoryNamespace::new());
        let set = AttributeSet::publish(&facade_over(0x0000_000f), ns.clone(), "hw_module").unwrap();

        assert!(set.is_published());
        assert_eq!(set.nodes().len(), 33);
        assert_eq!(ns.node_count("hw_module"), Some(33));
        assert_eq!(set.nodes()[0].name(), MASK_NODE_NAME);
        assert_eq!(set.nodes()[0].kind(), AttributeKind::FullMask);
        assert_eq!(set.nodes()[1].kind(), AttributeKind::BitPresence(0));
        assert_eq!(set.nodes()[32].kind(), AttributeKind::BitPresence(31));
    }

    #[test]
    fn published_nodes_serve_bit_exact_text() {
        let ns = Arc::new(InMemoryNamespace::new());
        let _set =
            AttributeSet::publish(&facade_over(0x0000_000f), ns.clone(), "hw_module").unwrap();

        assert_eq!(ns.read("hw_module", "module_bits").unwrap(), "0x0000000f\n");
        assert_eq!(ns.read("hw_module", "module_0").unwrap(), "1\n");
        assert_eq!(ns.read("hw_module", "module_3").unwrap(), "1\n");
        assert_eq!(ns.read("hw_module", "module_4").unwrap(), "0\n");
        assert_eq!(ns.read("hw_module", "module_31").unwrap(), "0\n");
    }

    #[test]
    fn failed_publish_leaves_nothing_behind() {
        // Step 0 fails the root itself; steps 1..=33 fail each node creation.
        for failing_step in 0..34 {
            let inner = InMemoryNamespace::new();
            let ns = Arc::new(FlakyNamespace::failing_at(inner.clone(), failing_step));

            let result = AttributeSet::publish(&facade_over(u32::MAX), ns, "hw_module");

            assert!(result.is_err(), "step {} should fail", failing_step);
            assert_eq!(
                inner.root_count(),
                0,
                "step {} leaked a root",
                failing_step
            );
            assert!(!inner.has_root("hw_module"));
        }
    }

    #[test]
    fn failure_error_kind_matches_the_failing_step() {
        let inner = InMemoryNamespace::new();
        let ns = Arc::new(FlakyNamespace::failing_at(inner.clone(), 0));
        assert_matches!(
            AttributeSet::publish(&facade_over(0), ns, "hw_module"),
            Err(NamespaceError::RootCreate(_))
        );

        let inner = InMemoryNamespace::new();
        let ns = Arc::new(FlakyNamespace::failing_at(inner.clone(), 5));
        assert_matches!(
            AttributeSet::publish(&facade_over(0), ns, "hw_module"),
            Err(NamespaceError::NodeCreate { .. })
        );
    }

    #[test]
    fn teardown_removes_everything() {
        let ns = Arc::new(InMemoryNamespace::new());
        let mut set =
            AttributeSet::publish(&facade_over(0x0000_0001), ns.clone(), "hw_module").unwrap();

        set.teardown();

        assert!(!set.is_published());
        assert!(set.nodes().is_empty());
        assert_eq!(ns.root_count(), 0);
    }

    #[test]
    fn teardown_is_idempotent() {
        let ns = Arc::new(InMemoryNamespace::new());
        let mut set =
            AttributeSet::publish(&facade_over(0x0000_0001), ns.clone(), "hw_module").unwrap();

        set.teardown();
        set.teardown();

        assert_eq!(ns.root_count(), 0);

        // A fresh publish under the same name must work after teardown.
        let replacement = AttributeSet::publish(&facade_over(0), ns.clone(), "hw_module").unwrap();
        assert_eq!(replacement.nodes().len(), 33);
    }

    #[test]
    fn duplicate_root_name_fails_and_preserves_the_original() {
        let ns = Arc::new(InMemoryNamespace::new());
        let _original =
            AttributeSet::publish(&facade_over(0x0000_0013), ns.clone(), "hw_module").unwrap();

        assert_matches!(
            AttributeSet::publish(&facade_over(0), ns.clone(), "hw_module"),
            Err(NamespaceError::RootExists(_))
        );

        // The first publication is untouched.
        assert_eq!(ns.node_count("hw_module"), Some(33));
        assert_eq!(ns.read("hw_module", "module_bits").unwrap(), "0x00000013\n");
    }

    #[test]
    fn debug_rendering_shows_root_and_nodes() {
        let ns = Arc::new(InMemoryNamespace::new());
        let mut set =
            AttributeSet::publish(&facade_over(0x0000_0001), ns, "hw_module").unwrap();

        let rendered = format!("{:?}", set);
        assert!(rendered.contains("AttributeSet"));
        assert!(rendered.contains("hw_module"));
        assert!(rendered.contains("module_bits"));

        set.teardown();
        let rendered = format!("{:?}", set);
        assert!(rendered.contains("root: None"));
    }

    #[test]
    fn formatters_are_bit_exact() {
        assert_eq!(format_mask(0x0000_000f), "0x0000000f\n");
        assert_eq!(format_mask(0), "0x00000000\n");
        assert_eq!(format_mask(u32::MAX), "0xffffffff\n");
        assert_eq!(format_bit(true), "1\n");
        assert_eq!(format_bit(false), "0\n");
        assert_eq!(bit_node_name(0), "module_0");
        assert_eq!(bit_node_name(31), "module_31");
    }
}
