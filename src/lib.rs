//! # hwcap
//!
//! `hwcap` detects which optional hardware capabilities are present on a
//! device by caching a 32-bit capability register read once at startup, and
//! exposes the result two ways: an in-process query API and a set of
//! externally visible, per-bit read-only nodes in a virtual attribute
//! namespace.
//!
//! Key concepts:
//!
//! 1. **Capability register**: a fixed-width value where each bit flags the
//!    presence of one optional hardware feature. Read exactly once, through
//!    an opaque [`RegisterSource`].
//!
//! 2. **Registry**: the [`CapabilityRegistry`] caches the register value and
//!    is the single source of truth for "is capability N present". It is
//!    immutable after construction, so queries need no synchronization.
//!
//! 3. **Attribute set**: the [`AttributeSet`] publishes the registry as 33
//!    read-only nodes (`module_bits` plus `module_0..module_31`) under one
//!    [`Namespace`] root. Publication is all-or-nothing: a failure at any
//!    step rolls back everything created so far, so observers only ever see
//!    the set fully absent or fully present.
//!
//! 4. **Query facade**: the [`QueryFacade`] is the read surface for other
//!    in-process components; it fails closed when detached or handed an
//!    out-of-range bit, with strict `try_*` variants for callers that want
//!    errors instead.
//!
//! A [`CapabilityDevice`] ties these together for a host's attach/detach
//! lifecycle hooks.

pub mod attrs;
pub mod config;
pub mod device;
pub mod error;
pub mod namespace;
pub mod query;
pub mod registry;
pub mod source;

// Re-export key types for convenience
pub use attrs::{AttributeKind, AttributeNode, AttributeSet};
pub use config::DeviceConfig;
pub use device::CapabilityDevice;
pub use error::{Error, NamespaceError, RegistryError, Result};
pub use namespace::{InMemoryNamespace, Namespace, RootHandle, ShowFn};
pub use query::QueryFacade;
pub use registry::{CapabilityRegistry, CAPABILITY_BITS};
pub use source::{FixedRegister, RegisterSource, UnmappedRegister};
