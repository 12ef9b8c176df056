//! The capability query facade.
//!
//! [`QueryFacade`] is the read surface other in-process components consume.
//! The plain accessors fail closed (`false` / `0`) when no registry is
//! attached or the bit index is out of range, preserving the contract
//! callers of the original exports relied on; the `try_*` variants surface
//! the same conditions as explicit errors.

use std::sync::Arc;

use crate::error::RegistryError;
use crate::registry::CapabilityRegistry;

/// Read-only view over a capability registry.
///
/// Cheap to clone; safe to call concurrently from any number of callers once
/// the registry is initialized, since every read is pure over immutable state.
#[derive(Debug, Clone, Default)]
pub struct QueryFacade {
    registry: Option<Arc<CapabilityRegistry>>,
}

impl QueryFacade {
    /// Create a facade over an initialized registry.
    pub fn attached(registry: Arc<CapabilityRegistry>) -> Self {
        Self {
            registry: Some(registry),
        }
    }

    /// Create a facade with no registry behind it.
    ///
    /// Every fail-closed query reports "not present"; every strict query
    /// reports [`RegistryError::NotInitialized`].
    pub fn detached() -> Self {
        Self { registry: None }
    }

    /// Whether a registry is attached.
    pub fn is_attached(&self) -> bool {
        self.registry.is_some()
    }

    /// Whether the capability at `bit` is present. Fail-closed: `false` for
    /// any bit >= 32 or when no registry is attached.
    pub fn is_present(&self, bit: u32) -> bool {
        match &self.registry {
            Some(registry) => registry.bit_present(bit).unwrap_or(false),
            None => false,
        }
    }

    /// The full capability mask. Fail-closed: `0` when no registry is attached.
    pub fn mask(&self) -> u32 {
        self.registry.as_ref().map_or(0, |r| r.mask())
    }

    /// Strict variant of [`is_present`](Self::is_present).
    pub fn try_is_present(&self, bit: u32) -> Result<bool, RegistryError> {
        match &self.registry {
            Some(registry) => registry.bit_present(bit),
            None => Err(RegistryError::NotInitialized),
        }
    }

    /// Strict variant of [`mask`](Self::mask).
    pub fn try_mask(&self) -> Result<u32, RegistryError> {
        self.registry
            .as_ref()
            .map(|r| r.mask())
            .ok_or(RegistryError::NotInitialized)
    }
}
