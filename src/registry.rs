//! The capability registry.
//!
//! A [`CapabilityRegistry`] caches the 32-bit capability register value and is
//! the single source of truth for "is capability N present". The value is read
//! once at construction and never changes afterwards.

use tracing::debug;

use crate::error::RegistryError;
use crate::source::RegisterSource;

/// Number of per-bit capabilities in the 32-bit register.
pub const CAPABILITY_BITS: u32 = 32;

/// The cached capability register value.
///
/// A registry only exists in the initialized state: construction reads the
/// register exactly once, and a failed read means no registry. Callers that
/// need to represent "no registry yet" hold an `Option` or a detached
/// [`QueryFacade`](crate::query::QueryFacade) instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityRegistry {
    /// The register value. Immutable for the life of the registry.
    mask: u32,
}

impl CapabilityRegistry {
    /// Create a registry by reading the capability register once.
    ///
    /// # Arguments
    ///
    /// * `source` - The register source to read.
    ///
    /// # Returns
    ///
    /// * `Ok(CapabilityRegistry)` - The registry, initialized.
    /// * `Err(RegistryError::SourceUnavailable)` - If the read failed. No
    ///   partial state is retained and no retry is attempted.
    pub fn read_from(source: &dyn RegisterSource) -> Result<Self, RegistryError> {
        let mask = source.read()?;
        debug!("Capability register read: {:#010x}", mask);
        Ok(Self { mask })
    }

    /// The full 32-bit capability mask.
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Whether the capability at `bit` is present.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - `true` if the bit is set in the mask.
    /// * `Err(RegistryError::InvalidBit)` - If `bit` is 32 or greater.
    pub fn bit_present(&self, bit: u32) -> Result<bool, RegistryError> {
        if bit >= CAPABILITY_BITS {
            return Err(RegistryError::InvalidBit(bit));
        }
        Ok((self.mask >> bit) & 1 == 1)
    }
}
