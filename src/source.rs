//! Register sources.
//!
//! The capability register itself lives in the host platform; this crate only
//! sees it as an opaque, readable 32-bit value. The [`RegisterSource`] trait
//! is that seam. The registry reads a source exactly once, at initialization.

use crate::error::RegistryError;

/// An opaque provider of a single 32-bit capability register value.
///
/// Implementations are expected to be cheap, bounded reads with no retries:
/// if the register cannot be read, the whole initialization attempt fails.
pub trait RegisterSource: Send + Sync {
    /// Read the 32-bit register value.
    ///
    /// # Returns
    ///
    /// * `Ok(u32)` - The register value.
    /// * `Err(RegistryError::SourceUnavailable)` - If the register cannot be read.
    fn read(&self) -> Result<u32, RegistryError>;
}

/// A register source backed by a fixed in-memory value.
///
/// This is the stand-in the host supplies after it has mapped and read the
/// physical register, and the source used throughout the tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedRegister(pub u32);

impl RegisterSource for FixedRegister {
    fn read(&self) -> Result<u32, RegistryError> {
        Ok(self.0)
    }
}

/// A register source that is never readable.
///
/// Models an unmapped or invalid register address; every read fails with
/// [`RegistryError::SourceUnavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnmappedRegister;

impl RegisterSource for UnmappedRegister {
    fn read(&self) -> Result<u32, RegistryError> {
        Err(RegistryError::SourceUnavailable(
            "register address is not mapped".to_string(),
        ))
    }
}
