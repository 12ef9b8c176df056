//! Error types for the hwcap crate.
//!
//! This module defines the error hierarchy used throughout the crate:
//! one enum per concern, plus a root [`Error`] that everything converts into.

use thiserror::Error;

/// Root error type for the hwcap crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Namespace error: {0}")]
    Namespace(#[from] NamespaceError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors related to the capability registry and its register source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The capability register could not be read at startup. Fatal to the
    /// whole initialization attempt; no retries.
    #[error("Capability register source unavailable: {0}")]
    SourceUnavailable(String),

    /// A strict query was made before any registry was initialized.
    #[error("Capability registry not initialized")]
    NotInitialized,

    /// A caller passed a bit index outside 0..32.
    #[error("Invalid capability bit index: {0}")]
    InvalidBit(u32),
}

/// Errors related to the exposed attribute namespace.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    #[error("Failed to create namespace root: {0}")]
    RootCreate(String),

    #[error("Namespace root already exists: {0}")]
    RootExists(String),

    #[error("Namespace root not found: {0}")]
    RootNotFound(String),

    #[error("Failed to create attribute node {node}: {reason}")]
    NodeCreate { node: String, reason: String },

    #[error("Attribute node already exists: {0}")]
    NodeExists(String),
}

/// Result type used throughout the hwcap crate.
pub type Result<T> = std::result::Result<T, Error>;
