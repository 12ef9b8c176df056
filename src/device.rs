//! Capability device lifecycle.
//!
//! Ties the pieces together the way a host attach/detach hook would: read the
//! register into a registry, publish the attribute set, hand out query
//! facades, and tear everything down on detach. The host serializes attach
//! and detach for a given instance; once attached, any number of concurrent
//! readers may use the facade and the published nodes without locks.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::attrs::AttributeSet;
use crate::config::DeviceConfig;
use crate::namespace::Namespace;
use crate::query::QueryFacade;
use crate::registry::CapabilityRegistry;
use crate::source::RegisterSource;

/// An attached capability device: the registry plus its published attributes.
pub struct CapabilityDevice {
    registry: Arc<CapabilityRegistry>,
    attributes: AttributeSet,
}

impl CapabilityDevice {
    /// Attach: read the capability register once and publish the attribute set.
    ///
    /// Any failure aborts the attach and leaves nothing published; the caller
    /// may retry the whole sequence.
    pub fn attach(
        config: &DeviceConfig,
        source: &dyn RegisterSource,
        namespace: Arc<dyn Namespace>,
    ) -> Result<Self> {
        config.validate().context("Invalid device configuration")?;

        let registry = Arc::new(
            CapabilityRegistry::read_from(source)
                .context("Failed to read capability register")?,
        );
        info!("Capability register value: {:#010x}", registry.mask());

        let facade = QueryFacade::attached(registry.clone());
        let attributes = AttributeSet::publish(&facade, namespace, &config.root_name)
            .context("Failed to publish capability attributes")?;

        info!("Capability device attached under root {}", config.root_name);
        Ok(Self {
            registry,
            attributes,
        })
    }

    /// Handle to the registry behind this device.
    pub fn registry(&self) -> Arc<CapabilityRegistry> {
        self.registry.clone()
    }

    /// A query facade for in-process callers.
    pub fn facade(&self) -> QueryFacade {
        QueryFacade::attached(self.registry.clone())
    }

    /// The published attribute set.
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Detach: tear down the attribute set. Idempotent.
    pub fn detach(&mut self) {
        self.attributes.teardown();
        info!("Capability device detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use crate::error::{Error, NamespaceError, RegistryError};
    use crate::namespace::InMemoryNamespace;
    use crate::source::{FixedRegister, UnmappedRegister};

    #[test]
    fn attach_publishes_and_serves_queries() {
        let ns = Arc::new(InMemoryNamespace::new());
        let device = CapabilityDevice::attach(
            &DeviceConfig::default(),
            &FixedRegister(0x0000_0013),
            ns.clone(),
        )
        .unwrap();

        let facade = device.facade();
        assert_eq!(facade.mask(), 0x0000_0013);
        assert!(facade.is_present(0));
        assert!(facade.is_present(4));
        assert!(!facade.is_present(5));

        assert_eq!(ns.node_count("hw_module"), Some(33));
    }

    #[test]
    fn attach_fails_cleanly_on_unreadable_register() {
        let ns = Arc::new(InMemoryNamespace::new());
        let result = CapabilityDevice::attach(&DeviceConfig::default(), &UnmappedRegister, ns.clone());

        let err = result.err().unwrap();
        assert_matches!(
            err.downcast_ref::<RegistryError>(),
            Some(RegistryError::SourceUnavailable(_))
        );
        // The attribute set was never constructed.
        assert_eq!(ns.root_count(), 0);
    }

    #[test]
    fn attach_fails_cleanly_on_occupied_root() {
        let ns = Arc::new(InMemoryNamespace::new());
        ns.create_root("hw_module").unwrap();

        let err = CapabilityDevice::attach(
            &DeviceConfig::default(),
            &FixedRegister(0),
            ns.clone(),
        )
        .err()
        .unwrap();
        assert_matches!(
            err.downcast_ref::<NamespaceError>(),
            Some(NamespaceError::RootExists(_))
        );
        // The pre-existing root is untouched, and nothing was added to it.
        assert_eq!(ns.node_count("hw_module"), Some(0));
    }

    #[test]
    fn attach_rejects_invalid_config() {
        let ns = Arc::new(InMemoryNamespace::new());
        let config = DeviceConfig {
            root_name: String::new(),
        };

        let err = CapabilityDevice::attach(&config, &FixedRegister(0), ns.clone())
            .err()
            .unwrap();
        assert_matches!(err.downcast_ref::<Error>(), Some(Error::Config(_)));
        assert_eq!(ns.root_count(), 0);
    }

    #[test]
    fn detach_is_idempotent_and_frees_the_namespace() {
        let ns = Arc::new(InMemoryNamespace::new());
        let mut device = CapabilityDevice::attach(
            &DeviceConfig::default(),
            &FixedRegister(0x0000_0001),
            ns.clone(),
        )
        .unwrap();

        device.detach();
        device.detach();

        assert_eq!(ns.root_count(), 0);
        // In-process queries still work after detach; only exposure is gone.
        assert_eq!(device.facade().mask(), 0x0000_0001);
    }
}
