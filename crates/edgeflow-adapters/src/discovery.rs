/*!
 * Factory discovery.
 *
 * A [`FactoryProvider`] enumerates the adapter factories available to the
 * process. [`StaticFactoryProvider`] wraps a fixed list; [`FactoryRegistry`]
 * accepts registrations at runtime and reports every change through its
 * generation counter and a broadcast channel.
 */
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::adapter::{AdapterError, Result};
use crate::factory::ProtocolAdapterFactory;

/// Source of adapter factories
pub trait FactoryProvider: Send + Sync {
    /// Enumerate the available factories
    fn factories(&self) -> Result<Vec<Arc<dyn ProtocolAdapterFactory>>>;

    /// Changes whenever the set of factories changes
    fn generation(&self) -> u64 {
        0
    }
}

/// A fixed set of factories
#[derive(Default)]
pub struct StaticFactoryProvider {
    factories: Vec<Arc<dyn ProtocolAdapterFactory>>,
}

impl StaticFactoryProvider {
    /// Create a provider over the given factories
    pub fn new(factories: Vec<Arc<dyn ProtocolAdapterFactory>>) -> Self {
        Self { factories }
    }

    /// A provider without factories
    pub fn empty() -> Self {
        Self::default()
    }
}

impl FromIterator<Arc<dyn ProtocolAdapterFactory>> for StaticFactoryProvider {
    fn from_iter<I: IntoIterator<Item = Arc<dyn ProtocolAdapterFactory>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl FactoryProvider for StaticFactoryProvider {
    fn factories(&self) -> Result<Vec<Arc<dyn ProtocolAdapterFactory>>> {
        Ok(self.factories.clone())
    }
}

/// Event types for the factory registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryRegistryEvent {
    /// A factory was registered under the protocol id
    FactoryRegistered(String),
    /// The factory with the protocol id was removed
    FactoryUnregistered(String),
}

/// Factory registry accepting registrations at runtime
pub struct FactoryRegistry {
    /// Registered factories in registration order
    factories: RwLock<Vec<Arc<dyn ProtocolAdapterFactory>>>,
    /// Bumped after every change
    generation: AtomicU64,
    /// Event sender for registry events
    event_sender: broadcast::Sender<FactoryRegistryEvent>,
}

/// A thread-safe reference to a factory registry
pub type SharedFactoryRegistry = Arc<FactoryRegistry>;

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FactoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        let (event_sender, _) = broadcast::channel(100);
        Self {
            factories: RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
            event_sender,
        }
    }

    /// Create an empty, shareable registry
    pub fn shared() -> SharedFactoryRegistry {
        Arc::new(Self::new())
    }

    /// Register a factory; its protocol id must not be registered yet
    pub fn register(&self, factory: Arc<dyn ProtocolAdapterFactory>) -> Result<()> {
        let protocol_id = factory.information().protocol_id().to_string();

        {
            let mut factories = self.factories.write();
            if factories
                .iter()
                .any(|existing| existing.information().protocol_id() == protocol_id)
            {
                return Err(AdapterError::AlreadyRegistered(protocol_id));
            }
            factories.push(factory);
            self.generation.fetch_add(1, Ordering::SeqCst);
        }

        let _ = self
            .event_sender
            .send(FactoryRegistryEvent::FactoryRegistered(protocol_id.clone()));
        info!("Registered adapter type {}", protocol_id);

        Ok(())
    }

    /// Remove the factory registered under `protocol_id`
    pub fn unregister(&self, protocol_id: &str) -> Result<Arc<dyn ProtocolAdapterFactory>> {
        let removed = {
            let mut factories = self.factories.write();
            let index = factories
                .iter()
                .position(|factory| factory.information().protocol_id() == protocol_id)
                .ok_or_else(|| AdapterError::NotRegistered(protocol_id.to_string()))?;
            let removed = factories.remove(index);
            self.generation.fetch_add(1, Ordering::SeqCst);
            removed
        };

        let _ = self
            .event_sender
            .send(FactoryRegistryEvent::FactoryUnregistered(protocol_id.to_string()));
        info!("Unregistered adapter type {}", protocol_id);

        Ok(removed)
    }

    /// Get a factory by protocol id.
    ///
    /// Falls back to a factory listing `protocol_id` among its legacy ids.
    pub fn get(&self, protocol_id: &str) -> Option<Arc<dyn ProtocolAdapterFactory>> {
        let factories = self.factories.read();
        factories
            .iter()
            .find(|factory| factory.information().protocol_id() == protocol_id)
            .or_else(|| {
                factories.iter().find(|factory| {
                    let info = factory.information();
                    let found = info.legacy_protocol_ids().iter().any(|id| *id == protocol_id);
                    if found {
                        debug!("Resolved legacy protocol id {} to {}", protocol_id, info.protocol_id());
                    }
                    found
                })
            })
            .cloned()
    }

    /// Protocol ids in registration order
    pub fn protocol_ids(&self) -> Vec<String> {
        self.factories
            .read()
            .iter()
            .map(|factory| factory.information().protocol_id().to_string())
            .collect()
    }

    /// Number of registered factories
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    /// Whether no factory is registered
    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }

    /// Subscribe to registry events
    pub fn subscribe(&self) -> broadcast::Receiver<FactoryRegistryEvent> {
        self.event_sender.subscribe()
    }
}

impl FactoryProvider for FactoryRegistry {
    fn factories(&self) -> Result<Vec<Arc<dyn ProtocolAdapterFactory>>> {
        let factories = self.factories.read().clone();
        debug!("Enumerated {} adapter factories", factories.len());
        Ok(factories)
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ProtocolAdapter;
    use crate::config_type::ConfigType;
    use crate::factory::AdapterFactoryInput;
    use crate::information::AdapterInformation;

    struct Info(&'static str);

    impl AdapterInformation for Info {
        fn protocol_id(&self) -> &str {
            self.0
        }

        fn protocol_name(&self) -> &str {
            self.0
        }

        fn display_name(&self) -> &str {
            self.0
        }

        fn configuration_type_northbound(&self) -> ConfigType {
            ConfigType::new("Empty")
        }
    }

    struct Factory(Arc<Info>);

    impl Factory {
        fn arc(id: &'static str) -> Arc<dyn ProtocolAdapterFactory> {
            Arc::new(Factory(Arc::new(Info(id))))
        }
    }

    impl ProtocolAdapterFactory for Factory {
        fn information(&self) -> Arc<dyn AdapterInformation> {
            self.0.clone()
        }

        fn create_adapter(&self, _input: AdapterFactoryInput) -> Result<Box<dyn ProtocolAdapter>> {
            Err(AdapterError::Unsupported("test factory".into()))
        }
    }

    #[test]
    fn test_static_provider() {
        let provider: StaticFactoryProvider = vec![Factory::arc("a"), Factory::arc("b")].into_iter().collect();
        assert_eq!(provider.factories().unwrap().len(), 2);
        assert_eq!(provider.generation(), 0);
        assert!(StaticFactoryProvider::empty().factories().unwrap().is_empty());
    }

    #[test]
    fn test_register_bumps_generation() {
        let registry = FactoryRegistry::new();
        assert!(registry.is_empty());
        let before = registry.generation();

        registry.register(Factory::arc("modbus")).unwrap();
        registry.register(Factory::arc("opcua")).unwrap();

        assert_eq!(registry.generation(), before + 2);
        assert_eq!(registry.protocol_ids(), vec!["modbus", "opcua"]);
        assert!(registry.get("opcua").is_some());
        assert!(registry.get("s7").is_none());
    }

    struct Renamed;

    impl AdapterInformation for Renamed {
        fn protocol_id(&self) -> &str {
            "modbus"
        }

        fn protocol_name(&self) -> &str {
            "Modbus TCP"
        }

        fn display_name(&self) -> &str {
            "Modbus"
        }

        fn configuration_type_northbound(&self) -> ConfigType {
            ConfigType::new("Empty")
        }

        fn legacy_protocol_ids(&self) -> &[&str] {
            &["modbus-tcp", "mb"]
        }
    }

    struct RenamedFactory;

    impl ProtocolAdapterFactory for RenamedFactory {
        fn information(&self) -> Arc<dyn AdapterInformation> {
            Arc::new(Renamed)
        }

        fn create_adapter(&self, _input: AdapterFactoryInput) -> Result<Box<dyn ProtocolAdapter>> {
            Err(AdapterError::Unsupported("test factory".into()))
        }
    }

    #[test]
    fn test_get_by_legacy_protocol_id() {
        let registry = FactoryRegistry::new();
        registry.register(Arc::new(RenamedFactory)).unwrap();
        registry.register(Factory::arc("mb")).unwrap();

        let found = registry.get("modbus-tcp").unwrap();
        assert_eq!(found.information().protocol_id(), "modbus");
        // a current id wins over a legacy one
        assert_eq!(registry.get("mb").unwrap().information().protocol_id(), "mb");
        assert_eq!(registry.protocol_ids(), vec!["modbus", "mb"]);
    }

    #[test]
    fn test_duplicate_protocol_id_rejected() {
        let registry = FactoryRegistry::new();
        registry.register(Factory::arc("modbus")).unwrap();
        let generation = registry.generation();

        let err = registry.register(Factory::arc("modbus")).unwrap_err();
        assert!(matches!(err, AdapterError::AlreadyRegistered(id) if id == "modbus"));
        assert_eq!(registry.generation(), generation);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let registry = FactoryRegistry::new();
        registry.register(Factory::arc("modbus")).unwrap();

        let removed = registry.unregister("modbus").unwrap();
        assert_eq!(removed.information().protocol_id(), "modbus");
        assert!(registry.is_empty());
        assert!(matches!(registry.unregister("modbus"), Err(AdapterError::NotRegistered(_))));
    }

    #[test]
    fn test_events() {
        let registry = FactoryRegistry::new();
        let mut events = registry.subscribe();

        registry.register(Factory::arc("modbus")).unwrap();
        registry.unregister("modbus").unwrap();

        assert_eq!(
            events.try_recv().unwrap(),
            FactoryRegistryEvent::FactoryRegistered("modbus".into())
        );
        assert_eq!(
            events.try_recv().unwrap(),
            FactoryRegistryEvent::FactoryUnregistered("modbus".into())
        );
    }
}
