/*!
 * edgeflow Adapters
 *
 * This crate defines the protocol adapter contract for the edgeflow system:
 * configuration field metadata, the declarative description of configuration
 * types, adapter type information, tags, factories, lifecycle traits and factory
 * discovery. It also ships the built-in simulation adapter.
 */

#![warn(missing_docs)]

// Re-export core types
pub use edgeflow_core::prelude;

pub mod adapter;
pub mod adapters;
pub mod config_type;
pub mod discovery;
pub mod factory;
pub mod field;
pub mod information;
pub mod tag;

pub use adapter::{
    AdapterError, AdapterState, ConnectionStatus, DataPoint, DiscoveredNode, OperationOutcome,
    PollingProtocolAdapter, ProtocolAdapter, RuntimeStatus, WritingProtocolAdapter,
};
pub use config_type::{AdapterConfig, ConfigEnum, ConfigProperty, ConfigType, EnumType, ObjectType, ValueType};
pub use discovery::{FactoryProvider, FactoryRegistry, SharedFactoryRegistry, StaticFactoryProvider};
pub use factory::{AdapterFactoryInput, ProtocolAdapterFactory};
pub use field::{ConfigField, CustomAttribute, FieldFormat};
pub use information::{AdapterCapability, AdapterCategory, AdapterInformation, AdapterTag};
pub use tag::Tag;

/// edgeflow adapters crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Factories of the adapter types built into this crate
pub fn builtin_factories() -> Vec<std::sync::Arc<dyn ProtocolAdapterFactory>> {
    vec![std::sync::Arc::new(adapters::SimulationAdapterFactory::new())]
}
