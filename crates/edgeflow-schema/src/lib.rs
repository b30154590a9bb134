/*!
 * edgeflow Schema
 *
 * This crate turns adapter configuration types into JSON Schema documents,
 * assembles adapter type descriptors and lists the adapter types offered by a
 * factory provider.
 *
 * Data flows one way: registry → descriptor builder → schema generator.
 */

#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod generator;
pub mod registry;

pub use descriptor::{AdapterDescriptor, DescriptorBuilder};
pub use error::{DescriptorError, RegistryError, SchemaError};
pub use generator::{SchemaGenerator, SCHEMA_DIALECT};
pub use registry::AdapterTypeRegistry;

/// edgeflow schema crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the schema system
pub fn init() -> Result<(), edgeflow_core::error::Error> {
    tracing::info!("edgeflow schema {} initialized", VERSION);
    Ok(())
}
