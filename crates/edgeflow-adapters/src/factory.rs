/*!
 * Protocol adapter factories.
 *
 * A factory is the plugin entry point of one adapter type: it publishes the
 * type's information and creates adapter instances from a configuration.
 */
use std::fmt;
use std::sync::Arc;

use crate::adapter::{ProtocolAdapter, Result};
use crate::information::AdapterInformation;

/// Everything a factory needs to create one adapter instance
#[derive(Debug, Clone)]
pub struct AdapterFactoryInput {
    /// Id of the new instance
    pub adapter_id: String,
    /// Raw configuration, shaped like the adapter's configuration type
    pub config: serde_json::Value,
    /// Whether the instance should also write (southbound)
    pub writing_enabled: bool,
}

impl AdapterFactoryInput {
    /// Create a read-only input
    pub fn new<S: Into<String>>(adapter_id: S, config: serde_json::Value) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            config,
            writing_enabled: false,
        }
    }

    /// Enable writing
    pub fn with_writing(mut self, enabled: bool) -> Self {
        self.writing_enabled = enabled;
        self
    }
}

/// The factory of one protocol adapter type
pub trait ProtocolAdapterFactory: Send + Sync {
    /// Information about the adapter type
    fn information(&self) -> Arc<dyn AdapterInformation>;

    /// Create an adapter instance
    fn create_adapter(&self, input: AdapterFactoryInput) -> Result<Box<dyn ProtocolAdapter>>;

    /// Name identifying the implementation in logs
    fn implementation_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl fmt::Debug for dyn ProtocolAdapterFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtocolAdapterFactory")
            .field("implementation", &self.implementation_name())
            .finish()
    }
}
