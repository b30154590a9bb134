/*!
 * Adapter type registry.
 *
 * Enumerates the factories of a [`FactoryProvider`] and turns each into an
 * [`AdapterDescriptor`]. A factory that fails or panics is logged and left
 * out; only a failing provider fails the whole listing.
 */
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use edgeflow_adapters::discovery::FactoryProvider;
use edgeflow_adapters::factory::ProtocolAdapterFactory;
use edgeflow_core::error::panic_message;
use edgeflow_core::prelude::{component_span, operation_span, Span};
use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::descriptor::{AdapterDescriptor, DescriptorBuilder};
use crate::error::RegistryError;
use crate::generator::SchemaGenerator;

/// Descriptor list computed for one provider generation
#[derive(Debug, Clone)]
struct CachedDescriptors {
    generation: u64,
    descriptors: Arc<Vec<AdapterDescriptor>>,
}

/// Lists the adapter types a provider offers
pub struct AdapterTypeRegistry {
    provider: Arc<dyn FactoryProvider>,
    builder: DescriptorBuilder,
    cache_enabled: bool,
    cache: RwLock<Option<CachedDescriptors>>,
    span: Span,
}

impl AdapterTypeRegistry {
    /// Create a registry over the given provider
    pub fn new(provider: Arc<dyn FactoryProvider>) -> Self {
        let span = component_span("adapter-type-registry", None);
        Self {
            provider,
            builder: DescriptorBuilder::with_generator(SchemaGenerator::with_span(span.clone())),
            cache_enabled: false,
            cache: RwLock::new(None),
            span,
        }
    }

    /// Keep the computed list until the provider's generation changes
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Log in the given span
    pub fn with_span(mut self, span: Span) -> Self {
        self.builder = DescriptorBuilder::with_generator(SchemaGenerator::with_span(span.clone()));
        self.span = span;
        self
    }

    /// Whether descriptor caching is enabled
    pub fn is_cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Describe every adapter type the provider offers, in provider order
    pub fn list_descriptors(&self) -> Result<Arc<Vec<AdapterDescriptor>>, RegistryError> {
        let _entered = self.span.enter();
        let _operation = operation_span("list-descriptors", "adapter-type-registry").entered();

        // Read before enumerating, so a concurrent change leaves the entry stale rather than wrong
        let generation = self.provider.generation();
        if self.cache_enabled {
            if let Some(cached) = self.cache.read().as_ref() {
                if cached.generation == generation {
                    debug!("Serving {} cached adapter descriptors", cached.descriptors.len());
                    return Ok(cached.descriptors.clone());
                }
            }
        }

        let factories = panic::catch_unwind(AssertUnwindSafe(|| self.provider.factories()))
            .map_err(|payload| {
                RegistryError::discovery(format!("factory provider panicked: {}", panic_message(payload.as_ref())))
            })?
            .map_err(|e| RegistryError::discovery(e.to_string()))?;

        let descriptors = Arc::new(self.build_all(&factories));

        if descriptors.is_empty() {
            warn!("No protocol adapter factories found");
            warn!("Register adapter factories with the factory registry before starting the server");
        } else {
            let ids: Vec<&str> = descriptors.iter().map(|d| d.id.as_str()).collect();
            info!("Found {} adapter type(s): {}", descriptors.len(), ids.join(", "));
        }

        if self.cache_enabled {
            *self.cache.write() = Some(CachedDescriptors {
                generation,
                descriptors: descriptors.clone(),
            });
        }

        Ok(descriptors)
    }

    /// Drop the cached list
    pub fn invalidate(&self) {
        *self.cache.write() = None;
    }

    fn build_all(&self, factories: &[Arc<dyn ProtocolAdapterFactory>]) -> Vec<AdapterDescriptor> {
        let mut descriptors = Vec::with_capacity(factories.len());

        for factory in factories {
            let implementation = factory.implementation_name();
            match panic::catch_unwind(AssertUnwindSafe(|| self.builder.build(factory.as_ref()))) {
                Ok(Ok(descriptor)) => descriptors.push(descriptor),
                Ok(Err(e)) => {
                    error!(
                        implementation = implementation,
                        protocol_id = protocol_id_of(factory.as_ref()).as_deref().unwrap_or("<unknown>"),
                        "Error loading adapter factory {}: {}",
                        implementation,
                        e
                    );
                }
                Err(payload) => {
                    error!(
                        implementation = implementation,
                        protocol_id = protocol_id_of(factory.as_ref()).as_deref().unwrap_or("<unknown>"),
                        "Adapter factory {} panicked: {}",
                        implementation,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }

        descriptors
    }
}

/// The factory's protocol id, unless reading it panics as well
fn protocol_id_of(factory: &dyn ProtocolAdapterFactory) -> Option<String> {
    panic::catch_unwind(AssertUnwindSafe(|| factory.information().protocol_id().to_string())).ok()
}
