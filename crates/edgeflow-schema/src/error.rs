/*!
 * Error types for schema synthesis, descriptor building and the adapter-type registry.
 */
use thiserror::Error;

/// Synthesis failure for one configuration type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// An object type is reachable from itself
    #[error("Cyclic configuration type {type_name} (path: {path})")]
    CyclicType {
        /// The type that was reached twice
        type_name: String,
        /// The chain of types leading back to it
        path: String,
    },

    /// Two visible properties share a serialization name
    #[error("Duplicate property {property} in configuration type {type_name}")]
    DuplicateProperty {
        /// The type declaring the properties
        type_name: String,
        /// The shared serialization name
        property: String,
    },
}

/// Failure to describe one adapter type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// A required identity field is empty
    #[error("Adapter information is missing the {0}")]
    MissingField(&'static str),

    /// The configuration schema could not be generated
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Failure to list adapter types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The factory provider could not enumerate factories
    #[error("Adapter discovery failed: {0}")]
    Discovery(String),
}

impl RegistryError {
    /// Create a discovery error
    pub fn discovery<S: Into<String>>(msg: S) -> Self {
        RegistryError::Discovery(msg.into())
    }
}

/// Result type for schema synthesis
pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
