/*!
 * Prelude module for Edgeflow Core.
 *
 * This module re-exports commonly used types and functions from the edgeflow core crate
 * to make them easier to import.
 */

// Re-export error types
pub use crate::error::{Error, Result};

// Re-export config types
pub use crate::config::{
    Config, ConfigBuilder, LoggingConfig, RuntimeConfig, ServerConfig, SharedConfig,
};

// Re-export logging helpers
pub use crate::logging::{component_span, operation_span, Span};
pub use tracing::{debug, error, info, trace, warn};
