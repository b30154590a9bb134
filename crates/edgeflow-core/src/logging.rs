/*!
 * Logging functionality for edgeflow.
 *
 * This module provides tracing setup and utilities for consistent logging
 * across the edgeflow crates.
 */
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Initialize the logging system from the logging section of the configuration.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_from_config(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json_format {
        registry
            .with(fmt::layer().json().with_target(config.with_target))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(config.with_target))
            .try_init()
    };

    result.map_err(|e| Error::runtime(format!("Failed to initialize logging: {}", e)))
}

/// A type alias for a tracing span
pub type Span = tracing::Span;

/// Create a new span for a component
///
/// # Arguments
///
/// * `name` - The name of the component
/// * `id` - An optional ID for the component instance
pub fn component_span(name: &str, id: Option<&str>) -> Span {
    match id {
        Some(id) => tracing::info_span!("component", name = %name, id = %id),
        None => tracing::info_span!("component", name = %name),
    }
}

/// Create a new span for an operation
///
/// # Arguments
///
/// * `name` - The name of the operation
/// * `component` - The component performing the operation
pub fn operation_span(name: &str, component: &str) -> Span {
    tracing::info_span!("operation", name = %name, component = %component)
}
