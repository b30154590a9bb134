/*!
 * Edgeflow Core
 *
 * This crate provides the ambient functionality shared by the edgeflow
 * crates: configuration loading, the core error type and logging setup.
 */

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod prelude;

/// Edgeflow core crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
