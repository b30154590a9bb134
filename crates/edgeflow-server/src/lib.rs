/*!
 * edgeflow Server
 *
 * HTTP facade over the adapter type registry. It publishes the adapter type
 * descriptors as JSON and serves the configuration frontend as a single-page
 * application.
 */

#![warn(missing_docs)]

pub mod api;
pub mod error;
pub mod server;
pub mod settings;
pub mod static_files;

pub use api::ADAPTER_TYPES_PATH;
pub use error::{Result, ServerError};
pub use server::{app_router, spawn_server, AppState, ServerHandle};
pub use static_files::StaticFiles;

/// edgeflow server crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
