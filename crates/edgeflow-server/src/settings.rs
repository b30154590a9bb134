/*!
 * Startup settings that are not plain configuration values.
 *
 * Frontend root resolution and the legacy `PORT` override.
 */
use std::path::{Path, PathBuf};

use edgeflow_core::config::ServerConfig;
use tracing::{debug, warn};

/// Frontend directory used when nothing else is found
pub const DEFAULT_FRONTEND_PATH: &str = "frontend/dist";

/// Directories searched for the frontend bundle, in order
pub const FRONTEND_CANDIDATES: [&str; 4] = [
    "frontend/dist",
    "testing/ui/frontend/dist",
    "../frontend/dist",
    "static",
];

/// Locate the frontend bundle relative to the working directory
pub fn resolve_frontend_root(configured: Option<&str>) -> PathBuf {
    resolve_frontend_root_from(Path::new("."), configured)
}

/// Locate the frontend bundle relative to `base`.
///
/// A configured directory wins; otherwise the first existing candidate. When
/// nothing exists the default path is returned, so requests answer `404`.
pub fn resolve_frontend_root_from(base: &Path, configured: Option<&str>) -> PathBuf {
    if let Some(configured) = configured.filter(|path| !path.trim().is_empty()) {
        let path = base.join(configured);
        if path.is_dir() {
            return path;
        }
        warn!("Configured frontend path {} not found, searching defaults", configured);
    }

    for candidate in FRONTEND_CANDIDATES {
        let path = base.join(candidate);
        if path.is_dir() {
            debug!("Using frontend at {}", path.display());
            return path;
        }
    }

    warn!("Frontend not found. Build it first, or set FRONTEND_PATH");
    base.join(DEFAULT_FRONTEND_PATH)
}

/// Apply a port given as text, e.g. from the `PORT` variable.
///
/// An unparsable value is logged and the configured port kept.
pub fn apply_port_override(server: &mut ServerConfig, port: Option<&str>) {
    let Some(raw) = port else {
        return;
    };
    match raw.trim().parse::<u16>() {
        Ok(port) => server.port = port,
        Err(_) => warn!("Invalid PORT value {:?}, using {}", raw, server.port),
    }
}
