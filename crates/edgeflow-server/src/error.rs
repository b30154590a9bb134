/*!
 * Error types for the edgeflow server.
 */
use thiserror::Error;

/// Error type for server operations
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("Failed to bind {address}: {source}")]
    Bind {
        /// The requested address
        address: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serving failed
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),

    /// The server task ended abnormally
    #[error("Server task failed: {0}")]
    Task(String),
}

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ServerError>;
