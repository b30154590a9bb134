/*!
 * Router assembly and the listener task.
 */
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use edgeflow_schema::AdapterTypeRegistry;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api;
use crate::error::{Result, ServerError};
use crate::static_files::{self, StaticFiles};

/// State shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    registry: Arc<AdapterTypeRegistry>,
    static_files: Arc<StaticFiles>,
}

impl AppState {
    /// Create the state from its parts
    pub fn new(registry: AdapterTypeRegistry, static_files: StaticFiles) -> Self {
        Self {
            registry: Arc::new(registry),
            static_files: Arc::new(static_files),
        }
    }

    /// The adapter type registry
    pub fn registry(&self) -> Arc<AdapterTypeRegistry> {
        self.registry.clone()
    }

    /// The frontend bundle
    pub fn static_files(&self) -> &StaticFiles {
        &self.static_files
    }
}

/// The complete application: management API plus the frontend fallback
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(api::router())
        .fallback(static_files::serve)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A running server
#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<()>>,
}

impl ServerHandle {
    /// The bound address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.task
            .await
            .map_err(|e| ServerError::Task(e.to_string()))?
    }
}

/// Bind `address` and serve the application in a background task
pub async fn spawn_server(state: AppState, address: &str) -> Result<ServerHandle> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.to_string(),
            source,
        })?;
    let addr = listener.local_addr()?;
    let router = app_router(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let task: JoinHandle<Result<()>> = tokio::spawn(async move {
        info!(address = %addr, "adapter type server listening");
        if let Err(e) = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
        {
            error!(address = %addr, error = %e, "adapter type server exited with error");
            return Err(e.into());
        }
        info!(address = %addr, "adapter type server stopped");
        Ok(())
    });

    Ok(ServerHandle {
        addr,
        shutdown: Some(shutdown_tx),
        task,
    })
}
