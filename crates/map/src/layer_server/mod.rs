//! Local HTTP server handing the latest rendered layers to a map client.

mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use eyre::WrapErr;
use geojson::FeatureCollection;
use tokio::sync::{RwLock, oneshot};
use tokio::task::JoinHandle;

/// Latest published layer snapshot, shared between the single publisher and
/// any number of HTTP readers.
#[derive(Clone, Debug)]
pub struct LayerSnapshot(Arc<RwLock<FeatureCollection>>);

impl LayerSnapshot {
    pub fn new() -> Self {
        Self(Arc::new(RwLock::new(FeatureCollection {
            bbox: None,
            features: Vec::new(),
            foreign_members: None,
        })))
    }

    pub async fn publish(&self, layers: FeatureCollection) {
        tracing::debug!("publishing {} layers", layers.features.len());
        *self.0.write().await = layers;
    }

    pub async fn current(&self) -> FeatureCollection {
        self.0.read().await.clone()
    }
}

impl Default for LayerSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Serves `GET /layers.geojson` and `GET /health` until dropped.
pub struct LayerServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl LayerServer {
    /// Bind an ephemeral loopback port.
    pub async fn start(snapshot: LayerSnapshot) -> eyre::Result<Self> {
        Self::bind(SocketAddr::from(([127, 0, 0, 1], 0)), snapshot).await
    }

    pub async fn bind(addr: SocketAddr, snapshot: LayerSnapshot) -> eyre::Result<Self> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .wrap_err_with(|| format!("failed to bind layer server to {addr}"))?;
        let addr = listener
            .local_addr()
            .wrap_err("layer server has no local address")?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let app = routes::create_router(snapshot);

        let task = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(error) = served {
                tracing::error!("layer server stopped: {error}");
            }
        });
        tracing::info!("layer server listening on http://{addr}");

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn layers_url(&self) -> String {
        format!("http://{}/layers.geojson", self.addr)
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) -> eyre::Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await.wrap_err("layer server task failed")?;
        }
        Ok(())
    }
}

impl Drop for LayerServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
