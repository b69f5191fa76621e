//! Shared utilities for integration testing.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;

use hsts_middleware::{AppConfig, HstsSettings, HttpServer};

/// A server running in the background until the handle is dropped.
pub struct RunningServer {
    pub addr: SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start an `HttpServer` on an ephemeral port with the given HSTS settings.
pub async fn start_server(settings: HstsSettings) -> RunningServer {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.hsts = settings;

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = server
            .run_with_shutdown(listener, async move {
                let _ = rx.await;
            })
            .await;
    });

    RunningServer {
        addr,
        _shutdown: tx,
    }
}
