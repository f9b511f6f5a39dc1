//! WebSocket listener - accepts connections and spawns one task each
//!
//! Connections share nothing but the read-only settings and a live
//! connection counter.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;

use crate::error::{Result, StreamError};
use crate::settings::Settings;
use crate::stream;

/// Counts connections whose streaming task is still running
#[derive(Clone, Debug, Default)]
pub struct ConnectionCounter(Arc<AtomicUsize>);

impl ConnectionCounter {
    pub fn active(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }

    fn enter(&self) -> ConnectionGuard {
        self.0.fetch_add(1, Ordering::Relaxed);
        ConnectionGuard(self.clone())
    }
}

/// Decrements the counter when the connection task ends, however it ends
struct ConnectionGuard(ConnectionCounter);

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        (self.0).0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Bound listener, ready to accept
pub struct Server {
    listener: TcpListener,
    settings: Arc<Settings>,
    connections: ConnectionCounter,
}

impl Server {
    /// Bind the listener from settings
    pub async fn bind(settings: Settings) -> Result<Self> {
        let listener = TcpListener::bind(settings.bind_addr()).await?;
        Ok(Self {
            listener,
            settings: Arc::new(settings),
            connections: ConnectionCounter::default(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle to the live connection count
    pub fn connections(&self) -> ConnectionCounter {
        self.connections.clone()
    }

    /// Accept connections forever
    pub async fn run(self) -> Result<()> {
        let addr = self.local_addr()?;
        log::info!("WebSocket is listening at: {}", self.settings.endpoint_url(addr));
        let ppg = self.settings.ppg();
        log::info!(
            "PPG at {} bpm ({:.3}s per beat), tick {:?}, oximeter every {:?}",
            ppg.heart_rate,
            ppg.period(),
            self.settings.tick_interval(),
            self.settings.oximeter_interval()
        );

        let mut next_id: u64 = 0;
        loop {
            let (tcp, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    log::error!("Failed to accept connection: {}", e);
                    continue;
                }
            };
            next_id += 1;

            let settings = Arc::clone(&self.settings);
            let connections = self.connections.clone();
            let guard = connections.enter();
            tokio::spawn(async move {
                handle_connection(tcp, peer, next_id, &settings, &connections).await;
                drop(guard);
            });
        }
    }
}

/// Handshake and stream one connection, logging how it ended
async fn handle_connection(
    tcp: TcpStream,
    peer: SocketAddr,
    id: u64,
    settings: &Settings,
    connections: &ConnectionCounter,
) {
    if let Err(e) = tcp.set_nodelay(true) {
        log::debug!("[conn {}] set_nodelay: {}", id, e);
    }

    let path = settings.path.as_str();
    let check_path =
        |req: &Request, resp: Response| -> std::result::Result<Response, ErrorResponse> {
            if req.uri().path() == path {
                return Ok(resp);
            }
            let body = format!("no endpoint at {}", req.uri().path());
            let mut reject = ErrorResponse::new(Some(body));
            *reject.status_mut() = StatusCode::NOT_FOUND;
            Err(reject)
        };

    let ws = match tokio_tungstenite::accept_hdr_async(tcp, check_path).await {
        Ok(ws) => ws,
        Err(e) => {
            log::warn!("[conn {}] handshake with {} rejected: {}", id, peer, e);
            return;
        }
    };
    log::info!(
        "[conn {}] WebSocket connection opened ({}, {} active)",
        id,
        peer,
        connections.active()
    );

    match stream::serve_connection(ws, id, settings).await {
        Ok(()) => log::info!("[conn {}] WebSocket connection closed", id),
        Err(StreamError::Transport(e)) => {
            log::info!("[conn {}] WebSocket connection lost: {}", id, e)
        }
        Err(e) => log::error!("[conn {}] WebSocket connection ended: {}", id, e),
    }
}
