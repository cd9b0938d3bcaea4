//! Server module
//!
//! Handles TCP connections and manages the accept loop. Each accepted
//! connection gets its own task and a dispatcher over the shared storage.

mod connection;

use crate::dispatch::Dispatcher;
use crate::store::Storage;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

pub use connection::Connection;

/// Run the server
///
/// Binds the TCP listener on the given address and processes incoming
/// connections until a listener-level error occurs.
pub async fn run(addr: &str, storage: Arc<Storage>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("EmberKV RESP server listening on {}", addr);

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("new connection from {}", peer);

        let dispatcher = Dispatcher::new(storage.clone());

        tokio::spawn(async move {
            let mut connection = Connection::new(socket);

            if let Err(e) = connection.handle(&dispatcher).await {
                error!("connection error from {}: {}", peer, e);
            }

            info!("connection closed: {}", peer);
        });
    }
}
