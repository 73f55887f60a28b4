use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{debug, error, warn};

use crate::http::connection::Connection;
use crate::server::Server;

pub async fn run(server: Arc<Server>, listener: TcpListener) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                // Usually transient (e.g. out of file descriptors).
                warn!(error = %e, "failed to accept connection");
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };
        debug!("Accepted connection from {}", peer);

        let server = Arc::clone(&server);
        tokio::spawn(async move {
            let (reader, writer) = socket.into_split();
            let mut conn = Connection::new(server, reader, writer);
            if let Err(e) = conn.run().await {
                error!("Connection error from {}: {:#}", peer, e);
            }
        });
    }
}
