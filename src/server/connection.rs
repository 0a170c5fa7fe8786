//! TCP server that speaks the Kafka wire protocol: one task per connection.

use crate::config::ServerConfig;
use crate::error::{BrokerWireError, Result};
use crate::protocol::{read_frame, Dispatcher};
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Bind `config.addr` and serve until the process exits.
pub async fn run_server(dispatcher: Dispatcher, config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(&config.addr).await?;
    run_server_on_listener(dispatcher, config, listener).await
}

/// Serve on an existing listener (e.g. from bind("127.0.0.1:0")).
pub async fn run_server_on_listener(
    dispatcher: Dispatcher,
    config: ServerConfig,
    listener: TcpListener,
) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(
        apis = dispatcher.registry().len(),
        "brokerwire listening on {}", addr
    );
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(x) => x,
            Err(e) => {
                error!("accept error: {}", e);
                continue;
            }
        };
        let dispatcher = dispatcher.clone();
        let config = config.clone();
        tokio::spawn(async move {
            match handle_connection(&dispatcher, &config, stream, peer).await {
                Ok(()) => debug!(%peer, "connection closed"),
                Err(e) if e.is_framing() => warn!("connection {} sent a bad frame: {}", peer, e),
                Err(e) => error!("connection {} error: {}", peer, e),
            }
        });
    }
}

/// Read-dispatch-write loop for one connection. Returns when the peer closes;
/// framing, timeout and I/O errors end only this connection.
pub async fn handle_connection<S>(
    dispatcher: &Dispatcher,
    config: &ServerConfig,
    mut stream: S,
    peer: SocketAddr,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let next = read_frame(&mut stream, config.max_frame_bytes);
        let frame = match config.read_timeout {
            Some(limit) => tokio::time::timeout(limit, next)
                .await
                .map_err(|_| BrokerWireError::Timeout(limit))??,
            None => next.await?,
        };
        let Some(payload) = frame else {
            return Ok(());
        };

        let framed = {
            let span = tracing::info_span!("brokerwire.request", %peer, len = payload.len());
            let _entered = span.enter();
            let framed = dispatcher.respond(&payload)?;
            debug!(len = framed.len(), "response");
            framed
        };
        stream.write_all(&framed).await?;
        stream.flush().await?;
    }
}
