pub mod server_impl;

use bytes::BytesMut;
use eyre::WrapErr;
use std::future::Future;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, warn};

use crate::api::{error_response, match_routes};
use crate::application;
use crate::application::inspection;
use crate::config::Config;
use crate::domain::errors::RequestError;
use crate::infrastructure::server_impl::server::{frame_len, parse_http};
use crate::AnyResult;

const READ_CHUNK: usize = 2048;

/// The listening socket. Created once at startup and released when [InspectorServer::run_until]
/// returns.
#[derive(Debug)]
pub struct InspectorServer {
    listener: TcpListener,
}

impl InspectorServer {
    pub async fn bind(config: &Config) -> AnyResult<Self> {
        let listener = TcpListener::bind((config.host.as_str(), config.port))
            .await
            .wrap_err_with(|| format!("failed to bind {}", config.address()))?;

        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> AnyResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until `shutdown` resolves. Each connection gets its own task;
    /// in-flight ones are left to finish or be dropped with the runtime.
    pub async fn run_until<F>(self, shutdown: F) -> AnyResult<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((socket, peer)) => {
                        tokio::spawn(serve_connection(socket, peer));
                    }
                    Err(e) => warn!(error = %e, "failed to accept connection"),
                },
            }
        }

        Ok(())
    }
}

/// Reads exactly one request (head plus `Content-Length` bytes of body) off `reader`.
pub async fn read_request<R>(reader: &mut R) -> Result<BytesMut, RequestError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(READ_CHUNK);
    let mut expected = None;

    loop {
        if expected.is_none() {
            expected = frame_len(&buf)?;
        }
        if let Some(total) = expected {
            if buf.len() >= total {
                buf.truncate(total);
                return Ok(buf);
            }
            buf.reserve(total - buf.len());
        }

        if reader.read_buf(&mut buf).await? == 0 {
            return Err(RequestError::ConnectionClosed);
        }
    }
}

async fn serve_connection(mut socket: TcpStream, peer: SocketAddr) {
    let response = match read_request(&mut socket).await {
        Ok(buf) => match parse_http(&buf) {
            Ok(request) => {
                let routed = match_routes(&request, application::now());
                if let Some(log) = routed.inspection {
                    if let Err(e) = inspection::emit(&log) {
                        warn!(error = %e, "failed to write inspection log");
                    }
                }
                routed.response
            }
            Err(e) => {
                debug!(%peer, error = %e, "rejected request");
                error_response(&e)
            }
        },
        Err(e @ (RequestError::ConnectionClosed | RequestError::Io(_))) => {
            debug!(%peer, error = %e, "connection dropped");
            return;
        }
        Err(e) => {
            warn!(%peer, error = %e, "rejected request");
            error_response(&e)
        }
    };

    if let Err(e) = socket.write_all(&response.into_http()).await {
        debug!(%peer, error = %e, "failed to write response");
        return;
    }
    if let Err(e) = socket.shutdown().await {
        debug!(%peer, error = %e, "failed to shut down connection");
    }
}
