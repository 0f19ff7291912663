//! Send raw requests over a plain TCP stream.
//!
//! The core builds and parses the bytes; this module only connects to the
//! request's `Host`, writes, and reads until the server closes the
//! connection.

use std::time::Duration;

use inspector_core::{HttpRequest, HttpResponse, MessageError};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request has no Host header")]
    MissingHost,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no complete response within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Message(#[from] MessageError),
}

/// `host:port` to connect to; port 80 when the `Host` header has none.
pub fn authority(request: &HttpRequest) -> Result<String, ClientError> {
    let host = request
        .header_value("host")
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(ClientError::MissingHost)?;
    let has_port = host
        .rsplit_once(':')
        .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
    Ok(if has_port {
        host.to_string()
    } else {
        format!("{host}:80")
    })
}

/// Send `request` and read the whole response. Relies on the server closing
/// the connection, so requests should carry `Connection: close`.
pub async fn send(request: &HttpRequest, timeout: Duration) -> Result<HttpResponse, ClientError> {
    let authority = authority(request)?;
    tracing::debug!(
        authority = %authority,
        method = %request.method,
        target = %request.target,
        "Sending request"
    );

    let exchange = async {
        let mut stream = TcpStream::connect(&authority).await?;
        stream.write_all(&request.to_bytes()).await?;
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await?;
        Ok::<_, std::io::Error>(raw)
    };
    let raw = tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| ClientError::Timeout(timeout))??;

    let response = HttpResponse::parse(&String::from_utf8_lossy(&raw))?;
    tracing::debug!(status = response.status, bytes = raw.len(), "Response received");
    Ok(response)
}
