//! One-shot HTTP responder with control over body pacing and truncation.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Scripted response for a single connection.
pub(crate) struct RawResponse {
    /// Declared `Content-Length`; may exceed the bytes actually sent.
    pub(crate) content_length: usize,
    /// Body chunks, written in order.
    pub(crate) chunks: Vec<Vec<u8>>,
    /// Pause before each chunk.
    pub(crate) gap: Duration,
}

/// Accepts one connection on `listener`, answers with `response`, then closes.
pub(crate) fn serve_once(listener: TcpListener, response: RawResponse) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut request = Vec::new();
        let mut buf = [0_u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            response.content_length
        );
        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        for chunk in response.chunks {
            tokio::time::sleep(response.gap).await;
            if socket.write_all(&chunk).await.is_err() || socket.flush().await.is_err() {
                return;
            }
        }
        let _ = socket.shutdown().await;
    })
}
