//! Socket buffer specialized for HTTP connection establishment.
//!
//! # Design
//! `HttpBuf` adds exactly one capability to [`SockBuf`]: resolving a target
//! host and connecting to the first reachable candidate address. Each
//! instance supports a single open-then-close lifecycle — reopening is an
//! explicit [`NetError::AlreadyOpen`], never a silent reuse of stale buffer
//! state. Buffers are created fresh with the connection, so no buffering
//! spans two connections.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use tracing::debug;

use crate::error::NetError;
use crate::sockbuf::SockBuf;

/// Default port when the target host names none.
const HTTP_PORT: u16 = 80;

/// A socket buffer that knows how to establish its own HTTP connection.
#[derive(Default)]
pub struct HttpBuf {
    buf: Option<SockBuf<TcpStream>>,
}

impl HttpBuf {
    /// An unconnected buffer; call [`open`](Self::open) before use.
    pub fn new() -> Self {
        HttpBuf { buf: None }
    }

    /// Resolve `host` and connect to the first reachable candidate.
    ///
    /// A bare hostname or address is resolved on the standard HTTP port;
    /// an explicit `host:port` (IPv6 literals bracketed) is honored.
    /// Candidates are tried in resolver order and the first successful
    /// connect wins. Zero candidates or a resolver error reports
    /// [`NetError::Resolve`] without attempting a connection; exhausting
    /// all candidates reports [`NetError::Connect`].
    pub fn open(&mut self, host: &str) -> Result<(), NetError> {
        if self.buf.is_some() {
            return Err(NetError::AlreadyOpen);
        }
        let target = if host.contains(':') {
            host.to_string()
        } else {
            format!("{host}:{HTTP_PORT}")
        };
        let candidates: Vec<SocketAddr> = target
            .to_socket_addrs()
            .map_err(|err| NetError::Resolve {
                host: host.to_string(),
                detail: err.to_string(),
            })?
            .collect();
        if candidates.is_empty() {
            return Err(NetError::Resolve {
                host: host.to_string(),
                detail: "resolver returned no addresses".to_string(),
            });
        }
        debug!(host, count = candidates.len(), "resolved candidate addresses");
        let conn = connect_first(host, &candidates)?;
        self.buf = Some(SockBuf::new(conn));
        Ok(())
    }

    /// Whether a connection is currently owned.
    pub fn is_open(&self) -> bool {
        matches!(&self.buf, Some(buf) if buf.is_open())
    }

    /// The owned socket buffer, or `NotOpen` before a successful `open` /
    /// after `close`.
    pub fn stream_buf(&mut self) -> Result<&mut SockBuf<TcpStream>, NetError> {
        match self.buf.as_mut() {
            Some(buf) if buf.is_open() => Ok(buf),
            _ => Err(NetError::NotOpen),
        }
    }

    /// Release the connection, see [`SockBuf::close`]. A never-opened or
    /// already-closed buffer closes as a no-op.
    pub fn close(&mut self) -> Result<(), NetError> {
        match self.buf.as_mut() {
            Some(buf) => buf.close(),
            None => Ok(()),
        }
    }
}

/// Attempt the candidates in order; first successful connect wins.
fn connect_first(host: &str, candidates: &[SocketAddr]) -> Result<TcpStream, NetError> {
    for addr in candidates {
        debug!(%addr, "attempting connection");
        match TcpStream::connect(addr) {
            Ok(conn) => {
                debug!(%addr, "connected");
                return Ok(conn);
            }
            Err(err) => {
                debug!(%addr, error = %err, "connect failed, trying next candidate");
            }
        }
    }
    Err(NetError::Connect {
        host: host.to_string(),
    })
}
