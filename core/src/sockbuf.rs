//! Buffering adapter between a blocking transport and a character stream.
//!
//! # Design
//! `SockBuf` translates the buffered-I/O contract a stream expects into
//! blocking send/receive calls on one connected transport. It owns the
//! transport exclusively: the handle is released exactly once, on `close`
//! or on drop, and every operation after `close` reports `NotOpen` — there
//! is no way to re-enter a released handle.
//!
//! The refill/flush hooks are an explicit trait (`StreamBuf`) rather than
//! an open hierarchy: only one buffer variant exists in this crate, and the
//! trait doubles as the seam the stream wrappers and the request/response
//! models are written against.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};

use tracing::trace;

use crate::error::NetError;

/// Capacity of the read buffer and of the write buffer, in bytes.
pub const BUF_CAPACITY: usize = 1024;

/// One connected, bidirectional, blocking byte transport.
///
/// The "opaque socket handle" seam: production code uses `TcpStream`, tests
/// substitute in-memory transports.
pub trait Transport: Read + Write {
    /// Shut down both directions of the transport.
    fn shutdown(&mut self) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn shutdown(&mut self) -> io::Result<()> {
        match TcpStream::shutdown(self, Shutdown::Both) {
            // The peer may have shut the connection down first.
            Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

/// The buffered-I/O contract between a stream and its underlying connection.
///
/// `fill` refills the read window, `drain` transmits the pending write
/// buffer, `flush` is the explicit sync point. End-of-stream (a zero-length
/// receive) is reported as `Ok(false)` / an empty window, never as an error.
pub trait StreamBuf {
    /// Ensure the read window holds at least one byte, refilling from the
    /// transport if it is exhausted. Returns `Ok(false)` at end-of-stream.
    fn fill(&mut self) -> Result<bool, NetError>;

    /// The currently available read window, refilled if exhausted. Empty at
    /// end-of-stream.
    fn window(&mut self) -> Result<&[u8], NetError>;

    /// Mark `n` bytes of the read window as consumed.
    fn consume(&mut self, n: usize);

    /// Append bytes to the write buffer, draining to the transport whenever
    /// the buffer fills.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), NetError>;

    /// Transmit the entire pending write buffer.
    fn drain(&mut self) -> Result<(), NetError>;

    /// Drain, then flush the transport.
    fn flush(&mut self) -> Result<(), NetError>;

    /// Next byte without consuming it, `None` at end-of-stream.
    fn peek_byte(&mut self) -> Result<Option<u8>, NetError> {
        Ok(self.window()?.first().copied())
    }

    /// Next byte, consumed, `None` at end-of-stream.
    fn read_byte(&mut self) -> Result<Option<u8>, NetError> {
        match self.window()?.first().copied() {
            Some(b) => {
                self.consume(1);
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }
}

/// Fixed-capacity read/write buffering over one owned transport.
pub struct SockBuf<T: Transport> {
    conn: Option<T>,
    rbuf: [u8; BUF_CAPACITY],
    rpos: usize,
    rlen: usize,
    wbuf: [u8; BUF_CAPACITY],
    wlen: usize,
    eof: bool,
}

impl<T: Transport> SockBuf<T> {
    /// Wrap a freshly connected transport. Buffers start empty; no buffering
    /// ever spans two connections.
    pub fn new(conn: T) -> Self {
        SockBuf {
            conn: Some(conn),
            rbuf: [0; BUF_CAPACITY],
            rpos: 0,
            rlen: 0,
            wbuf: [0; BUF_CAPACITY],
            wlen: 0,
            eof: false,
        }
    }

    /// Whether the transport is still owned (not yet closed).
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Whether a receive has already reported end-of-stream.
    pub fn at_eof(&self) -> bool {
        self.eof && self.rpos >= self.rlen
    }

    /// Flush pending output, shut the transport down and release it.
    ///
    /// Idempotent: a second `close` is a no-op returning `Ok(())`. The
    /// handle is released even when the final flush or shutdown fails.
    pub fn close(&mut self) -> Result<(), NetError> {
        let Some(mut conn) = self.conn.take() else {
            return Ok(());
        };
        let pending = self.wlen;
        self.wlen = 0;
        if pending > 0 {
            conn.write_all(&self.wbuf[..pending])?;
            conn.flush()?;
        }
        conn.shutdown()?;
        trace!("transport released");
        Ok(())
    }

    /// Give up the transport without shutting it down, flushing pending
    /// output first. Mainly useful to inspect a test transport.
    pub fn into_inner(mut self) -> Option<T> {
        let _ = self.drain();
        self.conn.take()
    }

    fn conn_mut(&mut self) -> Result<&mut T, NetError> {
        self.conn.as_mut().ok_or(NetError::NotOpen)
    }
}

impl<T: Transport> StreamBuf for SockBuf<T> {
    fn fill(&mut self) -> Result<bool, NetError> {
        if self.rpos < self.rlen {
            return Ok(true);
        }
        if self.eof {
            return Ok(false);
        }
        let conn = self.conn.as_mut().ok_or(NetError::NotOpen)?;
        let n = loop {
            // One blocking receive per refill, up to capacity minus one.
            match conn.read(&mut self.rbuf[..BUF_CAPACITY - 1]) {
                Ok(n) => break n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(NetError::Io(err)),
            }
        };
        if n == 0 {
            // Peer closed its sending side: end-of-stream, not an error.
            self.eof = true;
            trace!("receive returned zero bytes, end of stream");
            return Ok(false);
        }
        self.rpos = 0;
        self.rlen = n;
        trace!(bytes = n, "read window refilled");
        Ok(true)
    }

    fn window(&mut self) -> Result<&[u8], NetError> {
        if !self.fill()? {
            return Ok(&[]);
        }
        Ok(&self.rbuf[self.rpos..self.rlen])
    }

    fn consume(&mut self, n: usize) {
        self.rpos = (self.rpos + n).min(self.rlen);
    }

    fn write_bytes(&mut self, mut bytes: &[u8]) -> Result<(), NetError> {
        while !bytes.is_empty() {
            if self.wlen == BUF_CAPACITY {
                self.drain()?;
            }
            let room = BUF_CAPACITY - self.wlen;
            let n = room.min(bytes.len());
            self.wbuf[self.wlen..self.wlen + n].copy_from_slice(&bytes[..n]);
            self.wlen += n;
            bytes = &bytes[n..];
        }
        Ok(())
    }

    fn drain(&mut self) -> Result<(), NetError> {
        if self.wlen == 0 {
            return Ok(());
        }
        let len = self.wlen;
        let conn = self.conn.as_mut().ok_or(NetError::NotOpen)?;
        // Loop until fully sent; a single send is not assumed to suffice.
        conn.write_all(&self.wbuf[..len])?;
        self.wlen = 0;
        trace!(bytes = len, "write buffer drained");
        Ok(())
    }

    fn flush(&mut self) -> Result<(), NetError> {
        self.drain()?;
        self.conn_mut()?.flush()?;
        Ok(())
    }
}

impl<T: Transport> Drop for SockBuf<T> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
