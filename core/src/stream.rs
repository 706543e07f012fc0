//! Directional stream wrappers and the HTTP line discipline.
//!
//! # Design
//! The wrappers bind one `StreamBuf` to the standard I/O traits so generic
//! formatted operations (`write!`, `Read::read_to_end`, `BufRead`) work
//! unmodified against a network connection. They add no state of their own.
//! `RwStream` is a single concrete type exposing both directions over one
//! buffer reference — no diamond composition of the two one-way wrappers.
//!
//! HTTP/1.1 framing mandates CRLF line endings regardless of platform, so
//! line output goes through [`write_crlf`] (which also forces a flush) and
//! line input through [`read_line`], never through platform-newline helpers.

use std::io::{self, BufRead, Read, Write};

use crate::error::NetError;
use crate::sockbuf::StreamBuf;

/// Write the two-byte CRLF terminator and force a flush.
pub fn write_crlf<B: StreamBuf>(buf: &mut B) -> Result<(), NetError> {
    buf.write_bytes(b"\r\n")?;
    buf.flush()
}

/// Read one line, consuming but not returning its terminator.
///
/// CRLF counts as a single terminator (an LF directly after a consumed CR is
/// also consumed); a bare LF terminates a line on its own; end-of-stream
/// with nothing accumulated yields `Ok(None)`, and with a partial line
/// yields that partial line.
pub fn read_line<B: StreamBuf>(buf: &mut B) -> Result<Option<String>, NetError> {
    let mut line = String::new();
    loop {
        match buf.read_byte()? {
            None => {
                if line.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(line));
            }
            Some(b'\n') => return Ok(Some(line)),
            Some(b'\r') => {
                if buf.peek_byte()? == Some(b'\n') {
                    buf.read_byte()?;
                }
                return Ok(Some(line));
            }
            Some(b) => line.push(char::from(b)),
        }
    }
}

fn to_io(err: NetError) -> io::Error {
    io::Error::other(err)
}

/// Input-only view of a socket buffer.
pub struct ReadStream<'a, B: StreamBuf> {
    buf: &'a mut B,
}

impl<'a, B: StreamBuf> ReadStream<'a, B> {
    pub fn new(buf: &'a mut B) -> Self {
        ReadStream { buf }
    }

    /// Line input per the HTTP discipline, see [`read_line`].
    pub fn read_line(&mut self) -> Result<Option<String>, NetError> {
        read_line(self.buf)
    }
}

impl<B: StreamBuf> Read for ReadStream<'_, B> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        read_window_into(self.buf, out)
    }
}

impl<B: StreamBuf> BufRead for ReadStream<'_, B> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.buf.window().map_err(to_io)
    }

    fn consume(&mut self, n: usize) {
        self.buf.consume(n);
    }
}

/// Output-only view of a socket buffer.
pub struct WriteStream<'a, B: StreamBuf> {
    buf: &'a mut B,
}

impl<'a, B: StreamBuf> WriteStream<'a, B> {
    pub fn new(buf: &'a mut B) -> Self {
        WriteStream { buf }
    }

    /// Terminate the current line with CRLF and flush, see [`write_crlf`].
    pub fn end_line(&mut self) -> Result<(), NetError> {
        write_crlf(self.buf)
    }
}

impl<B: StreamBuf> Write for WriteStream<'_, B> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.write_bytes(bytes).map_err(to_io)?;
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buf.flush().map_err(to_io)
    }
}

/// Combined read/write view of one socket buffer.
pub struct RwStream<'a, B: StreamBuf> {
    buf: &'a mut B,
}

impl<'a, B: StreamBuf> RwStream<'a, B> {
    pub fn new(buf: &'a mut B) -> Self {
        RwStream { buf }
    }

    pub fn read_line(&mut self) -> Result<Option<String>, NetError> {
        read_line(self.buf)
    }

    pub fn end_line(&mut self) -> Result<(), NetError> {
        write_crlf(self.buf)
    }

    pub fn read_byte(&mut self) -> Result<Option<u8>, NetError> {
        self.buf.read_byte()
    }

    pub fn peek_byte(&mut self) -> Result<Option<u8>, NetError> {
        self.buf.peek_byte()
    }
}

impl<B: StreamBuf> Read for RwStream<'_, B> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        read_window_into(self.buf, out)
    }
}

impl<B: StreamBuf> BufRead for RwStream<'_, B> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.buf.window().map_err(to_io)
    }

    fn consume(&mut self, n: usize) {
        self.buf.consume(n);
    }
}

impl<B: StreamBuf> Write for RwStream<'_, B> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.write_bytes(bytes).map_err(to_io)?;
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buf.flush().map_err(to_io)
    }
}

fn read_window_into<B: StreamBuf>(buf: &mut B, out: &mut [u8]) -> io::Result<usize> {
    if out.is_empty() {
        return Ok(0);
    }
    let window = buf.window().map_err(to_io)?;
    let n = window.len().min(out.len());
    out[..n].copy_from_slice(&window[..n]);
    buf.consume(n);
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sockbuf::SockBuf;
    use crate::test_support::FakeConn;

    fn buf_over(input: &[u8]) -> SockBuf<FakeConn> {
        SockBuf::new(FakeConn::with_input(input))
    }

    #[test]
    fn read_line_splits_on_crlf() {
        let mut buf = buf_over(b"A\r\nB\r\n");
        assert_eq!(read_line(&mut buf).unwrap().as_deref(), Some("A"));
        assert_eq!(read_line(&mut buf).unwrap().as_deref(), Some("B"));
        assert_eq!(read_line(&mut buf).unwrap(), None);
    }

    #[test]
    fn read_line_accepts_bare_lf() {
        let mut buf = buf_over(b"A\nB\n");
        assert_eq!(read_line(&mut buf).unwrap().as_deref(), Some("A"));
        assert_eq!(read_line(&mut buf).unwrap().as_deref(), Some("B"));
        assert_eq!(read_line(&mut buf).unwrap(), None);
    }

    #[test]
    fn bare_cr_terminates_without_eating_next_byte() {
        let mut buf = buf_over(b"A\rB");
        assert_eq!(read_line(&mut buf).unwrap().as_deref(), Some("A"));
        assert_eq!(read_line(&mut buf).unwrap().as_deref(), Some("B"));
        assert_eq!(read_line(&mut buf).unwrap(), None);
    }

    #[test]
    fn partial_line_at_end_of_stream_is_returned() {
        let mut buf = buf_over(b"tail");
        assert_eq!(read_line(&mut buf).unwrap().as_deref(), Some("tail"));
        assert_eq!(read_line(&mut buf).unwrap(), None);
    }

    #[test]
    fn empty_line_is_distinct_from_end_of_data() {
        let mut buf = buf_over(b"\r\n");
        assert_eq!(read_line(&mut buf).unwrap().as_deref(), Some(""));
        assert_eq!(read_line(&mut buf).unwrap(), None);
    }

    #[test]
    fn end_line_emits_crlf_and_flushes() {
        let mut buf = SockBuf::new(FakeConn::empty());
        {
            let mut out = WriteStream::new(&mut buf);
            write!(out, "GET").unwrap();
            out.end_line().unwrap();
        }
        let conn = buf.into_inner().unwrap();
        assert_eq!(conn.output, b"GET\r\n");
    }

    #[test]
    fn read_stream_reads_to_end() {
        let payload: Vec<u8> = (0..2500u32).map(|i| (i % 253) as u8).collect();
        let mut buf = buf_over(&payload);
        let mut collected = Vec::new();
        ReadStream::new(&mut buf).read_to_end(&mut collected).unwrap();
        assert_eq!(collected, payload);
    }

    #[test]
    fn rw_stream_supports_both_directions() {
        let mut buf = buf_over(b"pong\r\n");
        let mut rw = RwStream::new(&mut buf);
        write!(rw, "ping").unwrap();
        rw.end_line().unwrap();
        assert_eq!(rw.read_line().unwrap().as_deref(), Some("pong"));
        let conn = buf.into_inner().unwrap();
        assert_eq!(conn.output, b"ping\r\n");
    }
}
