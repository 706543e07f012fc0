//! In-memory transport used by unit tests across the crate.

use std::io::{self, Cursor, Read, Write};

use crate::sockbuf::Transport;

/// Scripted bidirectional transport: reads come from `input`, writes
/// accumulate in `output`.
pub struct FakeConn {
    pub input: Cursor<Vec<u8>>,
    pub output: Vec<u8>,
    pub shutdown_calls: usize,
    pub fail_shutdown: bool,
}

impl FakeConn {
    pub fn with_input(bytes: &[u8]) -> Self {
        FakeConn {
            input: Cursor::new(bytes.to_vec()),
            output: Vec::new(),
            shutdown_calls: 0,
            fail_shutdown: false,
        }
    }

    pub fn empty() -> Self {
        Self::with_input(&[])
    }
}

impl Read for FakeConn {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for FakeConn {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Transport for FakeConn {
    fn shutdown(&mut self) -> io::Result<()> {
        if self.fail_shutdown {
            return Err(io::Error::new(io::ErrorKind::Other, "scripted shutdown failure"));
        }
        self.shutdown_calls += 1;
        Ok(())
    }
}
