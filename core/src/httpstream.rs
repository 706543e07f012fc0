//! The public HTTP stream: one blocking, single-use connection.
//!
//! # Design
//! `HttpStream` composes an [`HttpBuf`] with the combined read/write
//! wrapper and tracks an explicit lifecycle:
//!
//! ```text
//! Unopened --open ok--> Open --close--> Closed
//!     \--open err--> Failed      Open --transport/parse err--> Failed
//! ```
//!
//! No transition leaves `Failed` or `Closed` back to `Open`. Fallible
//! operations return `Result` and additionally record failure in the state,
//! so callers that prefer a check-after-use style can inspect
//! [`state`](HttpStream::state) instead of matching every error.

use tracing::{debug, warn};

use crate::error::NetError;
use crate::httpbuf::HttpBuf;
use crate::request::HttpRequest;
use crate::response::HttpResponse;
use crate::stream::RwStream;

/// Lifecycle of an [`HttpStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Unopened,
    Open,
    Closed,
    Failed,
}

/// A buffered HTTP/1.1 client connection.
pub struct HttpStream {
    buf: HttpBuf,
    state: StreamState,
}

impl Default for HttpStream {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpStream {
    /// An unopened stream; call [`open`](Self::open) before use.
    pub fn new() -> Self {
        HttpStream {
            buf: HttpBuf::new(),
            state: StreamState::Unopened,
        }
    }

    /// Open a connection to `host` immediately.
    ///
    /// Never panics or errors out of the constructor: on failure the
    /// returned stream is in [`StreamState::Failed`], which callers must
    /// check before use.
    pub fn connect(host: &str) -> Self {
        let mut stream = Self::new();
        if let Err(err) = stream.open(host) {
            warn!(host, error = %err, "connection failed");
        }
        stream
    }

    /// Open a connection to `host`, see [`HttpBuf::open`].
    ///
    /// Valid only from `Unopened`: an `Open` stream reports `AlreadyOpen`
    /// (without disturbing the live connection) and a `Closed` or `Failed`
    /// stream reports `NotOpen` — each instance is single-use.
    pub fn open(&mut self, host: &str) -> Result<(), NetError> {
        match self.state {
            StreamState::Unopened => {}
            StreamState::Open => return Err(NetError::AlreadyOpen),
            StreamState::Closed | StreamState::Failed => return Err(NetError::NotOpen),
        }
        match self.buf.open(host) {
            Ok(()) => {
                debug!(host, "stream open");
                self.state = StreamState::Open;
                Ok(())
            }
            Err(err) => {
                self.state = StreamState::Failed;
                Err(err)
            }
        }
    }

    /// Serialize `req` into the connection and flush it.
    pub fn write_request(&mut self, req: &HttpRequest) -> Result<(), NetError> {
        self.ensure_open()?;
        let buf = self.buf.stream_buf()?;
        let result = req.write_to(&mut RwStream::new(buf));
        self.record(result)
    }

    /// Parse one response out of the connection, reading the body until
    /// the peer closes its sending side.
    pub fn read_response(&mut self) -> Result<HttpResponse, NetError> {
        self.ensure_open()?;
        let buf = self.buf.stream_buf()?;
        let result = HttpResponse::read_from(&mut RwStream::new(buf));
        self.record(result)
    }

    /// Release the connection.
    ///
    /// Closing an already-`Closed` (or never-opened) stream is a
    /// deterministic no-op returning `Ok(())`. Closing a `Failed` stream
    /// releases any remaining connection but the state stays `Failed`. A
    /// release failure reports the error and sets `Failed`.
    pub fn close(&mut self) -> Result<(), NetError> {
        match self.state {
            StreamState::Closed => Ok(()),
            StreamState::Failed => {
                let _ = self.buf.close();
                Ok(())
            }
            StreamState::Unopened | StreamState::Open => match self.buf.close() {
                Ok(()) => {
                    debug!("stream closed");
                    self.state = StreamState::Closed;
                    Ok(())
                }
                Err(err) => {
                    self.state = StreamState::Failed;
                    Err(err)
                }
            },
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == StreamState::Open
    }

    pub fn is_failed(&self) -> bool {
        self.state == StreamState::Failed
    }

    fn ensure_open(&self) -> Result<(), NetError> {
        if self.state == StreamState::Open {
            Ok(())
        } else {
            Err(NetError::NotOpen)
        }
    }

    fn record<V>(&mut self, result: Result<V, NetError>) -> Result<V, NetError> {
        if result.is_err() {
            self.state = StreamState::Failed;
        }
        result
    }
}
