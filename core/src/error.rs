//! Error types for the netstream client.
//!
//! # Design
//! Connection establishment gets dedicated variants (`Resolve`, `Connect`)
//! because callers frequently distinguish "the name did not resolve" from
//! "every candidate address refused." Lifecycle misuse (`AlreadyOpen`,
//! `NotOpen`) is reported explicitly rather than left undefined. A
//! zero-length receive is never an error anywhere in this crate — it is the
//! end-of-stream condition, surfaced as `Ok(None)` / `Ok(false)` at the
//! byte and line level.

use std::fmt;
use std::io;

/// Errors returned by the socket buffer, connection buffer, and HTTP layer.
#[derive(Debug)]
pub enum NetError {
    /// The hostname resolved to zero usable addresses or the resolver errored.
    Resolve { host: String, detail: String },

    /// Every candidate address refused the connection.
    Connect { host: String },

    /// `open` was called on a buffer that already owns a connection. One
    /// open-then-close lifecycle per instance.
    AlreadyOpen,

    /// A protocol operation was attempted on an unopened, closed, or failed
    /// stream.
    NotOpen,

    /// A transport-level send, receive, or close failure.
    Io(io::Error),

    /// The response status line could not be parsed.
    Malformed(String),
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::Resolve { host, detail } => {
                write!(f, "failed to resolve {host}: {detail}")
            }
            NetError::Connect { host } => {
                write!(f, "no candidate address for {host} accepted the connection")
            }
            NetError::AlreadyOpen => write!(f, "connection is already open"),
            NetError::NotOpen => write!(f, "stream is not open"),
            NetError::Io(err) => write!(f, "transport error: {err}"),
            NetError::Malformed(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for NetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for NetError {
    fn from(err: io::Error) -> Self {
        // The stream wrappers box a NetError into io::Error to satisfy the
        // std::io traits; unwrap it here instead of nesting.
        match err.downcast::<NetError>() {
            Ok(net) => net,
            Err(err) => NetError::Io(err),
        }
    }
}
