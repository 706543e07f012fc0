//! Minimal blocking HTTP/1.1 client over a buffered socket stream.
//!
//! # Overview
//! Adapts one connected TCP socket into a buffered character stream and
//! layers a minimal HTTP/1.1 client on top: resolve and connect, write a
//! request with ordinary formatted output, read back a parsed response.
//! One blocking, single-use connection per [`HttpStream`].
//!
//! # Design
//! - [`SockBuf`] bridges blocking send/receive to the buffered-I/O contract
//!   ([`StreamBuf`]): fixed 1024-byte read and write buffers, refilled and
//!   drained on demand. A zero-length receive is end-of-stream, never an
//!   error.
//! - [`HttpBuf`] adds resolution and first-candidate-wins connection
//!   establishment; one open-then-close lifecycle per instance.
//! - The stream wrappers bind a buffer to `std::io` traits so generic
//!   formatted I/O works unmodified; HTTP's CRLF line discipline lives in
//!   [`stream::write_crlf`] and [`stream::read_line`].
//! - [`HttpRequest`] and [`HttpResponse`] are plain-data models with no
//!   ownership tie to the stream beyond a single write or read call.
//! - The response body is read until the peer closes its sending side —
//!   no `Content-Length` or chunked decoding — so callers should send a
//!   `Connection: close` header.
//!
//! ```no_run
//! use netstream_core::{HttpRequest, HttpStream};
//!
//! let mut stream = HttpStream::connect("example.com");
//! assert!(stream.is_open());
//!
//! let mut req = HttpRequest::new();
//! req.add_header("Host", "example.com");
//! req.add_header("Connection", "close");
//! stream.write_request(&req).unwrap();
//!
//! let resp = stream.read_response().unwrap();
//! println!("{} {}", resp.status(), resp.reason());
//! stream.close().unwrap();
//! ```

pub mod error;
pub mod httpbuf;
pub mod httpstream;
pub mod request;
pub mod response;
pub mod sockbuf;
pub mod stream;

#[cfg(test)]
mod test_support;

pub use error::NetError;
pub use httpbuf::HttpBuf;
pub use httpstream::{HttpStream, StreamState};
pub use request::HttpRequest;
pub use response::HttpResponse;
pub use sockbuf::{SockBuf, StreamBuf, Transport, BUF_CAPACITY};
pub use stream::{ReadStream, RwStream, WriteStream};
