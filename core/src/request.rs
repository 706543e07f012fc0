//! In-memory HTTP request model and its wire serialization.
//!
//! # Design
//! A request is plain data: method, target URL, and a unique-keyed header
//! map. Header names match case-sensitively and a `BTreeMap` keeps the
//! serialized header order deterministic (ascending lexicographic) — HTTP
//! does not require an order, but byte-identical output does. Serialization
//! emits headers only; this model never frames a body.

use std::collections::BTreeMap;

use crate::error::NetError;
use crate::sockbuf::StreamBuf;
use crate::stream::RwStream;

/// An HTTP/1.1 request: method, URL, and headers.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: String,
    url: String,
    headers: BTreeMap<String, String>,
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRequest {
    /// `GET /` with no headers.
    pub fn new() -> Self {
        Self::with_method("GET", "/")
    }

    /// `GET` for the given URL.
    pub fn with_url(url: &str) -> Self {
        Self::with_method("GET", url)
    }

    pub fn with_method(method: &str, url: &str) -> Self {
        HttpRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: BTreeMap::new(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Set a header. Names are unique and case-sensitive; setting an
    /// existing name replaces its value.
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Serialize to the exact HTTP/1.1 wire form:
    ///
    /// ```text
    /// <METHOD> <URL> HTTP/1.1\r\n
    /// <Name>: <Value>\r\n        (key-sorted)
    /// \r\n
    /// ```
    ///
    /// Every line terminator flushes, so the request is fully drained to
    /// the transport when this returns.
    pub fn write_to<B: StreamBuf>(&self, stream: &mut RwStream<'_, B>) -> Result<(), NetError> {
        use std::io::Write;

        write!(stream, "{} {} HTTP/1.1", self.method, self.url)?;
        stream.end_line()?;
        for (name, value) in &self.headers {
            write!(stream, "{name}: {value}")?;
            stream.end_line()?;
        }
        stream.end_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sockbuf::SockBuf;
    use crate::test_support::FakeConn;

    fn serialize(req: &HttpRequest) -> Vec<u8> {
        let mut buf = SockBuf::new(FakeConn::empty());
        req.write_to(&mut RwStream::new(&mut buf)).unwrap();
        buf.into_inner().unwrap().output
    }

    #[test]
    fn round_trip_framing_is_byte_exact() {
        let mut req = HttpRequest::new();
        req.add_header("Host", "example.com");
        assert_eq!(serialize(&req), b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n");
    }

    #[test]
    fn default_request_is_get_root() {
        let req = HttpRequest::default();
        assert_eq!(req.method(), "GET");
        assert_eq!(req.url(), "/");
        assert_eq!(serialize(&req), b"GET / HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn headers_serialize_in_ascending_key_order() {
        let mut req = HttpRequest::with_url("/index.html");
        req.add_header("User-Agent", "netstream");
        req.add_header("Accept", "*/*");
        req.add_header("Host", "example.com");
        assert_eq!(
            serialize(&req),
            b"GET /index.html HTTP/1.1\r\n\
              Accept: */*\r\n\
              Host: example.com\r\n\
              User-Agent: netstream\r\n\
              \r\n"
        );
    }

    #[test]
    fn two_serializations_are_identical() {
        let mut req = HttpRequest::with_method("HEAD", "/status");
        req.add_header("Host", "example.com");
        req.add_header("Accept", "text/html");
        assert_eq!(serialize(&req), serialize(&req));
    }

    #[test]
    fn duplicate_header_name_keeps_last_value() {
        let mut req = HttpRequest::new();
        req.add_header("Host", "first.example");
        req.add_header("Host", "second.example");
        assert_eq!(serialize(&req), b"GET / HTTP/1.1\r\nHost: second.example\r\n\r\n");
    }

    #[test]
    fn header_names_match_case_sensitively() {
        let mut req = HttpRequest::new();
        req.add_header("host", "lower.example");
        req.add_header("Host", "upper.example");
        assert_eq!(req.headers().len(), 2);
    }
}
