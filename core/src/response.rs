//! Parsed HTTP response model.
//!
//! # Design
//! A response is populated by exactly one parse pass over the stream:
//! status line, header block, then every remaining byte verbatim into the
//! body until the connection signals end-of-stream. No `Content-Length` or
//! `Transfer-Encoding` interpretation happens here — the peer is expected
//! to close its sending side after the body (callers send
//! `Connection: close`). Duplicate header names collapse to the last value
//! seen, one map slot per name.

use std::collections::BTreeMap;
use std::io::Read;

use tracing::warn;

use crate::error::NetError;
use crate::sockbuf::StreamBuf;
use crate::stream::RwStream;

/// One parsed HTTP/1.1 response: status, reason, headers, body.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    status: u16,
    reason: String,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl HttpResponse {
    /// Parse one response out of the stream.
    ///
    /// Skips the `HTTP/1.1` token up to the first space, extracts the
    /// numeric status code and the reason phrase, reads header lines until
    /// the empty line, then copies the remaining bytes into the body until
    /// end-of-stream. An unparseable status line reports
    /// [`NetError::Malformed`]; a header line without a colon is skipped.
    pub fn read_from<B: StreamBuf>(stream: &mut RwStream<'_, B>) -> Result<Self, NetError> {
        let status = read_status_code(stream)?;
        let reason = stream.read_line()?.unwrap_or_default();

        let mut headers = BTreeMap::new();
        while let Some(line) = stream.read_line()? {
            if line.is_empty() {
                break;
            }
            let Some(colon) = line.find(':') else {
                warn!(line = %line, "skipping header line without a colon");
                continue;
            };
            let name = line[..colon].to_string();
            let value = line[colon + 1..].trim_start_matches(' ').to_string();
            headers.insert(name, value);
        }

        let mut body = Vec::new();
        stream.read_to_end(&mut body)?;

        Ok(HttpResponse {
            status,
            reason,
            headers,
            body,
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Value of one header, exact case-sensitive name match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Lossy UTF-8 view of the body.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Consume `HTTP/1.1 <code> ` and return the code.
fn read_status_code<B: StreamBuf>(stream: &mut RwStream<'_, B>) -> Result<u16, NetError> {
    // Discard through the first space (the protocol-version token).
    loop {
        match stream.read_byte()? {
            Some(b' ') => break,
            Some(_) => continue,
            None => {
                return Err(NetError::Malformed(
                    "end of stream before the status code".to_string(),
                ))
            }
        }
    }

    let mut digits = String::new();
    while let Some(b) = stream.peek_byte()? {
        if !b.is_ascii_digit() {
            break;
        }
        digits.push(char::from(b));
        stream.read_byte()?;
    }
    let status = digits
        .parse::<u16>()
        .map_err(|_| NetError::Malformed(format!("invalid status code {digits:?}")))?;

    // The separator between code and reason phrase.
    stream.read_byte()?;
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sockbuf::SockBuf;
    use crate::test_support::FakeConn;

    fn parse(input: &[u8]) -> Result<HttpResponse, NetError> {
        let mut buf = SockBuf::new(FakeConn::with_input(input));
        HttpResponse::read_from(&mut RwStream::new(&mut buf))
    }

    #[test]
    fn parses_status_headers_and_body() {
        let resp = parse(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello").unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.reason(), "OK");
        assert_eq!(resp.header("Content-Type"), Some("text/plain"));
        assert_eq!(resp.body(), b"hello");
        assert_eq!(resp.body_text(), "hello");
    }

    #[test]
    fn parses_response_without_headers_or_body() {
        let resp = parse(b"HTTP/1.1 204 No Content\r\n\r\n").unwrap();
        assert_eq!(resp.status(), 204);
        assert_eq!(resp.reason(), "No Content");
        assert!(resp.headers().is_empty());
        assert!(resp.body().is_empty());
    }

    #[test]
    fn header_value_starts_at_first_non_space_after_colon() {
        let resp = parse(b"HTTP/1.1 200 OK\r\nX-Padded:    spaced out\r\n\r\n").unwrap();
        assert_eq!(resp.header("X-Padded"), Some("spaced out"));
    }

    #[test]
    fn duplicate_header_keeps_last_value() {
        let resp =
            parse(b"HTTP/1.1 200 OK\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n\r\n").unwrap();
        assert_eq!(resp.header("Set-Cookie"), Some("b=2"));
        assert_eq!(resp.headers().len(), 1);
    }

    #[test]
    fn header_line_without_colon_is_skipped() {
        let resp = parse(b"HTTP/1.1 200 OK\r\ngarbage line\r\nX-Ok: yes\r\n\r\n").unwrap();
        assert_eq!(resp.header("X-Ok"), Some("yes"));
        assert_eq!(resp.headers().len(), 1);
    }

    #[test]
    fn body_is_read_until_end_of_stream() {
        let body: Vec<u8> = (0..5000u32).map(|i| (i % 199) as u8).collect();
        let mut input = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
        input.extend_from_slice(&body);
        let resp = parse(&input).unwrap();
        assert_eq!(resp.body(), &body[..]);
    }

    #[test]
    fn lf_only_framing_is_accepted() {
        let resp = parse(b"HTTP/1.1 404 Not Found\nX-Why: gone\n\nmissing").unwrap();
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.reason(), "Not Found");
        assert_eq!(resp.header("X-Why"), Some("gone"));
        assert_eq!(resp.body(), b"missing");
    }

    #[test]
    fn non_numeric_status_is_malformed() {
        let err = parse(b"HTTP/1.1 abc OK\r\n\r\n").unwrap_err();
        assert!(matches!(err, NetError::Malformed(_)));
    }

    #[test]
    fn truncated_status_line_is_malformed() {
        let err = parse(b"HTTP/1.1").unwrap_err();
        assert!(matches!(err, NetError::Malformed(_)));
    }

    #[test]
    fn empty_reason_phrase_is_allowed() {
        let resp = parse(b"HTTP/1.1 200 \r\n\r\n").unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.reason(), "");
    }
}
