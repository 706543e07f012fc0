//! Fixture HTTP server the netstream integration tests run against.
//!
//! Routes are chosen to exercise the client's buffering and parsing paths:
//! a small text body, a multi-kilobyte body that spans several read-buffer
//! refills, an empty 204 body, custom response headers, and a non-200
//! status with a distinctive reason phrase.

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::net::TcpListener;

/// Number of bytes served by the `/large` route. Comfortably larger than
/// the client's 1024-byte read buffer.
pub const LARGE_BODY_LEN: usize = 8192;

pub fn app() -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/large", get(large))
        .route("/empty", get(empty))
        .route("/headers", get(custom_headers))
        .route("/teapot", get(teapot))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Deterministic body for `/large`, also used by tests to verify content.
pub fn large_body() -> String {
    let mut body = String::with_capacity(LARGE_BODY_LEN + 16);
    let mut i = 0usize;
    while body.len() < LARGE_BODY_LEN {
        body.push_str(&format!("chunk {i:06} "));
        i += 1;
    }
    body.truncate(LARGE_BODY_LEN);
    body
}

async fn hello() -> &'static str {
    "hello from the mock server"
}

async fn large() -> String {
    large_body()
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn custom_headers() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::HeaderName::from_static("x-mock-server"), "netstream"),
        ],
        "ok",
    )
}

async fn teapot() -> impl IntoResponse {
    (StatusCode::IM_A_TEAPOT, "short and stout")
}
