//! HTTP response building module
//!
//! Builders for the dispatcher's two response shapes: the 404 lookup miss
//! and the invocation result body.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::controller::ResponseSketch;

/// Build 404 Not Found response
///
/// A lookup miss carries no payload; the status line is the whole signal.
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the dispatch response from an invocation result.
///
/// The body is the handler's textual return value (or the `"null"` fallback),
/// written without a trailing newline. Status and headers set through the
/// [`ResponseSketch`] take precedence over the configured defaults.
pub fn build_dispatch_response(
    body: String,
    content_type: &str,
    server_name: &str,
    sketch: &ResponseSketch,
) -> Response<Full<Bytes>> {
    let payload = Bytes::from(body);

    let mut builder = Response::builder()
        .status(sketch.status().unwrap_or(200))
        .header("Server", server_name)
        .header("Content-Length", payload.len());

    let mut has_content_type = false;
    for (name, value) in sketch.headers() {
        if name.eq_ignore_ascii_case("content-type") {
            has_content_type = true;
        }
        builder = builder.header(name.as_str(), value.as_str());
    }
    if !has_content_type {
        builder = builder.header("Content-Type", content_type);
    }

    builder
        .body(Full::new(payload.clone()))
        .unwrap_or_else(|e| {
            log_build_error("dispatch", &e);
            Response::new(Full::new(payload))
        })
}

/// Log response build error
fn log_build_error(kind: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {kind} response: {error}"));
}
