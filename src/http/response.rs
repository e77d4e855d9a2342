//! HTTP response building module
//!
//! Every response leaving the likes endpoint goes through one of these
//! builders so the CORS header set is never missed.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use hyper::{Response, StatusCode};
use serde::Serialize;

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";

/// Body used when serialization itself fails
const FALLBACK_ERROR_BODY: &str = r#"{"error":"internal server error"}"#;

/// `{"likes": n}`
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LikesBody {
    pub likes: u64,
}

/// `{"error": "..."}`
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// `{"status": "..."}` for health checks
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusBody<'a> {
    pub status: &'a str,
}

/// Attach the CORS header set to `response`
fn with_cors(mut response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    response
}

/// Build a JSON response with CORS headers
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let (status, json) = match serde_json::to_string(body) {
        Ok(j) => (status, j),
        Err(e) => {
            log_build_error("JSON body", &e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                FALLBACK_ERROR_BODY.to_string(),
            )
        }
    };

    let response = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from(FALLBACK_ERROR_BODY)))
        });

    with_cors(response)
}

/// 200 `{"likes": n}`
pub fn build_likes_response(likes: u64) -> Response<Full<Bytes>> {
    build_json_response(StatusCode::OK, &LikesBody { likes })
}

/// `{"error": message}` with the given status
pub fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    build_json_response(status, &ErrorBody { error: message })
}

/// 204 preflight response: CORS headers, no body
pub fn build_preflight_response() -> Response<Full<Bytes>> {
    let response = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("204", &e);
            Response::new(Full::new(Bytes::new()))
        });

    with_cors(response)
}

/// Health check response
pub fn build_health_response(status: StatusCode, state: &str) -> Response<Full<Bytes>> {
    build_json_response(status, &StatusBody { status: state })
}

/// Log response build error
fn log_build_error(what: &str, error: &impl std::fmt::Display) {
    crate::logger::log_error(&format!("Failed to build {what} response: {error}"));
}

/// Collect a response body into a string
#[cfg(test)]
pub async fn body_string(response: Response<Full<Bytes>>) -> String {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
