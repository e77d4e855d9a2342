//! Request routing dispatch module
//!
//! hyper entry point: mounts the likes endpoint and the health checks, and
//! writes the access log line for every request.

use crate::config::AppState;
use crate::handler::likes;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{REFERER, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode, Uri, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Key read by the readiness check
const READINESS_CHECK_KEY: &str = "likes:__readyz";

/// Main entry point for HTTP request handling
///
/// The request body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = route_request(&method, &uri, &state).await;

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version_label(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.referer = header_string(&req, REFERER);
        entry.user_agent = header_string(&req, USER_AGENT);
        entry.request_time = started.elapsed();
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path and configuration
async fn route_request(method: &Method, uri: &Uri, state: &AppState) -> Response<Full<Bytes>> {
    let routes = &state.config.routes;
    let path = uri.path();

    if routes.health.enabled {
        if path == routes.health.liveness_path {
            return http::build_health_response(StatusCode::OK, "ok");
        }
        if path == routes.health.readiness_path {
            return check_readiness(state).await;
        }
    }

    if path == routes.likes_path {
        return likes::handle_likes(method, uri, state.store.as_ref()).await;
    }

    http::build_error_response(StatusCode::NOT_FOUND, "not found")
}

/// Ready when the store answers a read
async fn check_readiness(state: &AppState) -> Response<Full<Bytes>> {
    match state.store.get(READINESS_CHECK_KEY).await {
        Ok(_) => http::build_health_response(StatusCode::OK, "ok"),
        Err(e) => {
            logger::log_warning(&format!("Readiness check failed: {e}"));
            http::build_health_response(StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

fn header_string<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
