//! Likes endpoint
//!
//! Transport-agnostic core: takes the method, the request URI and the store,
//! and always produces exactly one response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode, Uri};

use crate::counter::{self, LikeCount};
use crate::http;
use crate::logger;
use crate::store::{KvStore, StoreError};

pub const MISSING_SLUG_MESSAGE: &str = "slug query parameter is required";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "method not allowed";
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// What the endpoint was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikesAction {
    Read,
    Increment,
}

/// Handle one request to the likes endpoint
pub async fn handle_likes(
    method: &Method,
    uri: &Uri,
    store: &dyn KvStore,
) -> Response<Full<Bytes>> {
    if method == Method::OPTIONS {
        return http::build_preflight_response();
    }

    let slug = match http::get_query_param(uri.query(), "slug") {
        Some(slug) if !slug.is_empty() => slug,
        _ => return http::build_error_response(StatusCode::BAD_REQUEST, MISSING_SLUG_MESSAGE),
    };

    let action = match *method {
        Method::GET => LikesAction::Read,
        Method::POST => LikesAction::Increment,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            return http::build_error_response(
                StatusCode::METHOD_NOT_ALLOWED,
                METHOD_NOT_ALLOWED_MESSAGE,
            );
        }
    };

    match run_action(action, &slug, store).await {
        Ok(likes) => http::build_likes_response(likes),
        Err(e) => {
            logger::log_error(&format!("{method} likes for slug '{slug}' failed: {e}"));
            http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
        }
    }
}

async fn run_action(
    action: LikesAction,
    slug: &str,
    store: &dyn KvStore,
) -> Result<LikeCount, StoreError> {
    match action {
        LikesAction::Read => counter::get_likes(store, slug).await,
        LikesAction::Increment => counter::increment_likes(store, slug).await,
    }
}
