//! HTTP protocol layer module
//!
//! Response builders and query parsing, independent of the likes logic.

pub mod query;
pub mod response;

// Re-export commonly used items
pub use query::get_query_param;
pub use response::{
    build_error_response, build_health_response, build_likes_response, build_preflight_response,
};
