//! Request handler module
//!
//! `likes` holds the endpoint logic; `router` adapts it to hyper.

pub mod likes;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
