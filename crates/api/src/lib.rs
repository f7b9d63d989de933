//! HTTP API layer for vidtube.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: users, videos, comments, tweets, likes, subscriptions,
//!   playlists, dashboard, healthcheck
//! - **Extractors**: authentication
//! - **Middleware**: bearer token resolution
//! - **Response**: the uniform `{status, message, data, success}` envelope
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod multipart;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
pub use response::ApiResponse;
