//! Business logic layer for vidtube.

pub mod services;

pub use services::*;
