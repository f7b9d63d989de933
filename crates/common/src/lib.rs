//! Common utilities and shared types for vidtube.
//!
//! This crate provides foundational components used across all vidtube crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: Fixed-width hex entity references via [`IdGenerator`]
//!   and validation via [`EntityId`]
//! - **Storage**: Media storage backends for uploaded files
//!
//! # Example
//!
//! ```no_run
//! use vidtube_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::{EntityId, IdGenerator};
pub use storage::{LocalMediaStorage, MediaStorage, StoredMedia, generate_storage_key};
