//! Entity reference generation and validation.
//!
//! Every stored entity is addressed by a fixed-width, lowercase hexadecimal
//! token. Externally supplied identifiers are validated through [`EntityId`]
//! before any query runs.

use std::fmt;

use uuid::Uuid;

use crate::{AppError, AppResult};

/// Length of an entity reference in characters.
pub const ENTITY_ID_LEN: usize = 32;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new entity reference: 32 lowercase hex characters.
    #[must_use]
    pub fn generate(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Generate an opaque bearer token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// A validated entity reference.
///
/// Construction only succeeds for well-formed references, so any `EntityId`
/// reaching the storage layer is safe to use in a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId(String);

impl EntityId {
    /// Validate an externally supplied identifier.
    ///
    /// Accepts exactly [`ENTITY_ID_LEN`] lowercase hex characters; anything
    /// else is rejected with [`AppError::Validation`] before touching storage.
    pub fn parse(input: &str) -> AppResult<Self> {
        let well_formed = input.len() == ENTITY_ID_LEN
            && input.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));

        if well_formed {
            Ok(Self(input.to_string()))
        } else {
            Err(AppError::Validation(format!("Invalid identifier: {input}")))
        }
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
