//! Errors surfaced by the user application service.
//!
//! These errors are transport agnostic. Callers branch on the variant (or on
//! [`ErrorCode`] when only the category matters) and map it to their own
//! envelope: an exit status, a response body, a log line.

use serde::{Deserialize, Serialize};

use crate::domain::UserValidationError;
use crate::domain::ports::UserPersistenceError;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The input failed value object validation.
    InvalidRequest,
    /// The requested display name is held by another user.
    Conflict,
    /// The referenced user does not exist.
    NotFound,
    /// Storage failed while serving the request.
    InternalError,
}

impl ErrorCode {
    /// Snake-case identifier matching the serialised form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::InternalError => "internal_error",
        }
    }
}

/// Failure modes of the user application service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserApplicationError {
    /// A primitive argument could not be turned into a value object.
    #[error("invalid input: {0}")]
    Validation(#[from] UserValidationError),
    /// Another user already holds the requested display name.
    #[error("display name is already taken: {name}")]
    DuplicateName { name: String },
    /// No user exists with the given identifier.
    #[error("user not found: {id}")]
    NotFound { id: String },
    /// The repository reported a storage failure; passed through unchanged.
    #[error(transparent)]
    Persistence(#[from] UserPersistenceError),
}

impl UserApplicationError {
    /// Convenience constructor for [`UserApplicationError::DuplicateName`].
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Convenience constructor for [`UserApplicationError::NotFound`].
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Failure category for callers that do not need the full variant.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::InvalidRequest,
            Self::DuplicateName { .. } => ErrorCode::Conflict,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Persistence(_) => ErrorCode::InternalError,
        }
    }
}
