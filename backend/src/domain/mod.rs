//! Domain primitives, services and ports.
//!
//! Purpose: define the user aggregate, the uniqueness rule over display names,
//! and the use cases exposed to callers. Types are immutable; invariants are
//! documented on each type.
//!
//! Public surface:
//! - `User`, `UserId`, `DisplayName`: the aggregate and its value objects.
//! - `UserService`: display-name uniqueness checks.
//! - `UserApplicationService`: register, get, update and delete use cases.
//! - `UserApplicationError` / `ErrorCode`: typed failures for callers.

pub mod error;
pub mod ports;
pub mod user;
mod user_application_service;
mod user_service;

pub use self::error::{ErrorCode, UserApplicationError};
pub use self::user::{
    DISPLAY_NAME_MAX, DISPLAY_NAME_MIN, DisplayName, User, UserData, UserId, UserValidationError,
};
pub use self::user_application_service::{UpdateUserCommand, UserApplicationService};
pub use self::user_service::UserService;
