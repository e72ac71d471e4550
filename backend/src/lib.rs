//! User registry library.
//!
//! - `domain`: the user aggregate, uniqueness rule and application service.
//! - `outbound`: the PostgreSQL adapter for the user repository port.
//! - `config`: settings for wiring the adapter.

pub mod config;
pub mod domain;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
