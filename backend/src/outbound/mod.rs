//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL-backed user repository using Diesel.
//!
//! Adapters translate between domain types and storage representations and
//! hold no business rules.

pub mod persistence;
