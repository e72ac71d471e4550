//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users.
    ///
    /// `name` carries the `users_name_key` unique constraint.
    users (id) {
        /// Primary key: opaque identifier token.
        id -> Text,
        /// Display name (max 32 characters).
        name -> Varchar,
    }
}
