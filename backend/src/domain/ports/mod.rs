//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod user_id_generator;
mod user_repository;

#[cfg(test)]
pub use user_id_generator::MockUserIdGenerator;
pub use user_id_generator::{UserIdGenerator, UuidUserIdGenerator};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
