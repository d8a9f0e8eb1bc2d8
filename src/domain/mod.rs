//! Domain layer - aggregates, value objects, and ports

pub mod entity;
pub mod error;
pub mod user;

pub use entity::Timestamps;
pub use error::DomainError;
pub use user::{
    ConnectionStatus, Email, PasswordHash, Role, User, UserId, UserRepository,
    UserValidationError, Username,
};
