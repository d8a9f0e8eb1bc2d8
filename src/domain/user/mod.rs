//! User domain
//!
//! Value objects, the user aggregate, validation rules, and the
//! repository port.

mod entity;
mod repository;
mod validation;
mod values;

pub use entity::{User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_password, validate_password_hash, validate_user_id,
    validate_username, UserValidationError,
};
pub use values::{ConnectionStatus, Email, PasswordHash, Role, Username};
