//! User repository port

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId};
use super::values::Email;
use crate::domain::DomainError;

/// Persistence contract the user aggregate is saved and loaded through
///
/// Lookups return `Ok(None)` on absence; mutations (`update`, `delete`)
/// fail with [`DomainError::NotFound`] when no row matches the identity.
/// Implementations receive and return fully-formed aggregates, never raw
/// rows.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Find a user by their ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by their email address
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError>;

    /// List all users
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Insert a new user; fails with a conflict if the ID or email is taken
    async fn save(&self, user: &User) -> Result<(), DomainError>;

    /// Replace the mutable fields of an existing user
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    /// Delete a user by ID
    async fn delete(&self, id: &UserId) -> Result<(), DomainError>;

    /// Check whether an email is already registered
    async fn email_exists(&self, email: &Email) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
