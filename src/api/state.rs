//! Application state for shared services

use std::sync::Arc;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::user::{
    CreateUserRequest, PasswordHasher, UpdateUserRequest, UserService,
};

/// Application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
}

/// Trait for user service operations, allowing handlers to stay agnostic
/// of the concrete repository and hasher types
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError>;
    async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn connect(&self, id: &str) -> Result<User, DomainError>;
    async fn disconnect(&self, id: &str) -> Result<User, DomainError>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        UserService::list(self).await
    }

    async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        UserService::create(self, request).await
    }

    async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError> {
        UserService::update(self, id, request).await
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        UserService::delete(self, id).await
    }

    async fn connect(&self, id: &str) -> Result<User, DomainError> {
        UserService::connect(self, id).await
    }

    async fn disconnect(&self, id: &str) -> Result<User, DomainError> {
        UserService::disconnect(self, id).await
    }
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserServiceTrait>) -> Self {
        Self { user_service }
    }
}
