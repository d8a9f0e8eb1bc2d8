//! User service - application operations over the repository port

use std::sync::Arc;

use crate::domain::user::{
    validate_password, ConnectionStatus, Email, Role, User, UserId, UserRepository, Username,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub username: Option<String>,
    pub role: Option<String>,
}

/// Request for a partial update of a user
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// User service coordinating value-object construction, the aggregate,
/// and the repository port
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        let email = Email::new(request.email).map_err(|e| DomainError::validation(e.to_string()))?;

        validate_password(&request.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let username = request
            .username
            .map(Username::new)
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let role = request
            .role
            .as_deref()
            .map(Role::parse)
            .transpose()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.email_exists(&email).await? {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                email.as_str()
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::create(email, password_hash, username, role);

        self.repository.save(&user).await?;

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        self.repository.find_by_id(&user_id).await
    }

    /// Get a user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = Email::new(email).map_err(|e| DomainError::validation(e.to_string()))?;
        self.repository.find_by_email(&email).await
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.find_all().await
    }

    /// Apply a partial update to a user
    pub async fn update(&self, id: &str, request: UpdateUserRequest) -> Result<User, DomainError> {
        let mut user = self.get_existing(id).await?;

        if let Some(email) = request.email {
            let email = Email::new(email).map_err(|e| DomainError::validation(e.to_string()))?;

            if email != *user.email() {
                // The address may only move to this user if nobody else holds it
                if let Some(holder) = self.repository.find_by_email(&email).await? {
                    if holder.id() != user.id() {
                        return Err(DomainError::conflict(format!(
                            "Email '{}' is already registered",
                            email.as_str()
                        )));
                    }
                }

                user.set_email(email);
            }
        }

        if let Some(username) = request.username {
            let username =
                Username::new(username).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_username(username);
        }

        if let Some(password) = request.password {
            validate_password(&password).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_password(self.hasher.hash(&password)?);
        }

        if let Some(role) = request.role {
            let role = Role::parse(&role).map_err(|e| DomainError::validation(e.to_string()))?;
            user.set_role(role);
        }

        self.repository.update(&user).await?;

        Ok(user)
    }

    /// Mark a user as connected
    pub async fn connect(&self, id: &str) -> Result<User, DomainError> {
        self.set_connection(id, ConnectionStatus::Connected).await
    }

    /// Mark a user as disconnected
    pub async fn disconnect(&self, id: &str) -> Result<User, DomainError> {
        self.set_connection(id, ConnectionStatus::Disconnected)
            .await
    }

    /// Delete a user
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let user_id = UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        self.repository.delete(&user_id).await
    }

    /// Authenticate a user by email and password
    ///
    /// Returns `Ok(None)` on unknown email or password mismatch; the
    /// caller cannot distinguish the two.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let email = Email::new(email).map_err(|e| DomainError::validation(e.to_string()))?;

        let user = match self.repository.find_by_email(&email).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if !self.hasher.verify(password, user.password()) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    async fn set_connection(
        &self,
        id: &str,
        status: ConnectionStatus,
    ) -> Result<User, DomainError> {
        let mut user = self.get_existing(id).await?;

        match status {
            ConnectionStatus::Connected => user.connect(),
            ConnectionStatus::Disconnected => user.disconnect(),
        }

        self.repository.update(&user).await?;

        Ok(user)
    }

    async fn get_existing(&self, id: &str) -> Result<User, DomainError> {
        let user_id = UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        self.repository
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::user::password::Argon2Hasher;
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository, Argon2Hasher> {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2Hasher::new());
        UserService::new(repository, hasher)
    }

    fn make_request(email: &str, username: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: "secure_password123".to_string(),
            username: Some(username.to_string()),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_create_user() {
        let service = create_service();

        let user = service
            .create(make_request("new@example.com", "newuser"))
            .await
            .unwrap();

        assert_eq!(user.email().as_str(), "new@example.com");
        assert_eq!(user.username().as_str(), "newuser");
        assert_eq!(user.role(), Role::User);
        assert!(!user.is_connected());
        // Plaintext never stored
        assert_ne!(user.password().as_str(), "secure_password123");
    }

    #[tokio::test]
    async fn test_create_user_with_defaults() {
        let service = create_service();

        let request = CreateUserRequest {
            email: "guest@example.com".to_string(),
            password: "secure_password123".to_string(),
            username: None,
            role: None,
        };

        let user = service.create(request).await.unwrap();
        assert!(user.username().as_str().starts_with("guest_"));
    }

    #[tokio::test]
    async fn test_create_user_with_role() {
        let service = create_service();

        let request = CreateUserRequest {
            role: Some("ADMIN".to_string()),
            ..make_request("admin@example.com", "adminuser")
        };

        let user = service.create(request).await.unwrap();
        assert!(user.role().is_admin());
    }

    #[tokio::test]
    async fn test_create_user_invalid_email() {
        let service = create_service();

        let result = service
            .create(CreateUserRequest {
                email: "not-an-email".to_string(),
                password: "secure_password123".to_string(),
                username: None,
                role: None,
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_user_short_password() {
        let service = create_service();

        let result = service
            .create(CreateUserRequest {
                email: "short@example.com".to_string(),
                password: "short".to_string(),
                username: None,
                role: None,
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_user_invalid_role() {
        let service = create_service();

        let result = service
            .create(CreateUserRequest {
                role: Some("dev".to_string()),
                ..make_request("dev@example.com", "devuser")
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let service = create_service();

        service
            .create(make_request("dup@example.com", "firstuser"))
            .await
            .unwrap();

        let result = service
            .create(make_request("dup@example.com", "seconduser"))
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_get_by_id_and_email() {
        let service = create_service();

        let created = service
            .create(make_request("lookup@example.com", "lookup"))
            .await
            .unwrap();

        let by_id = service.get(created.id().as_str()).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let by_email = service
            .get_by_email("lookup@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id(), created.id());
    }

    #[tokio::test]
    async fn test_get_with_malformed_id() {
        let service = create_service();

        let result = service.get("not-a-uuid").await;
        assert!(matches!(result, Err(DomainError::InvalidId { .. })));
    }

    #[tokio::test]
    async fn test_update_fields() {
        let service = create_service();

        let created = service
            .create(make_request("before@example.com", "before"))
            .await
            .unwrap();

        let updated = service
            .update(
                created.id().as_str(),
                UpdateUserRequest {
                    email: Some("after@example.com".to_string()),
                    username: Some("after".to_string()),
                    role: Some("moderator".to_string()),
                    password: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email().as_str(), "after@example.com");
        assert_eq!(updated.username().as_str(), "after");
        assert!(updated.role().is_moderator());
        assert!(updated.updated_at() > created.updated_at());
    }

    #[tokio::test]
    async fn test_update_password_rehashes() {
        let service = create_service();

        let created = service
            .create(make_request("rehash@example.com", "rehash"))
            .await
            .unwrap();

        service
            .update(
                created.id().as_str(),
                UpdateUserRequest {
                    password: Some("another_password456".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let old = service
            .authenticate("rehash@example.com", "secure_password123")
            .await
            .unwrap();
        assert!(old.is_none());

        let new = service
            .authenticate("rehash@example.com", "another_password456")
            .await
            .unwrap();
        assert!(new.is_some());
    }

    #[tokio::test]
    async fn test_update_nonexistent_user() {
        let service = create_service();

        let result = service
            .update(UserId::generate().as_str(), UpdateUserRequest::default())
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_email_to_taken_address() {
        let service = create_service();

        service
            .create(make_request("holder@example.com", "holder"))
            .await
            .unwrap();
        let mover = service
            .create(make_request("mover@example.com", "mover"))
            .await
            .unwrap();

        let result = service
            .update(
                mover.id().as_str(),
                UpdateUserRequest {
                    email: Some("holder@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_email_to_same_address_is_noop() {
        let service = create_service();

        let created = service
            .create(make_request("same@example.com", "samesame"))
            .await
            .unwrap();

        let updated = service
            .update(
                created.id().as_str(),
                UpdateUserRequest {
                    email: Some("SAME@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email().as_str(), "same@example.com");
    }

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let service = create_service();

        let created = service
            .create(make_request("presence@example.com", "presence"))
            .await
            .unwrap();

        let connected = service.connect(created.id().as_str()).await.unwrap();
        assert!(connected.is_connected());

        let stored = service.get(created.id().as_str()).await.unwrap().unwrap();
        assert!(stored.is_connected());

        let disconnected = service.disconnect(created.id().as_str()).await.unwrap();
        assert!(!disconnected.is_connected());
    }

    #[tokio::test]
    async fn test_delete() {
        let service = create_service();

        let created = service
            .create(make_request("delete@example.com", "deleteme"))
            .await
            .unwrap();

        service.delete(created.id().as_str()).await.unwrap();

        let user = service.get(created.id().as_str()).await.unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_user() {
        let service = create_service();

        let result = service.delete(UserId::generate().as_str()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = create_service();

        service
            .create(make_request("auth@example.com", "authuser"))
            .await
            .unwrap();

        let ok = service
            .authenticate("auth@example.com", "secure_password123")
            .await
            .unwrap();
        assert!(ok.is_some());

        let wrong = service
            .authenticate("auth@example.com", "wrong_password")
            .await
            .unwrap();
        assert!(wrong.is_none());

        let unknown = service
            .authenticate("unknown@example.com", "secure_password123")
            .await
            .unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn test_list() {
        let service = create_service();

        service
            .create(make_request("one@example.com", "userone"))
            .await
            .unwrap();
        service
            .create(make_request("two@example.com", "usertwo"))
            .await
            .unwrap();

        let all = service.list().await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
