//! User aggregate and its identifier

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_user_id, UserValidationError};
use super::values::{ConnectionStatus, Email, PasswordHash, Role, Username};
use crate::domain::entity::Timestamps;

/// User identifier - a hyphenated UUID v4, normalized to lower-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        validate_user_id(&id)?;
        Ok(Self(id.to_lowercase()))
    }

    /// Generate a fresh identifier from a cryptographically random UUID v4
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User aggregate root
///
/// Owns one of each value object. Identity never changes after
/// construction; every mutator refreshes the last-update timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: Email,
    username: Username,
    password: PasswordHash,
    role: Role,
    status: ConnectionStatus,
    timestamps: Timestamps,
}

impl User {
    /// Create a new user with a fresh identity
    ///
    /// Defaults: a `guest_<millis>` username, role `user`, status
    /// `disconnected`, and `created_at == updated_at == now`.
    pub fn create(
        email: Email,
        password: PasswordHash,
        username: Option<Username>,
        role: Option<Role>,
    ) -> Self {
        Self {
            id: UserId::generate(),
            email,
            username: username.unwrap_or_else(Username::generated),
            password,
            role: role.unwrap_or_default(),
            status: ConnectionStatus::Disconnected,
            timestamps: Timestamps::now(),
        }
    }

    /// Rebuild a user from persisted values
    ///
    /// Used only by persistence adapters; nothing is regenerated or
    /// defaulted.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: UserId,
        email: Email,
        username: Username,
        password: PasswordHash,
        role: Role,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        status: ConnectionStatus,
    ) -> Self {
        Self {
            id,
            email,
            username,
            password,
            role,
            status,
            timestamps: Timestamps::from_parts(created_at, updated_at),
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &PasswordHash {
        &self.password
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.timestamps.created_at()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps.updated_at()
    }

    /// Whether the user is currently reachable
    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    // Mutators

    /// Mark the user as connected
    pub fn connect(&mut self) {
        self.status = ConnectionStatus::Connected;
        self.timestamps.touch();
    }

    /// Mark the user as disconnected
    pub fn disconnect(&mut self) {
        self.status = ConnectionStatus::Disconnected;
        self.timestamps.touch();
    }

    /// Replace the email
    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.timestamps.touch();
    }

    /// Replace the username
    pub fn set_username(&mut self, username: Username) {
        self.username = username;
        self.timestamps.touch();
    }

    /// Replace the password hash
    pub fn set_password(&mut self, password: PasswordHash) {
        self.password = password;
        self.timestamps.touch();
    }

    /// Replace the role
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.timestamps.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::create(
            Email::new("test@example.com").unwrap(),
            PasswordHash::new("hashed_password").unwrap(),
            Some(Username::new("testuser").unwrap()),
            None,
        )
    }

    #[test]
    fn test_user_id_valid() {
        let id = UserId::new("936da01f-9abd-4d9d-80c7-02af85c822a8").unwrap();
        assert_eq!(id.as_str(), "936da01f-9abd-4d9d-80c7-02af85c822a8");
    }

    #[test]
    fn test_user_id_normalized_to_lowercase() {
        let id = UserId::new("936DA01F-9ABD-4D9D-80C7-02AF85C822A8").unwrap();
        assert_eq!(id.as_str(), "936da01f-9abd-4d9d-80c7-02af85c822a8");
    }

    #[test]
    fn test_user_id_invalid() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("not-a-uuid").is_err());
        assert!(UserId::new("936da01f-9abd-1d9d-80c7-02af85c822a8").is_err());
    }

    #[test]
    fn test_generated_ids_are_valid_and_unique() {
        let a = UserId::generate();
        let b = UserId::generate();

        assert_ne!(a, b);
        assert!(UserId::new(a.as_str()).is_ok());
    }

    #[test]
    fn test_user_creation_defaults() {
        let user = User::create(
            Email::new("new@example.com").unwrap(),
            PasswordHash::new("hash").unwrap(),
            None,
            None,
        );

        assert!(user.username().as_str().starts_with("guest_"));
        assert_eq!(user.role(), Role::User);
        assert!(!user.is_connected());
        assert_eq!(user.created_at(), user.updated_at());
    }

    #[test]
    fn test_user_creation_with_explicit_values() {
        let user = User::create(
            Email::new("admin@example.com").unwrap(),
            PasswordHash::new("hash").unwrap(),
            Some(Username::new("admin_1").unwrap()),
            Some(Role::Admin),
        );

        assert_eq!(user.username().as_str(), "admin_1");
        assert!(user.role().is_admin());
    }

    #[test]
    fn test_connect_and_disconnect() {
        let mut user = create_test_user();

        user.connect();
        assert!(user.is_connected());
        assert_eq!(user.connection_status(), ConnectionStatus::Connected);

        user.disconnect();
        assert!(!user.is_connected());
        assert_eq!(user.connection_status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_setters_advance_updated_at() {
        let mut user = create_test_user();
        let created = user.created_at();
        let original_updated = user.updated_at();

        // Small delay to ensure timestamp differs
        std::thread::sleep(std::time::Duration::from_millis(10));

        user.set_email(Email::new("other@example.com").unwrap());
        assert_eq!(user.email().as_str(), "other@example.com");
        assert!(user.updated_at() > original_updated);

        let after_email = user.updated_at();
        std::thread::sleep(std::time::Duration::from_millis(10));

        user.set_role(Role::Moderator);
        assert!(user.updated_at() > after_email);
        // Creation timestamp never moves
        assert_eq!(user.created_at(), created);
    }

    #[test]
    fn test_set_username_and_password() {
        let mut user = create_test_user();

        user.set_username(Username::new("renamed").unwrap());
        assert_eq!(user.username().as_str(), "renamed");

        user.set_password(PasswordHash::new("new_hash").unwrap());
        assert_eq!(user.password().as_str(), "new_hash");
    }

    #[test]
    fn test_reconstitute_round_trip() {
        let id = UserId::generate();
        let created_at = Utc::now() - chrono::Duration::days(7);
        let updated_at = Utc::now() - chrono::Duration::days(1);

        let user = User::reconstitute(
            id.clone(),
            Email::new("stored@example.com").unwrap(),
            Username::new("stored_user").unwrap(),
            PasswordHash::new("stored_hash").unwrap(),
            Role::Moderator,
            created_at,
            updated_at,
            ConnectionStatus::Connected,
        );

        assert_eq!(user.id(), &id);
        assert_eq!(user.email().as_str(), "stored@example.com");
        assert_eq!(user.username().as_str(), "stored_user");
        assert_eq!(user.password().as_str(), "stored_hash");
        assert_eq!(user.role(), Role::Moderator);
        assert_eq!(user.created_at(), created_at);
        assert_eq!(user.updated_at(), updated_at);
        assert!(user.is_connected());
    }
}
