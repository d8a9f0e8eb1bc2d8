//! Value objects owned by the user aggregate
//!
//! Each type validates at construction and is immutable afterwards.
//! "Changing" a field means building a new value and handing it to the
//! aggregate through a setter.

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_email, validate_password_hash, validate_username, UserValidationError,
};

/// Email address, trimmed and folded to lower-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Create a new Email after trimming and validation
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        validate_email(trimmed)?;
        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Username - 3 to 30 characters, letters/digits/underscores
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Create a new Username after validation
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        validate_username(&value)?;
        Ok(Self(value))
    }

    /// Placeholder username assigned when none is supplied at creation
    pub fn generated() -> Self {
        Self(format!("guest_{}", chrono::Utc::now().timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Already-hashed password
///
/// The domain never sees plaintext; hashing happens in the infrastructure
/// layer before this value is built. Not serializable, never logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an existing hash after checking it is non-empty
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        validate_password_hash(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
    Moderator,
    Guest,
}

impl Role {
    /// Parse a role name, case-insensitively
    pub fn parse(value: &str) -> Result<Self, UserValidationError> {
        match value.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "guest" => Ok(Self::Guest),
            _ => Err(UserValidationError::InvalidRole(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Guest => "guest",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Self::User)
    }

    pub fn is_moderator(&self) -> bool {
        matches!(self, Self::Moderator)
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presence state of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionStatus {
    /// Parse a status name, case-insensitively
    pub fn parse(value: &str) -> Result<Self, UserValidationError> {
        match value.to_lowercase().as_str() {
            "connected" => Ok(Self::Connected),
            "disconnected" => Ok(Self::Disconnected),
            _ => Err(UserValidationError::InvalidConnectionStatus(
                value.to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }

    /// Whether the user is currently reachable
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
