//! User validation rules

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("User ID must be a hyphenated UUID v4")]
    InvalidIdFormat,

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Invalid email format")]
    InvalidEmailFormat,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username is too short. Minimum length is {0} characters")]
    UsernameTooShort(usize),

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("Username contains invalid character: '{0}'. Only letters, digits, and underscores are allowed")]
    InvalidUsernameCharacter(char),

    #[error("Password hash cannot be empty")]
    EmptyPasswordHash,

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),

    #[error("Invalid role: '{0}'. Must be one of: admin, user, moderator, guest")]
    InvalidRole(String),

    #[error("Invalid connection status: '{0}'. Must be 'connected' or 'disconnected'")]
    InvalidConnectionStatus(String),
}

pub(crate) const MAX_EMAIL_LENGTH: usize = 254;
pub(crate) const MIN_USERNAME_LENGTH: usize = 3;
pub(crate) const MAX_USERNAME_LENGTH: usize = 30;
pub(crate) const MIN_PASSWORD_LENGTH: usize = 8;
pub(crate) const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate a user ID
///
/// Rules:
/// - Cannot be empty or blank
/// - Must be a hyphenated UUID v4 (hex digits, version nibble `4`,
///   variant nibble in `[89ab]`), case-insensitive
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.trim().is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    let bytes = id.as_bytes();

    if bytes.len() != 36 {
        return Err(UserValidationError::InvalidIdFormat);
    }

    for (i, b) in bytes.iter().enumerate() {
        let ok = match i {
            8 | 13 | 18 | 23 => *b == b'-',
            14 => *b == b'4',
            19 => matches!(b.to_ascii_lowercase(), b'8' | b'9' | b'a' | b'b'),
            _ => b.is_ascii_hexdigit(),
        };

        if !ok {
            return Err(UserValidationError::InvalidIdFormat);
        }
    }

    Ok(())
}

/// Validate an email address (already trimmed by the caller)
///
/// Rules:
/// - Cannot be empty
/// - Maximum 254 characters
/// - `local@domain.tld` shape: exactly one `@`, no whitespace, and the
///   domain contains an interior dot with non-empty parts on both sides
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if email.chars().any(char::is_whitespace) {
        return Err(UserValidationError::InvalidEmailFormat);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(UserValidationError::InvalidEmailFormat);
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(UserValidationError::InvalidEmailFormat);
    }

    // The domain needs a dot with at least one character on each side.
    let has_interior_dot = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());

    if !has_interior_dot {
        return Err(UserValidationError::InvalidEmailFormat);
    }

    Ok(())
}

/// Validate a username
///
/// Rules:
/// - Cannot be empty
/// - Between 3 and 30 characters inclusive
/// - Only letters, digits, and underscores
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    if username.len() < MIN_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    for c in username.chars() {
        if !c.is_ascii_alphanumeric() && c != '_' {
            return Err(UserValidationError::InvalidUsernameCharacter(c));
        }
    }

    Ok(())
}

/// Validate a stored password hash
///
/// The hash is opaque to the domain; it only has to be non-empty after
/// trimming. Hashing itself happens in the infrastructure layer.
pub fn validate_password_hash(hash: &str) -> Result<(), UserValidationError> {
    if hash.trim().is_empty() {
        return Err(UserValidationError::EmptyPasswordHash);
    }

    Ok(())
}

/// Validate a plaintext password before hashing
///
/// Rules:
/// - Minimum 8 characters
/// - Maximum 128 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}
