//! Password hashing using Argon2

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash as ParsedHash, PasswordHasher as Argon2PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Argon2,
};
use std::fmt::Debug;

use crate::domain::user::PasswordHash;
use crate::domain::DomainError;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a plaintext password into a domain password hash
    fn hash(&self, password: &str) -> Result<PasswordHash, DomainError>;

    /// Verify a plaintext password against a stored hash
    fn verify(&self, password: &str, hash: &PasswordHash) -> bool;
}

/// Argon2-based password hasher
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let encoded = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))?
            .to_string();

        PasswordHash::new(encoded).map_err(|e| DomainError::internal(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        let parsed = match ParsedHash::new(hash.as_str()) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).unwrap();

        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify("wrong_password", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = Argon2Hasher::new();
        let password = "my_secure_password";

        let hash1 = hasher.hash(password).unwrap();
        let hash2 = hasher.hash(password).unwrap();

        // Different salts yield different encodings
        assert_ne!(hash1, hash2);

        assert!(hasher.verify(password, &hash1));
        assert!(hasher.verify(password, &hash2));
    }

    #[test]
    fn test_verify_malformed_hash() {
        let hasher = Argon2Hasher::new();
        let bogus = PasswordHash::new("not_an_argon2_encoding").unwrap();

        assert!(!hasher.verify("password", &bogus));
    }
}
