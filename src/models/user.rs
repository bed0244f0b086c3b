//! User model
//!
//! This module defines the User entity for the Mercato catalog backend.
//! Users authenticate with their email address and own all catalog data
//! (articles, categories, attribute variants) they create.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing a registered account.
///
/// The email address is the login identifier and is unique across the
/// system. Staff users are created through superuser provisioning and have
/// no special API surface of their own; the flag is carried for parity with
/// administrative tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Email address (unique, login identifier)
    pub email: String,
    /// Display name
    pub name: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Whether the account may authenticate
    pub is_active: bool,
    /// Whether the account has staff privileges
    pub is_staff: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// Note: The password should already be hashed before calling this
    /// function. Use `services::password::hash_password()` to hash it.
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            email,
            name,
            password_hash,
            is_active: true,
            is_staff: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the account may authenticate
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Check if the account has staff privileges
    pub fn is_staff(&self) -> bool {
        self.is_staff
    }
}

/// Input for creating a new user (before password hashing)
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Plaintext password (will be hashed)
    pub password: String,
}

impl CreateUserInput {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password: password.into(),
        }
    }
}

/// Input for updating the authenticated user's profile
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    /// New display name (optional)
    pub name: Option<String>,
    /// New plaintext password (optional, will be hashed)
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new() {
        let user = User::new(
            "test@example.com".to_string(),
            "Test Name".to_string(),
            "hashed_password".to_string(),
        );

        assert_eq!(user.id, 0);
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.name, "Test Name");
        assert!(user.is_active);
        assert!(!user.is_staff);
    }

    #[test]
    fn test_user_serialization_skips_password_hash() {
        let user = User::new(
            "test@example.com".to_string(),
            "Test Name".to_string(),
            "secret_hash".to_string(),
        );

        let json = serde_json::to_string(&user).expect("Failed to serialize user");
        assert!(!json.contains("secret_hash"));
        assert!(json.contains("test@example.com"));
    }
}
