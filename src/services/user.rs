//! User service
//!
//! Implements business logic for user accounts:
//! - Registration with email normalization and uniqueness checks
//! - Token issuance (opaque session tokens with expiry)
//! - Session validation with lazy purging of expired tokens
//! - Profile updates (name, password)
//! - Superuser provisioning

use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{CreateUserInput, Session, UpdateProfileInput, User};
use crate::services::password::{hash_password, verify_password};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Default token lifetime in days
const DEFAULT_TOKEN_EXPIRATION_DAYS: i64 = 7;

/// Minimum accepted password length
const MIN_PASSWORD_LENGTH: usize = 5;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// User already exists
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Normalize an email address by lowercasing its domain part.
///
/// The local part is preserved as given; only the text after the final `@`
/// is lowercased. Strings without an `@` are returned unchanged.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// User service for account management and token authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    token_expiration_days: i64,
}

impl UserService {
    /// Create a new user service with the given repositories
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            token_expiration_days: DEFAULT_TOKEN_EXPIRATION_DAYS,
        }
    }

    /// Create a new user service with a custom token lifetime
    pub fn with_token_expiration(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        token_expiration_days: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            token_expiration_days,
        }
    }

    /// Register a new user.
    ///
    /// The email is normalized (domain lowercased) before storage and must
    /// be unique.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the email is empty/malformed or the password
    ///   is shorter than five characters
    /// - `UserExists` if the email is already registered
    pub async fn register(&self, input: CreateUserInput) -> Result<User, UserServiceError> {
        if input.email.trim().is_empty() {
            return Err(UserServiceError::ValidationError(
                "Email must not be empty".to_string(),
            ));
        }
        if !input.email.contains('@') {
            return Err(UserServiceError::ValidationError(
                "Email must be a valid address".to_string(),
            ));
        }
        if input.password.len() < MIN_PASSWORD_LENGTH {
            return Err(UserServiceError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let email = normalize_email(&input.email);

        if self
            .user_repo
            .get_by_email(&email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(UserServiceError::UserExists(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = User::new(email, input.name, password_hash);

        let created = self
            .user_repo
            .create(&user)
            .await
            .context("Failed to create user")?;

        Ok(created)
    }

    /// Create a superuser (staff account).
    ///
    /// Same as `register` but the resulting account carries the staff flag.
    pub async fn create_superuser(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, UserServiceError> {
        let mut user = self
            .register(CreateUserInput::new(email, "", password))
            .await?;

        user.is_staff = true;
        let updated = self
            .user_repo
            .update(&user)
            .await
            .context("Failed to promote superuser")?;

        Ok(updated)
    }

    /// Issue a token for the given credentials.
    ///
    /// # Errors
    ///
    /// `AuthenticationError` when the email is unknown, the password does
    /// not match, or the account is inactive.
    pub async fn issue_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, UserServiceError> {
        let user = self
            .user_repo
            .get_by_email(email)
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| {
                UserServiceError::AuthenticationError(
                    "Unable to authenticate with provided credentials".to_string(),
                )
            })?;

        let password_valid =
            verify_password(password, &user.password_hash).context("Failed to verify password")?;

        if !password_valid {
            return Err(UserServiceError::AuthenticationError(
                "Unable to authenticate with provided credentials".to_string(),
            ));
        }

        if !user.is_active {
            return Err(UserServiceError::AuthenticationError(
                "Account is inactive".to_string(),
            ));
        }

        let session = self.create_session(user.id).await?;
        Ok(session)
    }

    /// Validate a token and return its user.
    ///
    /// Expired tokens are deleted on sight and treated as missing. Users
    /// that have been deactivated since the token was issued are rejected.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>, UserServiceError> {
        let session = self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to look up session")?;

        let session = match session {
            Some(s) => s,
            None => return Ok(None),
        };

        if session.is_expired() {
            self.session_repo
                .delete(&session.id)
                .await
                .context("Failed to delete expired session")?;
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to load session user")?;

        Ok(user.filter(|u| u.is_active))
    }

    /// Update the profile of an authenticated user.
    ///
    /// Name and password can be changed independently; a new password is
    /// re-hashed before storage.
    pub async fn update_profile(
        &self,
        mut user: User,
        input: UpdateProfileInput,
    ) -> Result<User, UserServiceError> {
        if let Some(name) = input.name {
            user.name = name;
        }

        if let Some(password) = input.password {
            if password.len() < MIN_PASSWORD_LENGTH {
                return Err(UserServiceError::ValidationError(format!(
                    "Password must be at least {} characters",
                    MIN_PASSWORD_LENGTH
                )));
            }
            user.password_hash =
                hash_password(&password).context("Failed to hash password")?;
        }

        let updated = self
            .user_repo
            .update(&user)
            .await
            .context("Failed to update user")?;

        Ok(updated)
    }

    /// Delete all expired sessions (maintenance)
    pub async fn purge_expired_sessions(&self) -> Result<i64, UserServiceError> {
        let removed = self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to purge sessions")?;
        Ok(removed)
    }

    async fn create_session(&self, user_id: i64) -> Result<Session, UserServiceError> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + Duration::days(self.token_expiration_days),
            created_at: now,
        };

        let created = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        Ok(created)
    }
}
