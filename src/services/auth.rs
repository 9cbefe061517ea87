//! Authentication service implementation
//!
//! Handles credential registration and login, password hashing, JWT issuing
//! and verification, and resolution of a token back to a live user record.
//! There is no session store and no refresh rotation: a token stays valid
//! until its natural expiry.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::database::repositories::{GuestRepository, UserRepository};
use crate::models::user::{User, UserRole};
use crate::utils::errors::{EventFlowError, Result};

/// JWT claims carried by EventFlow tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Authentication service for account and token management
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    guests: GuestRepository,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(users: UserRepository, guests: GuestRepository, config: AuthConfig) -> Self {
        Self {
            users,
            guests,
            config,
        }
    }

    /// Register a new account with email and password
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        debug!(email = %email, "Registering new user");

        if self.users.find_by_email(email).await?.is_some() {
            return Err(EventFlowError::EmailExists(email.to_string()));
        }

        let password_hash = hash_password(password)?;
        let user = self
            .users
            .create(name, email, Some(&password_hash), UserRole::User)
            .await?;

        // Claim any guest invitations sent to this address before signup.
        let linked = self.guests.link_user_by_email(user.id, email).await?;
        info!(user_id = user.id, linked_guests = linked, "New user registered");

        Ok(user)
    }

    /// Verify credentials and return the account
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        debug!(email = %email, "Login attempt");

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(EventFlowError::InvalidCredentials)?;

        let stored_hash = user
            .password_hash
            .as_deref()
            .ok_or(EventFlowError::InvalidCredentials)?;

        if !verify_password(password, stored_hash)? {
            warn!(user_id = user.id, "Login failed: bad password");
            return Err(EventFlowError::InvalidCredentials);
        }

        if user.is_banned {
            warn!(user_id = user.id, "Login refused: account banned");
            return Err(EventFlowError::AccountBanned);
        }

        info!(user_id = user.id, "User logged in");
        Ok(user)
    }

    /// Log in or register via a verified Google identity
    pub async fn login_or_register_google(&self, name: &str, email: &str) -> Result<User> {
        if let Some(user) = self.users.find_by_email(email).await? {
            if user.is_banned {
                warn!(user_id = user.id, "Google login refused: account banned");
                return Err(EventFlowError::AccountBanned);
            }
            info!(user_id = user.id, "User logged in via Google");
            return Ok(user);
        }

        let user = self.users.create(name, email, None, UserRole::User).await?;
        let linked = self.guests.link_user_by_email(user.id, email).await?;
        info!(user_id = user.id, linked_guests = linked, "New user registered via Google");

        Ok(user)
    }

    /// Issue a signed token for a user
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(self.config.token_ttl_hours)).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify a token's signature and expiry, returning its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            debug!(error = %e, "Token verification failed");
            EventFlowError::InvalidToken
        })?;

        Ok(data.claims)
    }

    /// Resolve a token to a live user record. Fails closed when the token is
    /// invalid, the user is gone, or the account is banned.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let claims = self.verify_token(token)?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(EventFlowError::InvalidToken)?;

        if user.is_banned {
            return Err(EventFlowError::AccountBanned);
        }

        Ok(user)
    }

    /// Name of the cookie carrying the token
    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }
}

/// Hash a password with argon2 and a fresh salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }
}
