//! JWT token creation and validation service
//!
//! Provides secure JWT token generation and validation using the jsonwebtoken crate.

use crate::claims::Claims;
use chrono::{Duration, Utc};
use flota_core::error::AppError;
use flota_core::models::User;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error, warn};

/// JWT Service for token creation and validation
///
/// Handles JWT token lifecycle including creation, validation, and expiration checks.
#[derive(Clone)]
pub struct JwtService {
    /// Secret key for signing tokens (kept for potential future use)
    #[allow(dead_code)]
    secret: String,

    /// Default token expiration time in seconds
    expiration_secs: i64,

    /// Encoding key (cached)
    encoding_key: EncodingKey,

    /// Decoding key (cached)
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service
    ///
    /// # Arguments
    ///
    /// * `secret` - The secret key used to sign tokens
    /// * `expiration_secs` - Default token expiration time in seconds
    ///
    /// # Examples
    ///
    /// ```
    /// use flota_auth::JwtService;
    ///
    /// let jwt_service = JwtService::new("my-secret-key", 1800);
    /// ```
    pub fn new(secret: &str, expiration_secs: i64) -> Self {
        Self {
            secret: secret.to_string(),
            expiration_secs,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create a JWT token from claims
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidToken` if token creation fails
    ///
    /// # Examples
    ///
    /// ```
    /// use flota_auth::{Claims, JwtService};
    /// use flota_core::models::UserRole;
    ///
    /// let jwt_service = JwtService::new("secret", 1800);
    /// let claims = Claims::new(1, "Admin", "admin@example.com", UserRole::Admin);
    /// let token = jwt_service.create_token(&claims)?;
    /// # Ok::<(), flota_core::error::AppError>(())
    /// ```
    pub fn create_token(&self, claims: &Claims) -> Result<String, AppError> {
        // Create mutable claims to set expiration
        let mut token_claims = claims.clone();

        // Set expiration if not already set
        if token_claims.exp == 0 {
            let exp = Utc::now() + Duration::seconds(self.expiration_secs);
            token_claims.exp = exp.timestamp();
        }

        debug!(
            user_id = %token_claims.sub,
            role = ?token_claims.role,
            exp = %token_claims.exp,
            "Creating JWT token"
        );

        encode(&Header::default(), &token_claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "Failed to create JWT token");
            AppError::InvalidToken(format!("Token creation failed: {}", e))
        })
    }

    /// Create a token carrying the given user's identity
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidToken` if token creation fails
    pub fn create_token_for_user(&self, user: &User) -> Result<String, AppError> {
        let claims = Claims::new(user.id, &user.name, &user.email, user.role);
        self.create_token(&claims)
    }

    /// Validate a JWT token and extract claims
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `AppError::TokenExpired` if the token has expired
    /// - `AppError::InvalidToken` if the token is invalid
    ///
    /// # Examples
    ///
    /// ```
    /// use flota_auth::{Claims, JwtService};
    /// use flota_core::models::UserRole;
    ///
    /// let jwt_service = JwtService::new("secret", 1800);
    /// let claims = Claims::new(5, "User", "user@example.com", UserRole::CommonUser);
    /// let token = jwt_service.create_token(&claims)?;
    /// let decoded = jwt_service.validate_token(&token)?;
    /// assert_eq!(decoded.sub, "5");
    /// # Ok::<(), flota_core::error::AppError>(())
    /// ```
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            // Check if error is due to expiration
            if e.to_string().contains("ExpiredSignature") {
                warn!("Token expired");
                return AppError::TokenExpired;
            }

            warn!(error = %e, "Invalid token");
            AppError::InvalidToken(format!("Token validation failed: {}", e))
        })?;

        let claims = token_data.claims;

        // Additional expiration check (should be caught by validation, but be defensive)
        if claims.is_expired() {
            warn!(user_id = %claims.sub, "Token expired (manual check)");
            return Err(AppError::TokenExpired);
        }

        debug!(
            user_id = %claims.sub,
            role = ?claims.role,
            "Token validated successfully"
        );

        Ok(claims)
    }

    /// Get the expiration time for tokens created by this service
    pub fn expiration_secs(&self) -> i64 {
        self.expiration_secs
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_secs", &self.expiration_secs)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
