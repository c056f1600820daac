//! Password hashing and verification using Argon2
//!
//! Provides secure password hashing using the Argon2id algorithm,
//! which is recommended for password hashing due to its resistance
//! to GPU cracking attacks and side-channel attacks.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use flota_core::error::AppError;
use rand_core::OsRng;
use tracing::{debug, error};

/// Password hashing service using Argon2
///
/// Uses Argon2id with default parameters for secure password hashing.
#[derive(Debug, Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    /// Create a new password service with default Argon2 parameters
    ///
    /// # Examples
    ///
    /// ```
    /// use flota_auth::PasswordService;
    ///
    /// let password_service = PasswordService::new();
    /// ```
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hash a password using Argon2
    ///
    /// # Returns
    ///
    /// Returns the password hash as a PHC string format
    ///
    /// # Errors
    ///
    /// Returns `AppError::PasswordHash` if hashing fails
    ///
    /// # Examples
    ///
    /// ```
    /// use flota_auth::PasswordService;
    ///
    /// let password_service = PasswordService::new();
    /// let hash = password_service.hash_password("my_secure_password")?;
    /// # Ok::<(), flota_core::error::AppError>(())
    /// ```
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        debug!("Hashing password");

        // Generate a random salt
        let salt = SaltString::generate(&mut OsRng);

        // Hash the password
        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "Failed to hash password");
                AppError::PasswordHash(format!("Password hashing failed: {}", e))
            })?;

        Ok(password_hash.to_string())
    }

    /// Verify a password against a hash
    ///
    /// # Returns
    ///
    /// Returns `Ok(true)` if the password matches the hash,
    /// `Ok(false)` if it doesn't match,
    /// or an error if verification fails
    ///
    /// # Errors
    ///
    /// Returns `AppError::PasswordHash` if the hash is invalid or verification fails
    ///
    /// # Examples
    ///
    /// ```
    /// use flota_auth::PasswordService;
    ///
    /// let password_service = PasswordService::new();
    /// let hash = password_service.hash_password("my_password")?;
    ///
    /// let is_valid = password_service.verify_password("my_password", &hash)?;
    /// assert!(is_valid);
    ///
    /// let is_invalid = password_service.verify_password("wrong_password", &hash)?;
    /// assert!(!is_invalid);
    /// # Ok::<(), flota_core::error::AppError>(())
    /// ```
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        debug!("Verifying password");

        // Parse the hash
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "Failed to parse password hash");
            AppError::PasswordHash(format!("Invalid password hash format: {}", e))
        })?;

        // Verify the password
        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(_) => {
                debug!("Password verification successful");
                Ok(true)
            }
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: incorrect password");
                Ok(false)
            }
            Err(e) => {
                error!(error = %e, "Password verification error");
                Err(AppError::PasswordHash(format!(
                    "Password verification failed: {}",
                    e
                )))
            }
        }
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new()
    }
}
