//! Password hashing and bearer-token secrets.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use gymhub_domain::error::GymHubError;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of a bearer token.
pub const SECRET_LEN: usize = 40;

/// Hash `password` into an argon2 PHC string.
///
/// # Errors
///
/// Returns [`GymHubError::Credentials`] when hashing fails.
pub fn hash_password(password: &str) -> Result<String, GymHubError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| GymHubError::Credentials(err.to_string()))
}

/// Check `password` against a stored PHC string. Malformed hashes never match.
#[must_use]
pub fn verify_password(password: &str, phc: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(phc) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// [`hash_password`] on the blocking thread pool.
///
/// # Errors
///
/// Returns [`GymHubError::Credentials`] when hashing fails or the task is
/// cancelled.
pub async fn hash_password_blocking(password: String) -> Result<String, GymHubError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| GymHubError::Credentials(format!("hashing task failed: {err}")))?
}

/// [`verify_password`] on the blocking thread pool.
///
/// # Errors
///
/// Returns [`GymHubError::Credentials`] when the task is cancelled.
pub async fn verify_password_blocking(password: String, phc: String) -> Result<bool, GymHubError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &phc))
        .await
        .map_err(|err| GymHubError::Credentials(format!("verification task failed: {err}")))
}

/// Fresh random alphanumeric secret.
#[must_use]
pub fn generate_secret() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(SECRET_LEN)
        .map(char::from)
        .collect()
}

/// Lowercase hex SHA-256 of a token secret, as stored in the database.
#[must_use]
pub fn hash_secret(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}
