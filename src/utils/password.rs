use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::models::ApiError;

/// Hashes a password with Argon2 and a fresh random salt, returning the PHC
/// string to persist.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| ApiError::InternalError(format!("Failed to generate salt: {}", e)))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| ApiError::InternalError(format!("Failed to encode salt: {}", e)))?;
    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::InternalError(format!("Failed to hash password: {}", e)))?
        .to_string();
    Ok(phc)
}

/// Verifies a candidate password against a stored PHC string. Malformed
/// hashes verify as false rather than erroring.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2.verify_password(password.as_bytes(), &parsed).is_ok()
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_succeeds() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password(&hash, "secret1"));
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("secret1").unwrap();
        assert!(!verify_password(&hash, "secret2"));
    }

    #[test]
    fn same_password_hashes_differently() {
        // Fresh salt every time, hashes must not repeat
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_password("not-a-phc-string", "secret1"));
        assert!(!verify_password("", "secret1"));
    }
}
