//! Admin configuration.

use argon2::{Argon2, PasswordHash, PasswordVerifier};

/// Guards the `/debug/*` routes.
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    /// The argon2 hashed admin secret. `None` leaves the debug routes open.
    pub secret_hash: Option<String>,
}

impl AdminConfig {
    /// Create a new AdminConfig with the given hashed secret.
    pub fn new(secret_hash: Option<String>) -> Self {
        Self { secret_hash }
    }

    pub fn is_protected(&self) -> bool {
        self.secret_hash.is_some()
    }

    /// Verify a plaintext secret against the stored hash.
    ///
    /// Always `false` when no secret is configured; check
    /// [`is_protected`](Self::is_protected) first.
    pub fn verify_secret(&self, plaintext: &str) -> bool {
        let Some(hash) = self.secret_hash.as_deref() else {
            return false;
        };
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_verify_secret() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"debug-secret", &salt)
            .unwrap()
            .to_string();

        let admin = AdminConfig::new(Some(hash));
        assert!(admin.is_protected());
        assert!(admin.verify_secret("debug-secret"));
        assert!(!admin.verify_secret("wrong"));
    }

    #[test]
    fn test_open_when_unset() {
        let admin = AdminConfig::default();
        assert!(!admin.is_protected());
        assert!(!admin.verify_secret(""));
    }
}
