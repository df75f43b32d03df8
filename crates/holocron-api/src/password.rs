use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("password hash: {e}"))
}

/// Check a password against a stored PHC-format hash. An unparseable hash
/// counts as a failed match.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verify_roundtrip() {
        let hash = hash("it's a trap").unwrap();
        assert_ne!(hash, "it's a trap");
        assert!(verify("it's a trap", &hash));
    }

    #[test]
    fn wrong_password_rejected() {
        let hash = hash("original").unwrap();
        assert!(!verify("different", &hash));
    }

    #[test]
    fn garbage_hash_rejected() {
        assert!(!verify("anything", "not-a-phc-hash"));
    }
}
