//! Password hashing. One-way, salted, cost factor from the bcrypt default;
//! verification goes through bcrypt's own routine.

/// Hash a plaintext password for storage.
pub fn hash_password(plaintext: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plaintext, bcrypt::DEFAULT_COST)
}

/// Check a plaintext password against a stored hash. Returns false on
/// mismatch or on an unparseable hash.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_is_salted() {
        let a = hash_password("hunter2hunter2").unwrap();
        let b = hash_password("hunter2hunter2").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("hunter2hunter2", &a));
        assert!(verify_password("hunter2hunter2", &b));
    }

    #[test]
    fn wrong_password_fails() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(!verify_password("wrong-horse", &hash));
    }

    #[test]
    fn bad_hash_is_not_a_panic() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
