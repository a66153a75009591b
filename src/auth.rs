//! Salted SHA-256 password hashing, stored as `salt$hash` (both hex).
use sha2::{Digest, Sha256};

const SALT_BYTES: usize = 16;

pub fn hash_password(password: &str) -> String {
    let salt = hex::encode(rand::random::<[u8; SALT_BYTES]>());
    let hash = digest(password, &salt);
    format!("{salt}${hash}")
}

/// Malformed stored hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, hash)) if !salt.is_empty() && !hash.contains('$') => {
            digest(password, salt) == hash
        }
        _ => false,
    }
}

fn digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_with_same_password() {
        let stored = hash_password("hunter22");
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));
    }

    #[test]
    fn hash_has_salt_and_digest() {
        let stored = hash_password("pw");
        let (salt, hash) = stored.split_once('$').unwrap();
        assert_eq!(salt.len(), SALT_BYTES * 2);
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn digest_is_lowercase_hex_of_password_then_salt() {
        // sha256("abc")
        assert_eq!(
            digest("ab", "c"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(verify_password(
            "ab",
            "c$ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        ));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "nodollar"));
        assert!(!verify_password("pw", "a$b$c"));
        assert!(!verify_password("pw", "$abc"));
    }
}
