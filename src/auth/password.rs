//! Salted password hashing.

use sha2::{Digest, Sha256};

/// Hash `plain + salt` with SHA-256 and return lowercase hex.
#[must_use]
pub fn hash_password(plain: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a plaintext password against a stored hex hash.
///
/// The stored hash is compared case-insensitively; the plaintext is not
/// normalized in any way.
#[must_use]
pub fn verify_password(plain: &str, stored_hash: &str, salt: &str) -> bool {
    hash_password(plain, salt).eq_ignore_ascii_case(stored_hash)
}
