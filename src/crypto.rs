//! PIN and password hashing.
//!
//! bcrypt is deliberately slow; verification is constant-time with respect
//! to the supplied secret. The plaintext is never stored or logged.

/// bcrypt work factor used for all hashes.
pub const BCRYPT_COST: u32 = 12;

/// Hash a transfer PIN.
pub fn hash_pin(pin: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(pin, BCRYPT_COST)
}

/// Check a PIN against its stored hash.
///
/// Returns `false` both for a mismatch and for a malformed hash; callers
/// cannot distinguish the two.
pub fn verify_pin(pin: &str, hash: &str) -> bool {
    bcrypt::verify(pin, hash).unwrap_or(false)
}

/// Hash a login password. Verification belongs to the authentication
/// service; this side only provisions the stored hash.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, BCRYPT_COST)
}
