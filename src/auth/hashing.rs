use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use crate::errors::{Error, Result};

pub fn password_hasher() -> Argon2<'static> {
    // Argon2id with a small memory footprint and one pass keeps per-request
    // verification in the low milliseconds. Bearer secrets are long random
    // strings, so the low work factor does not weaken them.
    const MEMORY_COST_KIB: u32 = 768;
    const ITERATIONS: u32 = 1;
    const PARALLELISM: u32 = 1;
    let params =
        Params::new(MEMORY_COST_KIB, ITERATIONS, PARALLELISM, Some(32)).unwrap_or_default();
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

/// Hash a bearer secret into a PHC string.
pub fn hash_secret(argon2: &Argon2<'_>, secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|err| Error::internal(format!("Failed to hash token secret: {}", err)))?;
    Ok(hash.to_string())
}

/// Constant-time check of a secret against a stored PHC string. A corrupt
/// stored hash verifies as false.
pub fn verify_secret(argon2: &Argon2<'_>, secret: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => argon2.verify_password(secret.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}
