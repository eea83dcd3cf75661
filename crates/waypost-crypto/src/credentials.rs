use anyhow::{Result, anyhow};
use argon2::Argon2;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use rand_core::{OsRng, RngCore};
use subtle::ConstantTimeEq;

/// Length of the random salt before encoding.
pub const SALT_LEN: usize = 13;

/// Length of the derived Argon2id output.
const HASH_LEN: usize = 32;

/// Stored form of a password: base64 hash plus the base64 salt it was derived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    pub hash: String,
    pub salt: String,
}

/// Hash a password under a fresh random salt.
pub fn hash_password(password: &str) -> Result<PasswordDigest> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let hash = derive(password, &salt)?;

    Ok(PasswordDigest {
        hash,
        salt: BASE64.encode(salt),
    })
}

/// Recompute the hash of `password` under `salt` and compare it with `hash`
/// in constant time. Undecodable salts never verify.
pub fn verify_password(password: &str, hash: &str, salt: &str) -> bool {
    let Ok(salt) = BASE64.decode(salt) else {
        return false;
    };

    match derive(password, &salt) {
        Ok(computed) => computed.as_bytes().ct_eq(hash.as_bytes()).into(),
        Err(_) => false,
    }
}

fn derive(password: &str, salt: &[u8]) -> Result<String> {
    let mut output = [0u8; HASH_LEN];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut output)
        .map_err(|e| anyhow!("Password hashing failed: {}", e))?;
    Ok(BASE64.encode(output))
}
