/// Waypost Crypto Library
///
/// Password storage for accounts: a random 13-byte salt per password and an
/// Argon2id hash keyed by it. Verification recomputes the hash and compares
/// in constant time.

pub mod credentials;

pub use credentials::{PasswordDigest, hash_password, verify_password};
