//! Password hashing adapter.
//!
//! Encodes credentials as `sha256$<salt>$<digest>` with a per-user random
//! salt. The scheme is self-describing so a stronger KDF can be introduced
//! alongside it and distinguished by prefix.
//!
//! TODO: migrate stored hashes to a memory-hard KDF (argon2id) behind the
//! same port once the dependency is vetted.

use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::auth::Password;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Salted SHA-256 implementation of the password hasher port.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256PasswordHasher;

fn digest_hex(salt: &[u8], password: &Password) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.expose().as_bytes());
    hex::encode(hasher.finalize())
}

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &Password) -> String {
        let mut salt = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = digest_hex(&salt, password);
        format!("{SCHEME}${}${digest}", hex::encode(salt))
    }

    fn verify(&self, password: &Password, encoded: &str) -> Result<bool, PasswordHasherError> {
        let mut parts = encoded.split('$');
        let (scheme, salt_hex, digest) = match (parts.next(), parts.next(), parts.next(), parts.next())
        {
            (Some(scheme), Some(salt), Some(digest), None) => (scheme, salt, digest),
            _ => {
                return Err(PasswordHasherError::malformed(
                    "expected scheme$salt$digest",
                ));
            }
        };
        if scheme != SCHEME {
            return Err(PasswordHasherError::malformed(format!(
                "unknown scheme: {scheme}"
            )));
        }
        let salt = hex::decode(salt_hex)
            .map_err(|err| PasswordHasherError::malformed(format!("salt: {err}")))?;

        Ok(digest_hex(&salt, password) == digest)
    }
}
