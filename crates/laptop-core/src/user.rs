// crates/laptop-core/src/user.rs
//
// User credentials. Passwords are kept as
// `rounds$hex(salt)$hex(pbkdf2_hmac_sha256(password, salt, rounds))`.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// PBKDF2 iterations for newly hashed passwords. The count is stored with
/// each hash, so raising it does not invalidate existing users.
pub const PASSWORD_ROUNDS: u32 = 100_000;

/// A registered user: identity, salted password hash, and a single role tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub hashed_password: String,
    /// Role tag checked by the access policy, e.g. "admin" or "role1".
    pub role: String,
}

impl User {
    /// Create a user, hashing `password` with a fresh random salt.
    pub fn new(username: impl Into<String>, password: &str, role: impl Into<String>) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        Self {
            username: username.into(),
            hashed_password: format!(
                "{}${}${}",
                PASSWORD_ROUNDS,
                hex::encode(salt),
                hex::encode(derive(password, &salt, PASSWORD_ROUNDS))
            ),
            role: role.into(),
        }
    }

    /// Check a candidate password against the stored hash in constant time.
    pub fn is_correct_password(&self, password: &str) -> bool {
        let mut parts = self.hashed_password.split('$');
        let (Some(rounds), Some(salt_hex), Some(expected_hex), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        let (Ok(rounds), Ok(salt), Ok(expected)) = (
            rounds.parse::<u32>(),
            hex::decode(salt_hex),
            hex::decode(expected_hex),
        ) else {
            return false;
        };
        if rounds == 0 || expected.len() != HASH_LEN {
            return false;
        }

        let actual = derive(password, &salt, rounds);
        actual[..].ct_eq(&expected[..]).into()
    }
}

fn derive(password: &str, salt: &[u8], rounds: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, rounds, &mut out);
    out
}
