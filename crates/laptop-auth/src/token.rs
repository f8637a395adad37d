// crates/laptop-auth/src/token.rs
//
// JSON Web Tokens signed with HMAC-SHA256.
//
// Token format (compact JWS): base64url(header) "." base64url(claims) "." base64url(mac),
// all without padding. The header is always {"alg":"HS256","typ":"JWT"}.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use laptop_core::user::User;

use crate::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

/// Verified token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    /// Expiry as a Unix timestamp in seconds.
    pub exp: i64,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Issues and verifies access tokens with a shared secret.
pub struct TokenManager {
    secret_key: Vec<u8>,
    token_duration: Duration,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("token_duration", &self.token_duration)
            .finish()
    }
}

impl TokenManager {
    /// Create a manager signing with `secret_key`; tokens live for `token_duration`.
    pub fn new(secret_key: impl AsRef<[u8]>, token_duration: Duration) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
            token_duration,
        }
    }

    pub fn token_duration(&self) -> Duration {
        self.token_duration
    }

    /// Generate and sign a new token for a user, valid from now.
    pub fn generate(&self, user: &User) -> Result<String, AuthError> {
        self.generate_at(user, Utc::now())
    }

    /// Generate a token as if the current time were `now`.
    pub fn generate_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, AuthError> {
        let lifetime = chrono::Duration::from_std(self.token_duration)
            .map_err(|e| AuthError::Signing(format!("token duration out of range: {}", e)))?;

        let claims = UserClaims {
            exp: (now + lifetime).timestamp(),
            username: user.username.clone(),
            role: user.role.clone(),
        };
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };

        let header_json =
            serde_json::to_vec(&header).map_err(|e| AuthError::Signing(e.to_string()))?;
        let claims_json =
            serde_json::to_vec(&claims).map_err(|e| AuthError::Signing(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode(claims_json)
        );
        let signature = self.sign(signing_input.as_bytes())?;

        Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, access_token: &str) -> Result<UserClaims, AuthError> {
        self.verify_at(access_token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, access_token: &str, now: DateTime<Utc>) -> Result<UserClaims, AuthError> {
        let mut parts = access_token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::InvalidToken(
                "token must have exactly three segments".to_string(),
            ));
        };

        let header: Header = decode_segment(header_b64)?;
        if header.alg != ALGORITHM {
            return Err(AuthError::InvalidToken(format!(
                "unexpected token signing method {}",
                header.alg
            )));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|e| AuthError::InvalidToken(format!("bad signature encoding: {}", e)))?;

        let signing_input_len = header_b64.len() + 1 + claims_b64.len();
        let mut mac = self.mac()?;
        mac.update(&access_token.as_bytes()[..signing_input_len]);
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken("signature mismatch".to_string()))?;

        let claims: UserClaims = decode_segment(claims_b64)?;
        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(&self.secret_key).map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut mac = self.mac()?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::InvalidToken(format!("bad segment encoding: {}", e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::InvalidToken(format!("bad segment payload: {}", e)))
}
