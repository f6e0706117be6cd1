use crate::types::{AppError, Claims, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use std::collections::HashSet;
use std::fmt;
use zeroize::Zeroizing;

/// Minimum secret length accepted for HS512 signing.
pub const MIN_SECRET_BYTES: usize = 32;

/// Default token lifetime (two hours).
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 2 * 60 * 60;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

/// Reasons a signing secret is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("signing secret is {actual} bytes, at least {minimum} are required")]
    TooShort { actual: usize, minimum: usize },

    #[error("signing secret uses only {distinct} distinct bytes")]
    Repetitive { distinct: usize },
}

/// Symmetric key material for token signing.
///
/// Built once at startup from external configuration and held in memory only.
/// The bytes are wiped on drop and never printed.
#[derive(Clone)]
pub struct SigningKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl SigningKey {
    pub fn from_secret(secret: &str) -> std::result::Result<Self, KeyError> {
        let bytes = secret.as_bytes();

        if bytes.len() < MIN_SECRET_BYTES {
            return Err(KeyError::TooShort {
                actual: bytes.len(),
                minimum: MIN_SECRET_BYTES,
            });
        }

        let distinct = bytes.iter().collect::<HashSet<_>>().len();
        if distinct < 8 {
            return Err(KeyError::Repetitive { distinct });
        }

        Ok(Self {
            bytes: Zeroizing::new(bytes.to_vec()),
        })
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Generates a fresh random secret (64 bytes, hex encoded).
pub fn generate_secret() -> String {
    let mut bytes = Zeroizing::new([0u8; 64]);
    rand::rng().fill_bytes(&mut bytes[..]);
    hex::encode(&bytes[..])
}

/// A freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct Token {
    /// Compact JWT
    pub value: String,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HS512-signed JWTs carrying a single `username` claim.
///
/// Tokens are stateless: validity depends only on the signature and `exp`.
/// There is no revocation list, so logging out means discarding the token.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Creates an issuer with the given key and token lifetime.
    pub fn new(key: &SigningKey, lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            lifetime,
        }
    }

    /// Creates an issuer with the default two hour lifetime.
    pub fn with_default_lifetime(key: &SigningKey) -> Self {
        Self::new(key, Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS))
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issues a token for `username`, valid from now for the configured lifetime.
    pub fn issue(&self, username: &str) -> Result<Token> {
        self.issue_at(username, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, username: &str, now: DateTime<Utc>) -> Result<Token> {
        let expires_at = now.checked_add_signed(self.lifetime).ok_or_else(|| {
            AppError::Internal(format!(
                "token expiry overflows: lifetime of {}s from {}",
                self.lifetime.num_seconds(),
                now
            ))
        })?;
        let claims = Claims {
            username: username.to_string(),
            exp: expires_at.timestamp(),
        };

        let value = encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(Token {
            value,
            username: claims.username,
            issued_at: now,
            expires_at,
        })
    }

    /// Verifies signature, algorithm and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                AppError::Unauthorized
            })
    }
}
