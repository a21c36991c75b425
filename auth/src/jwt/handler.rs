use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::claims::Claims;
use super::errors::JwtError;

/// JWT handler bound to one signing secret and one token lifetime.
///
/// Each token class (access, refresh) gets its own handler, so a token signed
/// by one handler never verifies under another. Uses HS256.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `ttl` - Lifetime of every token issued by this handler
    ///
    /// # Errors
    /// * `Configuration` - Secret is empty, ttl is not positive, or ttl is too
    ///   long for an expiry timestamp to be computed
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::Configuration(
                "signing secret must not be empty".to_string(),
            ));
        }

        if ttl <= Duration::zero() {
            return Err(JwtError::Configuration(format!(
                "token lifetime must be positive, got {}s",
                ttl.num_seconds()
            )));
        }

        if Utc::now().checked_add_signed(ttl).is_none() {
            return Err(JwtError::Configuration(format!(
                "token lifetime out of range, got {}s",
                ttl.num_seconds()
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        })
    }

    /// Sign a payload, valid from now for this handler's ttl.
    pub fn sign<T: Serialize>(&self, payload: &T) -> Result<String, JwtError> {
        self.sign_at(payload, Utc::now())
    }

    /// Sign a payload as if issued at `issued_at`.
    pub fn sign_at<T: Serialize>(
        &self,
        payload: &T,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        self.encode(&Claims::new(payload, issued_at, self.ttl)?)
    }

    /// Encode arbitrary claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify signature and expiry, then decode the claims.
    ///
    /// Expiry is checked with zero leeway.
    ///
    /// # Errors
    /// * `TokenExpired` - `exp` is in the past
    /// * `InvalidToken` - Signature mismatch, malformed token or unexpected payload
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<Claims<T>, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;

        decode::<Claims<T>>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::InvalidToken(e.to_string()),
            })
    }

    /// Decode token without validation (for inspection only).
    ///
    /// # Security Warning
    /// This does NOT validate the signature or the expiry. Only use it to read
    /// fields such as `exp` from a token this process just issued; never trust
    /// its output for authorization decisions.
    pub fn decode_unverified<T: DeserializeOwned>(
        &self,
        token: &str,
    ) -> Result<Claims<T>, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<Claims<T>>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}
