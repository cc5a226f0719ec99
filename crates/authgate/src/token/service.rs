//! HMAC-signed credential issuance and verification.

use std::collections::BTreeSet;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::{debug, warn};
use serde::Deserialize;
use uuid::Uuid;

use super::{Claims, Subject, TokenError};

/// Algorithms accepted in a credential header.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Issues and reads credentials signed with a shared secret.
///
/// Secret, TTL, issuer and audience are fixed at construction. The service
/// holds no per-request state and can be shared freely across tasks.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    issuer: String,
    audience: BTreeSet<String>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

/// The only header field read before the signature is checked.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            issuer: String::new(),
            audience: BTreeSet::new(),
        }
    }

    /// Stamp issued credentials with an issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Stamp issued credentials with an audience.
    pub fn with_audience<I, S>(mut self, audience: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audience = audience.into_iter().map(Into::into).collect();
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a credential for `subject`, expiring `ttl` from now.
    pub fn issue(&self, subject: &Subject) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now().timestamp())
    }

    /// Issue a credential as if the clock read `issued_at`.
    pub fn issue_at(&self, subject: &Subject, issued_at: i64) -> Result<String, TokenError> {
        let encoded_subject = subject.encode().inspect_err(|e| {
            warn!("Failed to encode subject: {e}");
        })?;

        let ttl_secs = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            issuer: self.issuer.clone(),
            audience: self.audience.clone(),
            issued_at,
            not_before: issued_at,
            expires_at: issued_at.saturating_add(ttl_secs),
            identity: Uuid::new_v4().to_string(),
            subject: encoded_subject,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                warn!("Failed to sign token: {e}");
                TokenError::Signing(e.to_string())
            })?;

        debug!(
            "Issued token jti={} expiring at {}",
            claims.identity, claims.expires_at
        );
        Ok(token)
    }

    /// Parse a credential and return its claims.
    ///
    /// Checks, in order: segment count, header algorithm, signature, claims
    /// shape. Expiry is not checked, see [`Claims::is_expired`].
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(TokenError::Malformed(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        }

        let header = read_header(segments[0])?;
        let algorithm = hmac_algorithm(&header.alg)?;

        let mut validation = Validation::new(algorithm);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("Token rejected: {e:?}");
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => TokenError::UnsupportedAlgorithm(header.alg.clone()),
                ErrorKind::InvalidToken => TokenError::Malformed(e.to_string()),
                _ => TokenError::Decode(e.to_string()),
            }
        })?;

        Ok(data.claims)
    }

    /// Confirm the credential parses and carries a valid signature.
    pub fn verify(&self, token: &str) -> Result<bool, TokenError> {
        self.parse(token)?;
        Ok(true)
    }

    /// Decode the opaque `sub` value of a credential.
    pub fn decode_subject(&self, opaque: &str) -> Result<Subject, TokenError> {
        Subject::decode(opaque)
    }
}

fn read_header(segment: &str) -> Result<RawHeader, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::Malformed(format!("header is not valid base64url: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Malformed(format!("header is not valid JSON: {e}")))
}

fn hmac_algorithm(name: &str) -> Result<Algorithm, TokenError> {
    match name {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => {
            warn!("Rejecting token with signing algorithm {other:?}");
            Err(TokenError::UnsupportedAlgorithm(other.to_string()))
        }
    }
}
