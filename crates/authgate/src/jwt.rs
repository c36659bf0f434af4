//! HS256 verification adapter over `jsonwebtoken`.

use jsonwebtoken::{
    decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::Serialize;
use serde_json::Value;

use crate::claims::Claims;
use crate::error::AuthError;
use crate::gate::TokenVerifier;

/// Verifies HMAC-SHA-256 signed JWTs.
///
/// Only `HS256` headers are accepted. `exp` and `nbf` are enforced when
/// present, with no leeway, but neither is required. A time claim that is
/// present but not a JSON number is a verification failure.
#[derive(Debug, Clone)]
pub struct Hs256Verifier {
    validation: Validation,
}

impl Hs256Verifier {
    /// HS256 with optional `exp`/`nbf`, both checked with zero leeway.
    pub fn new() -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.leeway = 0;
        validation.validate_nbf = true;
        Self { validation }
    }

    /// Override the claim checks, e.g. to pin `aud` or `iss`. The algorithm
    /// list is reset to `HS256` regardless of what `validation` carries.
    pub fn with_validation(mut validation: Validation) -> Self {
        validation.algorithms = vec![Algorithm::HS256];
        Self { validation }
    }
}

impl Default for Hs256Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenVerifier for Hs256Verifier {
    fn verify(&self, secret: &str, token: &str) -> Result<Claims, AuthError> {
        let key = DecodingKey::from_secret(secret.as_bytes());
        let claims = decode::<Claims>(token, &key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::Verification(e.to_string()))?;
        check_time_claims(&claims, &self.validation)?;
        Ok(claims)
    }
}

const TIME_CLAIMS: [(&str, &str); 3] = [
    ("exp", "Expiration Time claim (exp) must be a number."),
    ("nbf", "Not Before claim (nbf) must be a number."),
    ("iat", "Issued At claim (iat) must be a number."),
];

// jsonwebtoken silently skips time claims it cannot read as a u64, so a
// string, negative or fractional `exp` would otherwise never expire.
fn check_time_claims(claims: &Claims, validation: &Validation) -> Result<(), AuthError> {
    for (name, reason) in TIME_CLAIMS {
        if claims.get(name).is_some_and(|value| !value.is_number()) {
            return Err(AuthError::Verification(reason.to_string()));
        }
    }

    let now = get_current_timestamp() as f64;
    let leeway = validation.leeway as f64;
    let time = |name: &str| claims.get(name).and_then(Value::as_f64);

    if validation.validate_exp && time("exp").is_some_and(|exp| exp < now - leeway) {
        return Err(AuthError::Verification("ExpiredSignature".to_string()));
    }
    if validation.validate_nbf && time("nbf").is_some_and(|nbf| nbf > now + leeway) {
        return Err(AuthError::Verification("ImmatureSignature".to_string()));
    }
    Ok(())
}

/// Sign `claims` with `secret` using HS256.
///
/// Meant for tests and tooling that need a token the gate will accept.
pub fn sign<T: Serialize>(secret: &str, claims: &T) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
