use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded token payload, kept as an untyped JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(pub Map<String, Value>);

impl Claims {
    /// Raw value of claim `name`, JSON `null` included.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Subject identifier carried under `claim_name`.
    pub fn subject(&self, claim_name: &str) -> Uid {
        Uid::new(self.get(claim_name).cloned())
    }
}

/// Subject identifier attached to an authenticated request.
///
/// Inserted into the request extensions by the gate; read it in a handler
/// with `Extension<Uid>`.
///
/// A token that verifies but lacks the configured claim still passes the
/// gate, yielding `Uid(None)`. Handlers that require an identity must check
/// [`Uid::is_present`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Uid(Option<Value>);

impl Uid {
    /// JSON `null` is folded into the absent marker.
    pub fn new(value: Option<Value>) -> Self {
        Self(value.filter(|v| !v.is_null()))
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    pub fn value(&self) -> Option<&Value> {
        self.0.as_ref()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_ref().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.as_ref().and_then(Value::as_i64)
    }

    pub fn into_value(self) -> Option<Value> {
        self.0
    }
}

impl From<Value> for Uid {
    fn from(value: Value) -> Self {
        Self::new(Some(value))
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(Value::String(s)) => f.write_str(s),
            Some(other) => write!(f, "{other}"),
            None => f.write_str("-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Claims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn string_subject() {
        let uid = claims(json!({"uid": "42"})).subject("uid");
        assert_eq!(uid.as_str(), Some("42"));
        assert_eq!(uid.to_string(), "42");
    }

    #[test]
    fn integer_subject_stays_integer() {
        let uid = claims(json!({"user_id": 7, "uid": "ignored"})).subject("user_id");
        assert_eq!(uid.as_i64(), Some(7));
        assert_eq!(uid.as_str(), None);
    }

    #[test]
    fn absent_and_null_claims_are_not_present() {
        let payload = claims(json!({"sub": "x", "uid": null}));
        assert_eq!(payload.subject("uid"), Uid::default());
        assert_eq!(payload.subject("missing"), Uid::default());
        assert!(!payload.subject("missing").is_present());
        assert_eq!(payload.subject("missing").to_string(), "-");
    }
}
