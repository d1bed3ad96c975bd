//! Response shapes the inspector acknowledges requests with.

use serde_json::{Map, Value};
use time::OffsetDateTime;

pub const AUTH_ROUTE: &str = "/auth";
pub const AUTH_PASSWORD: &str = "secret";

/// Default acknowledgment: `{status, message, timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub status: &'static str,
    pub message: String,
    pub received_at: OffsetDateTime,
}

impl Envelope {
    pub fn success(method: &str, received_at: OffsetDateTime) -> Self {
        Self {
            status: "success",
            message: format!("{method} リクエストを受信しました"),
            received_at,
        }
    }
}

/// Result of the hardcoded password check on the auth route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated,
    InvalidPassword,
}

impl AuthOutcome {
    /// Only a JSON string equal to the password authenticates; a missing field or any other
    /// value type is treated as a wrong password.
    pub fn check(credentials: &Map<String, Value>) -> Self {
        match credentials.get("password") {
            Some(Value::String(password)) if password == AUTH_PASSWORD => Self::Authenticated,
            _ => Self::InvalidPassword,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Authenticated => "Authenticated",
            Self::InvalidPassword => "Invalid password",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn credentials(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn success_envelope_message_embeds_method() {
        let envelope = Envelope::success("PATCH", OffsetDateTime::UNIX_EPOCH);
        assert_eq!(envelope.status, "success");
        assert_eq!(envelope.message, "PATCH リクエストを受信しました");
    }

    #[test]
    fn success_correct_password() {
        let map = credentials(json!({"password": "secret", "user": "x"}));
        assert_eq!(AuthOutcome::check(&map), AuthOutcome::Authenticated);
    }

    #[test]
    fn failure_wrong_or_missing_password() {
        for value in [
            json!({"password": "wrong"}),
            json!({"password": 1}),
            json!({"password": null}),
            json!({"user": "secret"}),
            json!({}),
        ] {
            assert_eq!(
                AuthOutcome::check(&credentials(value)),
                AuthOutcome::InvalidPassword
            );
        }
    }
}
