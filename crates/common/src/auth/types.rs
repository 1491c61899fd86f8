//! OAuth 2.0 token types

use std::fmt;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Token response from the authorization server
///
/// Standard OAuth 2.0 token response format (RFC 6749).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Absolute expiry for a token issued at `issued_at`.
    ///
    /// Truncated to whole seconds so the value survives persistence at
    /// second precision unchanged.
    #[must_use]
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        (issued_at + Duration::seconds(self.expires_in)).trunc_subsecs(0)
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .finish()
    }
}

/// The bearer token currently in use
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub expires_at: DateTime<Utc>,
}

impl BearerToken {
    /// Build the token a response grants when issued at `issued_at`.
    #[must_use]
    pub fn from_response(response: &TokenResponse, issued_at: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token.clone(),
            token_type: response.token_type.clone(),
            scope: response.scope.clone().unwrap_or_default(),
            expires_at: response.expires_at(issued_at),
        }
    }

    /// Whether the token is expired or expires within `margin`.
    ///
    /// A token is only valid while `now + margin < expires_at`.
    #[must_use]
    pub fn is_expired(&self, margin: Duration) -> bool {
        self.is_expired_at(Utc::now(), margin)
    }

    /// [`BearerToken::is_expired`] evaluated at an explicit instant.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now + margin >= self.expires_at
    }

    /// Value for the `Authorization` header, e.g. `Bearer abc`.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn response(expires_in: i64) -> TokenResponse {
        TokenResponse {
            access_token: "secret".into(),
            expires_in,
            token_type: "Bearer".into(),
            scope: Some("organizer:participant".into()),
        }
    }

    #[test]
    fn expiry_is_issue_time_plus_lifetime() {
        let issued = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let token = BearerToken::from_response(&response(3600), issued);

        assert_eq!(token.expires_at, issued + Duration::seconds(3600));
        assert!(!token.is_expired_at(issued, Duration::zero()));
        assert!(token.is_expired_at(issued + Duration::seconds(3599), Duration::minutes(1)));
    }

    #[test]
    fn expired_iff_remaining_time_within_margin() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let margin = Duration::minutes(1);
        let token = |remaining: i64| BearerToken {
            expires_at: now + Duration::seconds(remaining),
            ..BearerToken::from_response(&response(0), now)
        };

        assert!(token(59).is_expired_at(now, margin));
        assert!(token(60).is_expired_at(now, margin));
        assert!(!token(61).is_expired_at(now, margin));
        assert!(token(-5).is_expired_at(now, margin));
    }

    #[test]
    fn missing_token_type_defaults_to_bearer() {
        let parsed: TokenResponse =
            serde_json::from_str(r#"{"access_token":"abc","expires_in":86400}"#).unwrap();

        assert_eq!(parsed.token_type, "Bearer");
        assert_eq!(parsed.scope, None);
    }

    #[test]
    fn debug_hides_access_token() {
        let token = BearerToken::from_response(&response(60), Utc::now());
        assert!(!format!("{token:?}").contains("secret"));
        assert!(!format!("{:?}", response(60)).contains("secret"));
        assert_eq!(token.authorization_header(), "Bearer secret");
    }
}
