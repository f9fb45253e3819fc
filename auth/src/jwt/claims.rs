use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by every access token issued by the catalog service.
///
/// The role flag is captured at issuance time: promoting or demoting a user
/// does not change tokens that are already out, only tokens minted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Admin flag as of issuance (absent in the token means false)
    #[serde(default)]
    pub is_superuser: bool,

    /// Expiration time (Unix timestamp); always present
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user with automatic expiration.
    ///
    /// # Arguments
    /// * `username` - Token subject
    /// * `is_superuser` - Whether the user holds the admin role right now
    /// * `expiration_minutes` - Minutes until the token expires
    ///
    /// # Returns
    /// Claims with sub, is_superuser, and exp set
    pub fn for_user(username: impl ToString, is_superuser: bool, expiration_minutes: i64) -> Self {
        let expiration = Utc::now() + Duration::minutes(expiration_minutes);

        Self {
            sub: username.to_string(),
            is_superuser,
            exp: expiration.timestamp(),
        }
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Check whether the token is expired at the given timestamp.
    ///
    /// A token is expired at its expiration instant and at every instant
    /// after it.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let claims = Claims::for_user("alice", false, 60);

        assert_eq!(claims.sub, "alice");
        assert!(!claims.is_superuser);

        let now = Utc::now().timestamp();
        let lifetime = claims.exp - now;
        // 60 minutes, give or take the time spent in this test
        assert!((3598..=3600).contains(&lifetime));
    }

    #[test]
    fn test_for_user_admin_flag() {
        let claims = Claims::for_user("root", true, 60);
        assert!(claims.is_superuser);
    }

    #[test]
    fn test_with_expiration() {
        let claims = Claims::for_user("alice", false, 60).with_expiration(1234567890);
        assert_eq!(claims.exp, 1234567890);
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::for_user("alice", false, 60).with_expiration(1000);

        assert!(!claims.is_expired(999)); // Not yet expired
        assert!(claims.is_expired(1000)); // Expired at the expiration instant
        assert!(claims.is_expired(1001)); // Expired after it
    }

    #[test]
    fn test_missing_superuser_claim_defaults_to_false() {
        let claims: Claims =
            serde_json::from_str(r#"{"sub": "alice", "exp": 1234567890}"#).unwrap();

        assert_eq!(claims.sub, "alice");
        assert!(!claims.is_superuser);
    }
}
