//! Session service
//!
//! Implements the cookie-based identity flow:
//! - `login` validates the submitted email and derives a deterministic
//!   identity from it
//! - `verify` decodes the `session` cookie back into that identity
//! - cookie assembly and clearing
//!
//! The cookie payload is plain URL-encoded JSON. There is no signature and no
//! server-side session table: the cookie IS the session store, and whatever
//! identity it carries is trusted as-is. This is the documented contract of
//! the system, not an oversight.

use crate::config::SessionConfig;
use crate::models::SessionUser;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

/// Name of the cookie carrying the session payload
pub const SESSION_COOKIE: &str = "session";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Error types for session operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    /// No email was submitted
    #[error("Email is required")]
    EmailRequired,

    /// The submitted email fails the address pattern
    #[error("Invalid email address")]
    EmailInvalid,

    /// No session cookie was presented
    #[error("No session found")]
    Missing,

    /// The cookie value does not decode into an identity
    #[error("Invalid session")]
    Invalid,
}

/// Outcome of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Identity embedded in the cookie
    pub user: SessionUser,
    /// Bearer-shaped token returned to the client; not a real credential
    pub token: String,
}

/// Derive the deterministic identity for an email.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`, prefixed with `user_`.
/// The same email always maps to the same id.
pub fn derive_user_id(email: &str) -> String {
    let sanitized: String = email
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("user_{}", sanitized)
}

/// Session service issuing and decoding the identity cookie
pub struct SessionService {
    cookie_secure: bool,
    max_age_secs: i64,
}

impl SessionService {
    /// Create a session service from the session configuration
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            cookie_secure: config.cookie_secure,
            max_age_secs: config.max_age_days * 24 * 60 * 60,
        }
    }

    /// Validate an email and produce the identity and token for it.
    pub fn login(&self, email: &str) -> Result<LoginOutcome, SessionError> {
        if email.is_empty() {
            return Err(SessionError::EmailRequired);
        }
        if !EMAIL_PATTERN.is_match(email) {
            return Err(SessionError::EmailInvalid);
        }

        let user = SessionUser {
            id: derive_user_id(email),
            email: email.to_string(),
        };
        let token = format!("token_{}", Utc::now().timestamp_millis());

        Ok(LoginOutcome { user, token })
    }

    /// Build the Set-Cookie value carrying the session payload.
    pub fn issue_cookie(&self, user: &SessionUser) -> String {
        let payload = serde_json::json!({ "id": user.id, "email": user.email }).to_string();
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE,
            urlencoding::encode(&payload),
            self.max_age_secs,
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Build the Set-Cookie value that clears the session.
    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            SESSION_COOKIE
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Decode a raw cookie value into the identity it carries.
    ///
    /// The only checks are that a value is present and that it
    /// percent-decodes and parses as the expected JSON shape; the embedded
    /// identity is returned verbatim.
    pub fn verify(&self, cookie_value: Option<&str>) -> Result<SessionUser, SessionError> {
        let raw = cookie_value.ok_or(SessionError::Missing)?;
        let decoded = urlencoding::decode(raw).map_err(|_| SessionError::Invalid)?;
        serde_json::from_str(&decoded).map_err(|_| SessionError::Invalid)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_email_strategy() -> impl Strategy<Value = String> {
        ("[a-z0-9.+-]{1,12}", "[a-z0-9-]{1,10}", "[a-z]{2,6}")
            .prop_map(|(local, domain, tld)| format!("{}@{}.{}", local, domain, tld))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// The derived id is a pure function of the email.
        #[test]
        fn property_login_id_is_deterministic(email in valid_email_strategy()) {
            let svc = SessionService::new(&SessionConfig::default());
            let a = svc.login(&email).unwrap();
            let b = svc.login(&email).unwrap();
            prop_assert_eq!(a.user.id, b.user.id);
        }

        /// Derived ids carry the `user_` prefix and only `[A-Za-z0-9_]`.
        #[test]
        fn property_derived_id_charset(email in valid_email_strategy()) {
            let id = derive_user_id(&email);
            prop_assert!(id.starts_with("user_"));
            prop_assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        }

        /// Every valid email logs in; issue/verify round-trips the identity.
        #[test]
        fn property_cookie_roundtrip(email in valid_email_strategy()) {
            let svc = SessionService::new(&SessionConfig::default());
            let outcome = svc.login(&email).unwrap();
            let cookie = svc.issue_cookie(&outcome.user);
            let value = cookie
                .strip_prefix("session=")
                .unwrap()
                .split(';')
                .next()
                .unwrap();
            prop_assert_eq!(svc.verify(Some(value)).unwrap(), outcome.user);
        }

        /// Strings without an `@` or a dotted domain never log in.
        #[test]
        fn property_addressless_strings_rejected(text in "[a-z0-9]{1,16}") {
            let svc = SessionService::new(&SessionConfig::default());
            prop_assert!(svc.login(&text).is_err());
        }
    }
}
