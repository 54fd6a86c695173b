//! Session-scoped access token.
//!
//! The token travels with each request rather than living in process-wide
//! state, so concurrent sessions never see each other's credentials.

use std::fmt;

use crate::ClientError;

/// Cookie that carries the API access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access-token";

/// Bearer token for the profile API.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token, rejecting empty values.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let token = token.trim();
        (!token.is_empty()).then(|| Self(token.to_string()))
    }

    /// Extract the token from a `Cookie` request header.
    pub fn from_cookie_header(header: &str) -> Option<Self> {
        header
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| name.trim() == ACCESS_TOKEN_COOKIE)
            .and_then(|(_, value)| Self::new(value.trim().trim_matches('"')))
    }

    /// Like [`from_cookie_header`](Self::from_cookie_header), for requests
    /// that must be authenticated.
    pub fn require(cookie_header: Option<&str>) -> Result<Self, ClientError> {
        cookie_header
            .and_then(Self::from_cookie_header)
            .ok_or(ClientError::MissingSession)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cookie_header() {
        let token = SessionToken::from_cookie_header("theme=dark; access-token=abc.def.ghi; lang=es")
            .unwrap();
        assert_eq!(token.as_str(), "abc.def.ghi");
    }

    #[test]
    fn test_quoted_cookie_value() {
        let token = SessionToken::from_cookie_header("access-token=\"xyz\"").unwrap();
        assert_eq!(token.as_str(), "xyz");
    }

    #[test]
    fn test_missing_or_empty_cookie() {
        assert!(SessionToken::from_cookie_header("theme=dark").is_none());
        assert!(SessionToken::from_cookie_header("access-token=").is_none());
        assert!(SessionToken::from_cookie_header("").is_none());
        // Similar names do not match
        assert!(SessionToken::from_cookie_header("x-access-token=abc").is_none());
    }

    #[test]
    fn test_require() {
        assert!(SessionToken::require(Some("access-token=t1")).is_ok());
        assert!(matches!(
            SessionToken::require(None),
            Err(ClientError::MissingSession)
        ));
        assert!(matches!(
            SessionToken::require(Some("theme=dark")),
            Err(ClientError::MissingSession)
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = SessionToken::new("secret").unwrap();
        assert_eq!(format!("{:?}", token), "SessionToken(<redacted>)");
    }
}
