use std::sync::Arc;

use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Subject every `/login` token is issued for. There is no credential check
/// behind it: login is a placeholder and must be replaced with real
/// verification before the protected routes can be trusted.
pub const STUB_SUBJECT: &str = "1";

/// Longest token lifetime the config may ask for (one year)
pub const MAX_TOKEN_LIFETIME_HOURS: u64 = 24 * 365;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer <token>` credential on the request
    #[error("missing bearer credentials")]
    MissingCredentials,

    /// A bearer token was presented but failed verification
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("token lifetime of {0} hours is outside 1..={max}", max = MAX_TOKEN_LIFETIME_HOURS)]
    InvalidLifetime(u64),

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.into(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Authenticated caller, inserted into request extensions by the auth middleware
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
}

impl Identity {
    /// Identity given to every request when authentication is turned off
    pub fn anonymous() -> Self {
        Self {
            subject: "anonymous".to_string(),
        }
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self { subject: claims.sub }
    }
}

/// HS256 token issuer and verifier
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl JwtManager {
    pub fn new(secret: &str, lifetime: Duration) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        })
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn generate_token(&self, subject: &str) -> Result<String, AuthError> {
        let claims = Claims::new(subject, self.lifetime);
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(format!("{:?}", e.kind())))
    }
}

/// How protected routes admit requests
#[derive(Clone)]
pub enum AuthMode {
    /// Every request passes as [`Identity::anonymous`]
    Open,
    /// Requests must carry a valid bearer token
    Jwt(Arc<JwtManager>),
}

impl AuthMode {
    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        if !security.auth_enabled {
            return Ok(AuthMode::Open);
        }

        let lifetime = token_lifetime(security.jwt_expiry_hours)?;
        let manager = JwtManager::new(&security.jwt_secret, lifetime)?;
        Ok(AuthMode::Jwt(Arc::new(manager)))
    }

    pub fn jwt(secret: &str, lifetime: Duration) -> Result<Self, AuthError> {
        Ok(AuthMode::Jwt(Arc::new(JwtManager::new(secret, lifetime)?)))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, AuthMode::Jwt(_))
    }

    pub fn issuer(&self) -> Option<&JwtManager> {
        match self {
            AuthMode::Open => None,
            AuthMode::Jwt(manager) => Some(manager),
        }
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        match self {
            AuthMode::Open => Ok(Identity::anonymous()),
            AuthMode::Jwt(manager) => {
                let token = extract_bearer_token(headers)?;
                let claims = manager.validate_token(token)?;
                Ok(Identity::from(claims))
            }
        }
    }
}

fn token_lifetime(hours: u64) -> Result<Duration, AuthError> {
    if !(1..=MAX_TOKEN_LIFETIME_HOURS).contains(&hours) {
        return Err(AuthError::InvalidLifetime(hours));
    }
    let hours = i64::try_from(hours).map_err(|_| AuthError::InvalidLifetime(hours))?;
    Ok(Duration::hours(hours))
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("authorization header is not valid UTF-8".to_string()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AuthError::MissingCredentials),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn jwt_mode() -> AuthMode {
        AuthMode::jwt("unit-test-secret", Duration::hours(1)).unwrap()
    }

    #[test]
    fn issued_token_authenticates_as_stub_subject() {
        let mode = jwt_mode();
        let token = mode.issuer().unwrap().generate_token(STUB_SUBJECT).unwrap();

        let identity = mode
            .authenticate(&headers_with(&format!("Bearer {}", token)))
            .unwrap();
        assert_eq!(identity.subject, "1");
    }

    #[test]
    fn token_expires_after_configured_lifetime() {
        let manager = JwtManager::new("unit-test-secret", Duration::hours(1)).unwrap();
        let token = manager.generate_token(STUB_SUBJECT).unwrap();
        let claims = manager.validate_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn missing_header_is_missing_credentials() {
        let err = jwt_mode().authenticate(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[test]
    fn non_bearer_scheme_is_missing_credentials() {
        let err = jwt_mode().authenticate(&headers_with("Basic dXNlcjpwYXNz")).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));

        let err = jwt_mode().authenticate(&headers_with("Bearer ")).unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = jwt_mode().authenticate(&headers_with("Bearer not.a.jwt")).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let other = JwtManager::new("some-other-secret", Duration::hours(1)).unwrap();
        let token = other.generate_token(STUB_SUBJECT).unwrap();

        let err = jwt_mode()
            .authenticate(&headers_with(&format!("Bearer {}", token)))
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn expired_token_is_invalid() {
        // Past the default 60s validation leeway
        let manager = JwtManager::new("unit-test-secret", Duration::hours(-2)).unwrap();
        let token = manager.generate_token(STUB_SUBJECT).unwrap();

        let err = jwt_mode()
            .authenticate(&headers_with(&format!("Bearer {}", token)))
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn non_utf8_header_is_invalid_not_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xe9\xe9").unwrap(),
        );
        let err = jwt_mode().authenticate(&headers).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn out_of_range_lifetime_is_rejected() {
        for hours in [0, MAX_TOKEN_LIFETIME_HOURS + 1, u64::MAX] {
            let security = SecurityConfig {
                jwt_secret: "unit-test-secret".to_string(),
                jwt_expiry_hours: hours,
                ..SecurityConfig::default()
            };
            assert!(
                matches!(AuthMode::from_config(&security), Err(AuthError::InvalidLifetime(h)) if h == hours),
                "{} hours accepted",
                hours
            );
        }

        let security = SecurityConfig {
            jwt_secret: "unit-test-secret".to_string(),
            jwt_expiry_hours: MAX_TOKEN_LIFETIME_HOURS,
            ..SecurityConfig::default()
        };
        let mode = AuthMode::from_config(&security).unwrap();
        assert_eq!(
            mode.issuer().unwrap().lifetime(),
            Duration::hours(MAX_TOKEN_LIFETIME_HOURS as i64)
        );
    }

    #[test]
    fn open_mode_admits_anonymous() {
        let identity = AuthMode::Open.authenticate(&HeaderMap::new()).unwrap();
        assert_eq!(identity, Identity::anonymous());
        assert!(AuthMode::Open.issuer().is_none());
    }

    #[test]
    fn enabled_auth_requires_secret() {
        let security = SecurityConfig::default();
        assert!(matches!(
            AuthMode::from_config(&security),
            Err(AuthError::MissingSecret)
        ));

        let open = SecurityConfig {
            auth_enabled: false,
            ..SecurityConfig::default()
        };
        assert!(!AuthMode::from_config(&open).unwrap().is_enabled());
    }
}
