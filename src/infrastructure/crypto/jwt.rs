//! JWT token handling for administrator sessions

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Access token lifetime in minutes
    pub access_token_minutes: i64,
    /// Refresh token lifetime in minutes
    pub refresh_token_minutes: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-charger-gateway-secret".to_string()),
            access_token_minutes: 5,
            refresh_token_minutes: 60,
            issuer: "charger-gateway".to_string(),
        }
    }
}

/// Whether a token grants API access or can only be exchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (admin ID)
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: String,
    pub kind: TokenKind,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
}

impl TokenClaims {
    pub fn new(
        admin_id: &str,
        username: &str,
        role: &str,
        kind: TokenKind,
        config: &JwtConfig,
    ) -> Self {
        let now = Utc::now();
        let lifetime = match kind {
            TokenKind::Access => config.access_token_minutes,
            TokenKind::Refresh => config.refresh_token_minutes,
        };

        Self {
            sub: admin_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            kind,
            exp: (now + Duration::minutes(lifetime)).timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }
}

/// Sign a token for an administrator
pub fn create_token(
    admin_id: &str,
    username: &str,
    role: &str,
    kind: TokenKind,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = TokenClaims::new(admin_id, username, role, kind, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature, expiry and issuer, then decode the claims
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            access_token_minutes: 5,
            refresh_token_minutes: 60,
            issuer: "test".into(),
        }
    }

    #[test]
    fn token_round_trip_keeps_kind_and_role() {
        let cfg = config();
        let token = create_token("admin-1", "admin", "admin", TokenKind::Refresh, &cfg).unwrap();
        let claims = verify_token(&token, &cfg).unwrap();
        assert_eq!(claims.sub, "admin-1");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.kind, TokenKind::Refresh);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let cfg = config();
        let token = create_token("admin-1", "admin", "admin", TokenKind::Access, &cfg).unwrap();
        let other = JwtConfig {
            secret: "other".into(),
            ..config()
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let cfg = JwtConfig {
            access_token_minutes: -10,
            ..config()
        };
        let token = create_token("admin-1", "admin", "admin", TokenKind::Access, &cfg).unwrap();
        assert!(verify_token(&token, &cfg).is_err());
    }
}
