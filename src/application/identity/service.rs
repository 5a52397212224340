//! Administrator authentication service

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{AdminUser, DomainError, DomainResult, NewAdminUser, RepositoryProvider};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig, TokenKind};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Token pair returned by login and refresh
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

pub struct AdminAuthService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl AdminAuthService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    fn issue(&self, admin_id: &str, username: &str, role: &str) -> DomainResult<AuthTokens> {
        let sign = |kind| {
            create_token(admin_id, username, role, kind, &self.jwt_config)
                .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))
        };

        Ok(AuthTokens {
            token: sign(TokenKind::Access)?,
            refresh_token: sign(TokenKind::Refresh)?,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.access_token_minutes * 60,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthTokens> {
        let Some(admin) = self.repos.admins().find_by_username(username).await? else {
            warn!(username, "Admin login with unknown username");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !admin.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        if !verify_password(password, &admin.password_hash).unwrap_or(false) {
            warn!(username, "Admin login with wrong password");
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        self.repos.admins().touch_last_login(&admin.id).await?;
        info!(admin_id = %admin.id, username, "Admin logged in");
        self.issue(&admin.id, &admin.username, &admin.role)
    }

    /// Exchanges a refresh token for a new pair. Access tokens are refused.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<AuthTokens> {
        let claims = verify_token(refresh_token, &self.jwt_config)
            .map_err(|_| DomainError::Unauthorized("Invalid refresh token".into()))?;

        if claims.kind != TokenKind::Refresh {
            return Err(DomainError::Unauthorized("Invalid refresh token".into()));
        }

        let admin = self
            .repos
            .admins()
            .find_by_id(&claims.sub)
            .await?
            .filter(|a| a.is_active)
            .ok_or_else(|| DomainError::Unauthorized("Invalid refresh token".into()))?;

        self.issue(&admin.id, &admin.username, &admin.role)
    }

    /// Creates the bootstrap administrator when no admin exists yet.
    pub async fn ensure_default_admin(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> DomainResult<Option<AdminUser>> {
        if self.repos.admins().count().await? > 0 {
            return Ok(None);
        }

        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Storage(format!("Failed to hash admin password: {}", e)))?;

        let admin = self
            .repos
            .admins()
            .insert(NewAdminUser {
                username: username.to_string(),
                password_hash,
                role: role.to_string(),
            })
            .await?;

        info!(username, "Default admin created");
        warn!("Please change the default admin password");
        Ok(Some(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use crate::test_support::{seed_admin, test_jwt_config};

    async fn service() -> AdminAuthService {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        seed_admin(repos.as_ref(), "admin", "admin123", "admin").await;
        AdminAuthService::new(repos, test_jwt_config())
    }

    #[tokio::test]
    async fn login_issues_access_and_refresh_tokens() {
        let svc = service().await;
        let tokens = svc.login("admin", "admin123").await.unwrap();

        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 300);
        let access = verify_token(&tokens.token, svc.jwt_config()).unwrap();
        assert_eq!(access.kind, TokenKind::Access);
        assert_eq!(access.role, "admin");
        let refresh = verify_token(&tokens.refresh_token, svc.jwt_config()).unwrap();
        assert_eq!(refresh.kind, TokenKind::Refresh);
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let svc = service().await;
        assert!(matches!(
            svc.login("admin", "nope").await.unwrap_err(),
            DomainError::Unauthorized(_)
        ));
        assert!(matches!(
            svc.login("ghost", "admin123").await.unwrap_err(),
            DomainError::Unauthorized(_)
        ));
    }

    #[tokio::test]
    async fn refresh_accepts_only_refresh_tokens() {
        let svc = service().await;
        let tokens = svc.login("admin", "admin123").await.unwrap();

        assert!(svc.refresh(&tokens.refresh_token).await.is_ok());
        assert!(svc.refresh(&tokens.token).await.is_err());
        assert!(svc.refresh("garbage").await.is_err());
    }

    #[tokio::test]
    async fn default_admin_is_created_once() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = AdminAuthService::new(repos, test_jwt_config());

        let created = svc.ensure_default_admin("root", "pw", "admin").await.unwrap();
        assert_eq!(created.map(|a| a.username), Some("root".to_string()));
        assert!(svc.ensure_default_admin("other", "pw", "admin").await.unwrap().is_none());
        assert!(svc.login("root", "pw").await.is_ok());
    }
}
