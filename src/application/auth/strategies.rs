//! Concrete authorization strategies

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::resolver::{AuthStrategy, Credentials};
use crate::domain::{Principal, RepositoryProvider};
use crate::infrastructure::crypto::api_key::fingerprint;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenKind};

/// Looks a partner up by exact API key match.
///
/// A partner that is not ACTIVE or is over its charger quota does not
/// resolve, so later strategies still get a turn.
pub struct ApiKeyStrategy {
    repos: Arc<dyn RepositoryProvider>,
}

impl ApiKeyStrategy {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl AuthStrategy for ApiKeyStrategy {
    fn name(&self) -> &'static str {
        "api_key"
    }

    async fn resolve(&self, credentials: &Credentials) -> Option<Principal> {
        let key = credentials.api_key()?;
        let partner = match self.repos.partners().find_by_api_key(key).await {
            Ok(Some(partner)) => partner,
            Ok(None) => {
                debug!(key = %fingerprint(key), "No partner for API key");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "API key lookup failed");
                return None;
            }
        };

        if !partner.is_active() {
            debug!(
                partner_id = partner.id,
                status = %partner.status,
                "API key of non-active partner"
            );
            return None;
        }
        match self.repos.chargers().count_for_partner(partner.id).await {
            Ok(count) if partner.may_act(count) => Some(Principal::Partner {
                partner_id: partner.id,
            }),
            Ok(count) => {
                debug!(partner_id = partner.id, count, "API key of partner over quota");
                None
            }
            Err(e) => {
                warn!(error = %e, "Charger count failed during API key check");
                None
            }
        }
    }
}

/// Verifies an administrator access token.
pub struct TokenStrategy {
    config: JwtConfig,
}

impl TokenStrategy {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AuthStrategy for TokenStrategy {
    fn name(&self) -> &'static str {
        "token"
    }

    async fn resolve(&self, credentials: &Credentials) -> Option<Principal> {
        let token = credentials.bearer_token()?;
        let claims = match verify_token(token, &self.config) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Bearer token rejected");
                return None;
            }
        };

        if claims.kind != TokenKind::Access || claims.sub.is_empty() || claims.role.is_empty() {
            return None;
        }

        Some(Principal::Admin {
            admin_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::auth::AuthorizationResolver;
    use crate::infrastructure::crypto::jwt::create_token;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use crate::domain::{ChargerStatus, PartnerStatus, PartnerUpdate};
    use crate::test_support::{seed_charger, seed_partner, test_jwt_config};

    async fn resolver_with(
        repos: Arc<InMemoryRepositoryProvider>,
    ) -> (AuthorizationResolver, i32) {
        let partner = seed_partner(repos.as_ref(), "A", "key-a", 1).await;
        let resolver = AuthorizationResolver::new()
            .with_strategy(Arc::new(ApiKeyStrategy::new(repos)))
            .with_strategy(Arc::new(TokenStrategy::new(test_jwt_config())));
        (resolver, partner.id)
    }

    async fn resolver() -> (AuthorizationResolver, i32) {
        resolver_with(Arc::new(InMemoryRepositoryProvider::new())).await
    }

    fn bearer(token: &str) -> Credentials {
        Credentials::new(None, Some(format!("Bearer {}", token)))
    }

    #[tokio::test]
    async fn api_key_header_yields_partner() {
        let (resolver, partner_id) = resolver().await;
        let principal = resolver
            .resolve(&Credentials::new(Some("key-a".into()), None))
            .await
            .unwrap();
        assert_eq!(principal, Principal::Partner { partner_id });
    }

    #[tokio::test]
    async fn api_key_in_bearer_header_yields_partner() {
        let (resolver, partner_id) = resolver().await;
        let principal = resolver.resolve(&bearer("key-a")).await.unwrap();
        assert_eq!(principal.partner_id(), Some(partner_id));
    }

    #[tokio::test]
    async fn access_token_yields_admin() {
        let (resolver, _) = resolver().await;
        let token =
            create_token("admin-1", "admin", "admin", TokenKind::Access, &test_jwt_config()).unwrap();
        let principal = resolver.resolve(&bearer(&token)).await.unwrap();
        assert_eq!(
            principal,
            Principal::Admin {
                admin_id: "admin-1".into(),
                role: "admin".into()
            }
        );
    }

    #[tokio::test]
    async fn refresh_token_and_roleless_token_are_rejected() {
        let (resolver, _) = resolver().await;
        let cfg = test_jwt_config();

        let refresh = create_token("admin-1", "admin", "admin", TokenKind::Refresh, &cfg).unwrap();
        assert!(resolver.resolve(&bearer(&refresh)).await.is_err());

        let no_role = create_token("admin-1", "admin", "", TokenKind::Access, &cfg).unwrap();
        assert!(resolver.resolve(&bearer(&no_role)).await.is_err());

        let no_subject = create_token("", "admin", "admin", TokenKind::Access, &cfg).unwrap();
        assert!(resolver.resolve(&bearer(&no_subject)).await.is_err());
    }

    #[tokio::test]
    async fn suspended_partner_key_does_not_resolve() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let (resolver, partner_id) = resolver_with(repos.clone()).await;
        repos
            .partners()
            .update(
                partner_id,
                PartnerUpdate {
                    status: Some(PartnerStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let key_only = Credentials::new(Some("key-a".into()), None);
        assert!(resolver.resolve(&key_only).await.is_err());

        let token =
            create_token("admin-1", "admin", "admin", TokenKind::Access, &test_jwt_config()).unwrap();
        let with_token =
            Credentials::new(Some("key-a".into()), Some(format!("Bearer {}", token)));
        assert!(resolver.resolve(&with_token).await.unwrap().is_admin());
    }

    #[tokio::test]
    async fn over_quota_partner_key_does_not_resolve() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let (resolver, partner_id) = resolver_with(repos.clone()).await;
        let key_only = Credentials::new(Some("key-a".into()), None);

        seed_charger(repos.as_ref(), partner_id, "CH_1", ChargerStatus::Available).await;
        assert!(resolver.resolve(&key_only).await.is_ok());

        seed_charger(repos.as_ref(), partner_id, "CH_2", ChargerStatus::Available).await;
        assert!(resolver.resolve(&key_only).await.is_err());
    }

    #[tokio::test]
    async fn unknown_key_and_missing_credentials_fail() {
        let (resolver, _) = resolver().await;
        assert!(resolver
            .resolve(&Credentials::new(Some("key-x".into()), None))
            .await
            .is_err());
        assert!(resolver.resolve(&Credentials::default()).await.is_err());
    }
}
