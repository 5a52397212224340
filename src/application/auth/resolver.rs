use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{DomainError, DomainResult, Principal};

/// Raw credentials lifted off a request.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// `X-API-Key` header
    pub api_key_header: Option<String>,
    /// `Authorization` header
    pub authorization: Option<String>,
}

impl Credentials {
    pub fn new(api_key_header: Option<String>, authorization: Option<String>) -> Self {
        Self {
            api_key_header,
            authorization,
        }
    }

    /// Value after `Bearer `, if the authorization header has that form.
    pub fn bearer_token(&self) -> Option<&str> {
        self.authorization
            .as_deref()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Partner key: the dedicated header, else the bearer value.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key_header
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .or_else(|| self.bearer_token())
    }
}

/// One way of turning credentials into a principal.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` means this strategy does not accept the credentials.
    async fn resolve(&self, credentials: &Credentials) -> Option<Principal>;
}

#[derive(Clone, Default)]
pub struct AuthorizationResolver {
    strategies: Vec<Arc<dyn AuthStrategy>>,
}

impl AuthorizationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a strategy; it runs after every strategy already present.
    pub fn with_strategy(mut self, strategy: Arc<dyn AuthStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub async fn resolve(&self, credentials: &Credentials) -> DomainResult<Principal> {
        for strategy in &self.strategies {
            if let Some(principal) = strategy.resolve(credentials).await {
                debug!(strategy = strategy.name(), "Request authorized");
                return Ok(principal);
            }
        }

        Err(DomainError::Unauthorized(
            "Invalid API key or Bearer token".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        answer: Option<Principal>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(answer: Option<Principal>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AuthStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn resolve(&self, _credentials: &Credentials) -> Option<Principal> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    fn partner(id: i32) -> Option<Principal> {
        Some(Principal::Partner { partner_id: id })
    }

    #[test]
    fn api_key_falls_back_to_bearer() {
        let both = Credentials::new(Some("k1".into()), Some("Bearer t1".into()));
        assert_eq!(both.api_key(), Some("k1"));
        assert_eq!(both.bearer_token(), Some("t1"));

        let bearer_only = Credentials::new(None, Some("Bearer t1".into()));
        assert_eq!(bearer_only.api_key(), Some("t1"));

        let basic = Credentials::new(Some("  ".into()), Some("Basic abc".into()));
        assert_eq!(basic.api_key(), None);
        assert_eq!(basic.bearer_token(), None);
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let first = Fixed::new(partner(1));
        let second = Fixed::new(partner(2));
        let resolver = AuthorizationResolver::new()
            .with_strategy(first.clone())
            .with_strategy(second.clone());

        let principal = resolver.resolve(&Credentials::default()).await.unwrap();
        assert_eq!(principal, Principal::Partner { partner_id: 1 });
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falls_through_in_order() {
        let first = Fixed::new(None);
        let second = Fixed::new(partner(2));
        let resolver = AuthorizationResolver::new()
            .with_strategy(first.clone())
            .with_strategy(second);

        let principal = resolver.resolve(&Credentials::default()).await.unwrap();
        assert_eq!(principal.partner_id(), Some(2));
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn all_failing_is_unauthorized() {
        let resolver = AuthorizationResolver::new()
            .with_strategy(Fixed::new(None))
            .with_strategy(Fixed::new(None));
        let err = resolver.resolve(&Credentials::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
        assert!(AuthorizationResolver::new()
            .resolve(&Credentials::default())
            .await
            .is_err());
    }
}
