//! Authorization middleware for Axum
//!
//! Resolves the caller into a [`Principal`] with the configured resolver,
//! re-checks partner validity on every request, and stores the principal
//! in request extensions for the handlers.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::common::ApiError;
use crate::application::{AuthorizationResolver, Credentials, PartnerService};
use crate::domain::Principal;

pub const API_KEY_HEADER: &str = "x-api-key";
const AUTHORIZATION_HEADER: &str = "authorization";

#[derive(Clone)]
pub struct AuthState {
    pub resolver: AuthorizationResolver,
    pub partners: Arc<PartnerService>,
}

pub fn credentials_from_headers(headers: &HeaderMap) -> Credentials {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    Credentials::new(read(API_KEY_HEADER), read(AUTHORIZATION_HEADER))
}

pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let credentials = credentials_from_headers(request.headers());

    let principal = match auth.resolver.resolve(&credentials).await {
        Ok(principal) => principal,
        Err(e) => {
            debug!(uri = %request.uri(), "Authorization failed");
            return ApiError::from(e).into_response();
        }
    };

    if let Principal::Partner { partner_id } = principal {
        if let Err(e) = auth.partners.ensure_principal_valid(partner_id).await {
            return ApiError::from(e).into_response();
        }
    }

    request.extensions_mut().insert(principal);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    #[test]
    fn credentials_are_read_from_both_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("X-API-Key", HeaderValue::from_static("k1"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t1"));

        let creds = credentials_from_headers(&headers);
        assert_eq!(creds.api_key(), Some("k1"));
        assert_eq!(creds.bearer_token(), Some("t1"));
    }
}
