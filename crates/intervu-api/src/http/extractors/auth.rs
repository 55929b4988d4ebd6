//! Bearer token authentication extractor.
//!
//! Extracts and verifies HS256 JWTs from:
//! - `Authorization: Bearer <token>` header
//! - `?token=<token>` query parameter
//!
//! The `sub` claim is the user id; `role == "admin"` grants admin access.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Uri};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use intervu_core::interview::service::Caller;

use crate::http::error::AppError;
use crate::http::extractors::query::TokenQuery;
use crate::state::AppState;

const ADMIN_ROLE: &str = "admin";

/// Claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: usize,
}

/// Verifies access tokens against the shared signing secret.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &SecretString) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Decode a token into the caller it authenticates.
    pub fn verify(&self, token: &str) -> Result<Caller, AppError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Token subject is not a user id".to_string()))?;

        tracing::debug!(user_id = %user_id, email = ?data.claims.email, "Authenticated request");
        Ok(match data.claims.role.as_deref() {
            Some(ADMIN_ROLE) => Caller::admin(user_id),
            _ => Caller::user(user_id),
        })
    }
}

/// The authenticated caller. Extracting this validates the bearer token.
pub struct AuthUser(pub Caller);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers, &parts.uri)?;
        state.token_verifier.verify(&token).map(AuthUser)
    }
}

/// Extract the bearer token from the request.
pub fn extract_token(headers: &HeaderMap, uri: &Uri) -> Result<String, AppError> {
    // Try Authorization: Bearer <token>
    if let Some(auth) = headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    // Try ?token=<token>
    if let Ok(Query(TokenQuery { token: Some(token) })) = Query::<TokenQuery>::try_from_uri(uri) {
        if !token.is_empty() {
            return Ok(token);
        }
    }

    Err(AppError::Unauthorized(
        "Missing token. Provide via 'Authorization: Bearer <token>' header or '?token=' query parameter."
            .to_string(),
    ))
}

#[cfg(test)]
pub(crate) fn sign_test_token(secret: &str, sub: &str, role: Option<&str>, exp: usize) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let claims = Claims {
        sub: sub.to_string(),
        email: Some("candidate@example.com".to_string()),
        role: role.map(str::to_string),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
pub(crate) fn far_future() -> usize {
    (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize
}
