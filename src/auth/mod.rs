//! Authentication and authorization.
//!
//! Issues and validates HS256 JWTs for staff accounts, keeps the revocation
//! map for logged-out tokens, and provides the middleware layers that gate
//! routes by role. Handlers receive the caller's identity through the
//! [`AuthUser`] extractor.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::entities::staff;
use crate::AppState;

/// Claim structure for access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (staff id)
    pub sub: String,
    pub username: String,
    pub role: String,
    /// Unique identifier for this token; revocation key
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated identity extracted from a validated token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: String,
    pub token_id: String,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(staff::ROLE_ADMIN)
    }
}

/// Authentication configuration.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, token_expiration: Duration) -> Self {
        Self {
            jwt_secret,
            token_expiration,
        }
    }
}

/// Issues, validates and revokes access tokens.
///
/// Revocation is an in-process map from jti to token expiry. Entries are
/// evicted once their expiry passes; after that point the signature check
/// rejects the token anyway.
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    revoked: Arc<DashMap<String, i64>>,
}

/// An issued token together with its lifetime.
#[derive(Debug, Serialize, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            revoked: Arc::new(DashMap::new()),
        }
    }

    /// Generate an access token for a staff account.
    pub fn generate_token(&self, account: &staff::Model) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_in = self.config.token_expiration.as_secs() as i64;

        let claims = Claims {
            sub: account.id.to_string(),
            username: account.username.clone(),
            role: account.role.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + expires_in,
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        })
    }

    /// Validate a token and extract its claims, rejecting revoked jtis.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?
        .claims;

        if self.revoked.contains_key(&claims.jti) {
            return Err(AuthError::RevokedToken);
        }

        Ok(claims)
    }

    /// Revoke a token: its jti is refused until the token would have expired.
    pub fn revoke_token(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.validate_token(token)?;
        debug!(jti = %claims.jti, "revoking token");
        self.revoked.insert(claims.jti, claims.exp);
        self.evict_expired();
        Ok(())
    }

    fn evict_expired(&self) {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, exp| *exp > now);
    }

    fn auth_user_from_claims(&self, claims: Claims) -> Result<AuthUser, AuthError> {
        let user_id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthUser {
            user_id,
            username: claims.username,
            role: claims.role,
            token_id: claims.jti,
        })
    }
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    use argon2::password_hash::rand_core::OsRng;
    use argon2::password_hash::SaltString;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::InternalError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash. Unparseable hashes verify false.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token has been revoked")]
    RevokedToken,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Insufficient role")]
    InsufficientRole,

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MissingAuth => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Invalid authentication token".to_string(),
            ),
            Self::TokenExpired => (StatusCode::UNAUTHORIZED, "Token has expired".to_string()),
            Self::RevokedToken => (
                StatusCode::UNAUTHORIZED,
                "Authentication token has been revoked".to_string(),
            ),
            Self::InsufficientRole => (
                StatusCode::FORBIDDEN,
                "Access forbidden: insufficient role".to_string(),
            ),
            Self::TokenCreation(msg) | Self::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = Json(serde_json::json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
            "timestamp": Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

#[async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

/// Authentication middleware: validates the bearer token and stores the
/// caller's identity in request extensions for extractors and role gates.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match extract_auth_from_request(&request, &state.auth) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

fn extract_auth_from_request(
    request: &Request,
    auth: &AuthService,
) -> Result<AuthUser, AuthError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingAuth)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingAuth)?;

    let claims = auth.validate_token(token)?;
    auth.auth_user_from_claims(claims)
}

/// Role middleware: checks the identity stored by [`auth_middleware`].
pub async fn role_middleware(
    State(required_role): State<String>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AuthError::MissingAuth)?;

    if !user.has_role(&required_role) {
        return Err(AuthError::InsufficientRole);
    }

    Ok(next.run(request).await)
}

/// Extension methods for Router to add auth layers.
pub trait AuthRouterExt {
    /// Require a valid, unrevoked token.
    fn with_auth(self, state: &AppState) -> Self;
    /// Require a valid token carrying the given role.
    fn with_role(self, state: &AppState, role: &str) -> Self;
}

impl AuthRouterExt for axum::Router<AppState> {
    fn with_auth(self, state: &AppState) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
    }

    fn with_role(self, state: &AppState, role: &str) -> Self {
        // The auth layer is added last so it runs first.
        self.layer(axum::middleware::from_fn_with_state(
            role.to_string(),
            role_middleware,
        ))
        .with_auth(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(AuthConfig::new(
            "unit_test_secret_key_that_is_long_enough".into(),
            Duration::from_secs(3600),
        ))
    }

    fn account() -> staff::Model {
        staff::Model {
            id: 7,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: String::new(),
            role: "admin".into(),
        }
    }

    #[test]
    fn issued_tokens_round_trip() {
        let svc = service();
        let token = svc.generate_token(&account()).unwrap();
        let claims = svc.validate_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, "admin");
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn revoked_tokens_are_rejected() {
        let svc = service();
        let token = svc.generate_token(&account()).unwrap();
        svc.revoke_token(&token.access_token).unwrap();
        assert!(matches!(
            svc.validate_token(&token.access_token),
            Err(AuthError::RevokedToken)
        ));
    }

    #[test]
    fn tokens_signed_with_other_secrets_fail() {
        let svc = service();
        let other = AuthService::new(AuthConfig::new(
            "a_completely_different_secret_key_here_!".into(),
            Duration::from_secs(3600),
        ));
        let token = other.generate_token(&account()).unwrap();
        assert!(matches!(
            svc.validate_token(&token.access_token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn password_hashes_verify() {
        let hash = hash_password("s3cret!").unwrap();
        assert!(verify_password("s3cret!", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret!", "not-a-phc-string"));
    }
}
