/// Authentication middleware for Axum
///
/// Validates Bearer tokens from the Authorization header and adds an
/// `AuthContext` to request extensions. A second gate checks the context's
/// role for admin-only routes, so the two layers compose: every admin route
/// is wrapped in both, public routes in neither.
///
/// Error responses use the same `{success: false, message}` envelope as the
/// rest of the API.
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};
use crate::models::UserRole;

/// Authentication context added to request extensions
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use listora_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role carried by the token
    pub role: UserRole,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),

    /// Authenticated but not allowed
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Admin access required".to_string(),
            ),
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// JWT authentication middleware
///
/// Validates tokens from the `Authorization: Bearer <token>` header and adds
/// an `AuthContext` extension on success.
///
/// # Errors
///
/// Returns 401 Unauthorized if the header is missing, malformed, or the
/// token fails validation.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let auth_context = AuthContext {
        user_id: claims.sub,
        role: claims.role,
    };
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Admin gate middleware
///
/// Must run after `jwt_auth_middleware`; a missing `AuthContext` is treated
/// as missing credentials rather than a server error.
pub async fn require_admin_middleware(req: Request, next: Next) -> Result<Response, AuthError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or(AuthError::MissingCredentials)?;

    if !auth.is_admin() {
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure
///
/// Helper that captures the secret so the middleware can be registered with
/// `middleware::from_fn`.
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get, middleware};
/// use listora_shared::auth::middleware::create_jwt_middleware;
///
/// let app: Router = Router::new()
///     .route("/protected", get(|| async { "OK" }))
///     .layer(middleware::from_fn(create_jwt_middleware("secret")));
/// ```
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_context_admin_check() {
        let admin = AuthContext {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
        };
        let user = AuthContext {
            user_id: Uuid::new_v4(),
            role: UserRole::User,
        };

        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
