/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new user
/// - `POST /api/auth/login` - Login and get a token
/// - `POST /api/admin/login` - Login restricted to admin accounts
/// - `GET /api/auth/me` - Current authenticated user
///
/// User tokens live for 30 days; admin tokens for 1 day. Failed logins are
/// always "Invalid credentials", whether the account is missing, holds the
/// wrong role, or the password is wrong.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response,
};
use axum::{extract::State, response::Response, Extension};
use axum::Json;
use listora_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::{CreateUser, User, UserRole},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display/login name
    #[validate(length(min = 3, max = 100, message = "Username must be 3 to 100 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token plus the authenticated user
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

/// `POST /api/auth/register`
///
/// Creates a regular user account. Uniqueness is checked across both the
/// username and the email.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or the username/email is taken
/// - `500 Internal Server Error`: Hashing or database failure
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    if User::exists_by_username_or_email(&state.db, &req.username, &req.email).await? {
        return Err(ApiError::BadRequest(
            "User with this email or username already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            role: UserRole::User,
        },
    )
    .await?;

    let claims = jwt::Claims::new(user.id, user.role);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(response::created(
        "User registered successfully",
        SessionResponse { token, user },
    ))
}

/// `POST /api/auth/login`
///
/// # Errors
///
/// - `400 Bad Request`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::BadRequest("Invalid credentials".to_string()));
    }

    let claims = jwt::Claims::new(user.id, user.role);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(response::ok(SessionResponse { token, user }))
}

/// `POST /api/admin/login`
///
/// Same contract as `login`, but only accounts holding the admin role can
/// authenticate. A regular account with the right password still gets
/// "Invalid credentials".
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    let user = User::find_by_email_and_role(&state.db, &req.email, UserRole::Admin)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::BadRequest("Invalid credentials".to_string()));
    }

    let claims = jwt::Claims::new(user.id, user.role);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(response::ok(SessionResponse { token, user }))
}

/// `GET /api/auth/me`
///
/// Returns the account behind the presented token. A valid token for a
/// deleted account yields 404.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Response> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(response::ok(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_username = RegisterRequest {
            username: "al".to_string(),
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(short_username.validate().is_err());

        let bad_email = RegisterRequest {
            username: "alice".to_string(),
            email: "not-an-email".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "abc".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty_password = LoginRequest {
            email: "alice@example.com".to_string(),
            password: String::new(),
        };
        assert!(empty_password.validate().is_err());
    }
}
