/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use listora_api::{app::AppState, config::Config};
/// use listora_shared::storage::LocalStore;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let storage = Arc::new(LocalStore::new("uploads", "/uploads"));
/// let state = AppState::new(pool, config, storage);
/// let app = listora_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::config::{Config, StorageConfig};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use listora_shared::{
    auth::middleware::{create_jwt_middleware, require_admin_middleware},
    storage::{ObjectStore, MAX_IMAGE_BYTES},
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Upload storage backend
    pub storage: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, storage: Arc<dyn ObjectStore>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            storage,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check
/// ├── /uploads/*                     # Static files (local storage only)
/// └── /api/
///     ├── /health                    # Health check
///     ├── /auth/                     # Authentication (public)
///     │   ├── POST /register
///     │   ├── POST /login
///     │   └── GET  /me               # (authenticated)
///     ├── POST /admin/login
///     ├── /public/                   # Read surface (public, paginated)
///     │   ├── GET /categories
///     │   ├── GET /categories/:id/posts
///     │   ├── GET /posts
///     │   ├── GET /posts/:id
///     │   ├── GET /posts/:id/plans
///     │   ├── GET /banners
///     │   └── GET /home
///     ├── /categories/               # Write surface (admin only)
///     ├── /posts/
///     ├── /plans/
///     └── /banners/
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication + admin gate (per route group)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Auth routes; /me requires a valid token, the rest are open
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route(
            "/me",
            get(routes::auth::me).layer(axum::middleware::from_fn(create_jwt_middleware(
                state.jwt_secret().to_string(),
            ))),
        );

    // Public read surface, no auth
    let public_routes = Router::new()
        .route("/categories", get(routes::public::list_categories))
        .route(
            "/categories/:id/posts",
            get(routes::public::list_category_posts),
        )
        .route("/posts", get(routes::public::list_posts))
        .route("/posts/:id", get(routes::public::get_post))
        .route("/posts/:id/plans", get(routes::public::list_post_plans))
        .route("/banners", get(routes::public::list_banners))
        .route("/home", get(routes::public::home));

    // Admin write surface; JWT validation runs before the role gate
    let admin_routes = Router::new()
        .route(
            "/categories",
            post(routes::categories::create).get(routes::categories::list),
        )
        .route(
            "/categories/:id",
            get(routes::categories::get_by_id)
                .post(routes::categories::update)
                .delete(routes::categories::remove),
        )
        .route("/posts", post(routes::posts::create).get(routes::posts::list))
        .route(
            "/posts/:id",
            get(routes::posts::get_by_id)
                .post(routes::posts::update)
                .delete(routes::posts::remove),
        )
        .route("/plans", post(routes::plans::create).get(routes::plans::list))
        .route(
            "/plans/:id",
            get(routes::plans::get_by_id)
                .post(routes::plans::update)
                .delete(routes::plans::remove),
        )
        .route("/plans/post/:post_id", get(routes::plans::list_by_post))
        .route(
            "/banners",
            post(routes::banners::create).get(routes::banners::list),
        )
        .route(
            "/banners/:id",
            get(routes::banners::get_by_id)
                .post(routes::banners::update)
                .delete(routes::banners::remove),
        )
        .layer(axum::middleware::from_fn(require_admin_middleware))
        .layer(axum::middleware::from_fn(create_jwt_middleware(
            state.jwt_secret().to_string(),
        )));

    let api_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/admin/login", post(routes::auth::admin_login))
        .nest("/auth", auth_routes)
        .nest("/public", public_routes)
        .merge(admin_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let mut router = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes);

    // Local storage is served straight from disk; S3 objects come from the
    // bucket's public URL instead.
    if let StorageConfig::Local { upload_dir } = &state.config.storage {
        router = router.nest_service("/uploads", ServeDir::new(upload_dir));
    }

    router
        // Multipart bodies may carry a 5 MiB image plus form fields.
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 64 * 1024))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use listora_shared::{auth::jwt, models::UserRole, storage::LocalStore};
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "router-test-secret-key-32-bytes-long";

    fn test_state() -> AppState {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: SECRET.to_string(),
            },
            storage: StorageConfig::Local {
                upload_dir: "uploads".to_string(),
            },
        };

        // Lazy pool: no connection is attempted until a handler touches it,
        // which the middleware tests never do.
        let db = PgPool::connect_lazy(&config.database.url).unwrap();
        let storage = Arc::new(LocalStore::new("uploads", "/uploads"));

        AppState::new(db, config, storage)
    }

    fn get_request(path: &str, token: Option<&str>) -> Request<Body> {
        let builder = Request::builder().method("GET").uri(path);
        let builder = match token {
            Some(token) => builder.header("authorization", format!("Bearer {}", token)),
            None => builder,
        };
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_admin_routes_reject_missing_token() {
        let app = build_router(test_state());

        let response = app
            .oneshot(get_request("/api/categories", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_routes_reject_garbage_token() {
        let app = build_router(test_state());

        let response = app
            .oneshot(get_request("/api/categories", Some("not-a-jwt")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_routes_reject_user_role() {
        let app = build_router(test_state());

        let claims = jwt::Claims::new(Uuid::new_v4(), UserRole::User);
        let token = jwt::create_token(&claims, SECRET).unwrap();

        let response = app
            .oneshot(get_request("/api/categories", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
