/// API route handlers
///
/// # Modules
///
/// - `health`: Liveness and database health check
/// - `auth`: Registration, login, admin login, current user
/// - `public`: Public read surface (paginated lists, homepage feed)
/// - `categories`, `posts`, `plans`, `banners`: Admin write surface
pub mod auth;
pub mod banners;
pub mod categories;
pub mod health;
pub mod plans;
pub mod posts;
pub mod public;
