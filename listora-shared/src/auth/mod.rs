/// Authentication and authorization utilities
///
/// This module provides secure authentication primitives for Listora:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Axum layers for the auth and admin gates
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with role-dependent expiration
/// - **Constant-time Comparison**: Verification uses constant-time operations
pub mod jwt;
pub mod middleware;
pub mod password;
