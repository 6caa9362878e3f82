//! Database layer for Listora
//!
//! This module provides database connection pooling and migrations.
//!
//! # Modules
//!
//! - `pool`: PostgreSQL connection pool management with health checks
//! - `migrations`: Embedded migration runner
//!
//! Models live in the `models` module at the crate root.

pub mod migrations;
pub mod pool;
