//! # Listora API Server Library
//!
//! This library provides the core functionality for the Listora API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Multipart form and image upload extraction
//! - `response`: Success response envelopes
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
