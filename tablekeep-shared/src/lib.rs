//! # Tablekeep Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the Tablekeep API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and authorization utilities
//! - `db`: Connection pooling and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Tablekeep shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
