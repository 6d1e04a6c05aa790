//! Core types and shared functionality for crumb.
//!
//! This crate provides:
//! - Cookie records, verdicts and the expiry check
//! - Cookie storage with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod cookie;
pub mod error;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use cookie::{CookieRecord, NewCookie, ValidationOutcome, ValidationSummary};
pub use error::Error;
pub use store::{CookieDb, CookieStore};
