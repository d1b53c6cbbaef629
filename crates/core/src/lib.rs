//! Vitrine Core - Shared domain types.
//!
//! This crate provides the value types used across the Vitrine components:
//! - `api` - Vendor and public JSON API server
//! - `cli` - Migrations and staff management commands
//!
//! # Architecture
//!
//! The core crate contains only types and their validation rules - no I/O,
//! no database access, no HTTP. With the `postgres` feature enabled the types
//! can be bound to and decoded from sqlx queries directly.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, emails, usernames and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
