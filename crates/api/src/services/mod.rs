//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Vendor login and password management
//! - `ownership` - Per-record ownership checks for vendor handlers

pub mod auth;
pub mod ownership;

pub use auth::{AuthError, AuthService};
pub use ownership::{NotOwner, Ownable, ensure_owner};
