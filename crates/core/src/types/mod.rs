//! Core types for Vitrine.
//!
//! Each type validates on construction, so a value that exists is a value
//! the record store accepts.

pub mod email;
pub mod id;
pub mod price;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use username::{Username, UsernameError};
