//! Vitrine API library.
//!
//! Vendor back office and public catalogue for the Vitrine multi-vendor
//! storefront, exposed as a library so the binary, the CLI and the tests
//! share one router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
