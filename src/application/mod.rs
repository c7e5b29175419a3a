//! Application layer
//!
//! Use cases take raw form input, turn it into domain value objects and
//! drive the domain services.

pub mod auth;
pub mod catalog;
