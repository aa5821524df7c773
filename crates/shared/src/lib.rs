//! Shared utilities for the union portal backend.
//!
//! - Password hashing with Argon2id
//! - Session token issuing and validation (JWT)
//! - Reusable `validator` rules for request payloads

pub mod jwt;
pub mod password;
pub mod validation;
