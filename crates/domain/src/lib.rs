//! Domain layer for the union portal backend.
//!
//! This crate contains:
//! - Domain models (Identity, RegistrationRequest, Document, NewsArticle)
//! - Repository traits and the in-memory store
//! - Business services (access policy, sessions, approval workflow, content)
//! - Domain error types

pub mod errors;
pub mod models;
pub mod repositories;
pub mod services;
