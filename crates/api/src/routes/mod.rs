//! HTTP route handlers.

pub mod auth;
pub mod contact;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod members;
pub mod news;
pub mod registration_requests;
pub mod users;
