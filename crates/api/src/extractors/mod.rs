//! Custom Axum extractors.

pub mod json_body;
pub mod session;

pub use json_body::OptionalJson;
pub use session::{OptionalSession, Session};
