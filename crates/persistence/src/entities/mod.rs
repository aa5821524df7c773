//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod document;
pub mod identity;
pub mod news;
pub mod registration_request;
pub mod session;

pub use document::DocumentEntity;
pub use identity::{ApprovalStatusDb, IdentityEntity, RequestedRoleDb, RoleDb};
pub use news::{NewsArticleEntity, NewsStatusDb};
pub use registration_request::RegistrationRequestEntity;
pub use session::SessionEntity;
