//! Domain services for the union portal.
//!
//! Services hold the business rules and talk to storage only through the
//! repository traits.

pub mod access_policy;
pub mod approval;
pub mod content;
pub mod directory;
pub mod identity;

pub use access_policy::{authorize, is_allowed, ProtectedSurface};
pub use approval::{ApprovalEventListener, ApprovalWorkflow, Decision, RecordingApprovalListener};
pub use content::ContentService;
pub use directory::DirectoryService;
pub use identity::IdentityService;
