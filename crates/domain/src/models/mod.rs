//! Domain models for the union portal.

pub mod contact;
pub mod document;
pub mod identity;
pub mod member;
pub mod news;
pub mod registration_request;
pub mod role;

pub use contact::{ContactMessage, ContactReceipt};
pub use document::{Document, DocumentInput, DocumentQuery, DocumentStats};
pub use identity::{
    ActivityStatus, Identity, IdentityFilter, IdentityStats, LoginRequest, NewIdentity,
    ProfileUpdate, RegisterRequest, RegistrationReceipt, SessionIdentity, SetActiveRequest,
    StoredCredentials, UpdateProfileRequest,
};
pub use member::{DashboardSummary, MemberEntry, MemberQuery};
pub use news::{ManageNewsQuery, NewsArticle, NewsInput, NewsQuery, NewsStats, NewsStatus};
pub use registration_request::{
    ApplicantProfile, ApprovalEvent, DecisionAction, DecisionOutcome, DecisionPayload,
    DecisionRecord, NewRegistrationRequest, RegistrationRequest, RegistrationStats,
    RequestFilter,
};
pub use role::{ApprovalStatus, ParseVariantError, RequestedRole, Role};
