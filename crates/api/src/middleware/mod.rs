//! HTTP middleware components.

pub mod access;
pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod security_headers;
pub mod session_auth;
pub mod trace_id;

pub use access::{
    require_admin_dashboard, require_document_management, require_member_directory,
    require_news_management, require_profile, require_registration_approval,
    require_user_management,
};
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
pub use security_headers::security_headers_middleware;
pub use session_auth::{optional_session, require_session, CurrentSession};
pub use trace_id::{trace_id, RequestId, REQUEST_ID_HEADER};
