//! Access policy: the one place roles are compared.
//!
//! Membership is literal. `admin` passes a check only if the surface lists
//! `admin`; there is no implied hierarchy.

use crate::errors::DomainError;
use crate::models::{Role, SessionIdentity};

/// True iff an identity is present and its role is in `required`.
/// An empty `required` set admits any authenticated identity.
pub fn is_allowed(identity: Option<&SessionIdentity>, required: &[Role]) -> bool {
    match identity {
        None => false,
        Some(identity) => required.is_empty() || required.contains(&identity.role),
    }
}

/// Surfaces guarded by a required-roles set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedSurface {
    MemberDirectory,
    Profile,
    AdminDashboard,
    RegistrationApproval,
    UserManagement,
    DocumentManagement,
    NewsManagement,
}

impl ProtectedSurface {
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            ProtectedSurface::MemberDirectory | ProtectedSurface::Profile => &[],
            ProtectedSurface::AdminDashboard
            | ProtectedSurface::DocumentManagement
            | ProtectedSurface::NewsManagement => &[Role::Admin, Role::Editor],
            ProtectedSurface::RegistrationApproval | ProtectedSurface::UserManagement => {
                &[Role::Admin]
            }
        }
    }
}

/// Like [`is_allowed`] but tells the caller which failure to render.
pub fn authorize(
    identity: Option<&SessionIdentity>,
    surface: ProtectedSurface,
) -> Result<(), DomainError> {
    match identity {
        None => Err(DomainError::Unauthenticated),
        Some(_) if is_allowed(identity, surface.required_roles()) => Ok(()),
        Some(_) => Err(DomainError::AccessDenied),
    }
}
