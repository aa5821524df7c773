//! Admin bootstrap for initial setup.
//!
//! Creates the first admin identity on startup if configured. Does nothing
//! once an identity with the bootstrap email exists.

use domain::errors::DomainError;
use domain::services::IdentityService;
use shared::password::MIN_PASSWORD_LENGTH;
use tracing::{info, warn};

use crate::config::AdminBootstrapConfig;

/// Error types for admin bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Bootstrap the admin identity if configured and not already done.
///
/// Call after migrations on startup.
pub async fn bootstrap_admin(
    identity: &IdentityService,
    config: &AdminBootstrapConfig,
) -> Result<(), BootstrapError> {
    if config.email.trim().is_empty() {
        return Ok(());
    }

    if config.password.is_empty() {
        warn!(
            "UP__BOOTSTRAP__EMAIL is set but UP__BOOTSTRAP__PASSWORD is empty - skipping bootstrap"
        );
        return Ok(());
    }

    if config.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(BootstrapError::Config(format!(
            "Bootstrap password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    let created = identity
        .ensure_admin(
            config.email.trim(),
            &config.password,
            &config.first_name,
            &config.last_name,
        )
        .await?;

    match created {
        Some(admin) => {
            info!(identity_id = %admin.id, email = %admin.email, "Bootstrap admin created");
            warn!(
                "SECURITY: Remove UP__BOOTSTRAP__EMAIL and UP__BOOTSTRAP__PASSWORD \
                 from configuration after initial setup"
            );
        }
        None => info!("Bootstrap email already registered - skipping bootstrap"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{LoginRequest, Role};
    use domain::repositories::InMemoryStore;
    use std::sync::Arc;
    use uuid::Uuid;

    fn service() -> IdentityService {
        let store = Arc::new(InMemoryStore::new());
        IdentityService::new(store.clone(), store.clone(), store)
    }

    fn config(email: &str, password: &str) -> AdminBootstrapConfig {
        AdminBootstrapConfig {
            email: email.to_string(),
            password: password.to_string(),
            first_name: "System".to_string(),
            last_name: "Administrator".to_string(),
        }
    }

    #[tokio::test]
    async fn test_bootstrap_creates_admin_once() {
        let identity = service();
        let cfg = config("admin@union.example", "admin-pass");

        bootstrap_admin(&identity, &cfg).await.unwrap();
        bootstrap_admin(&identity, &cfg).await.unwrap();

        let session = identity
            .login(
                Uuid::new_v4(),
                LoginRequest {
                    email: "admin@union.example".to_string(),
                    password: "admin-pass".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(session.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_bootstrap_skipped_without_email() {
        let identity = service();
        assert!(bootstrap_admin(&identity, &config("", "whatever")).await.is_ok());
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_short_password() {
        let identity = service();
        let result = bootstrap_admin(&identity, &config("admin@union.example", "abc")).await;
        assert!(matches!(result, Err(BootstrapError::Config(_))));
    }
}
