use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use domain::repositories::{
    DocumentRepository, IdentityRepository, InMemoryStore, NewsRepository,
    RegistrationRequestRepository, SessionStore, StorageHealth,
};
use domain::services::{ApprovalWorkflow, ContentService, DirectoryService, IdentityService};
use persistence::db::PgStorageHealth;
use persistence::repositories::{
    PgDocumentRepository, PgIdentityRepository, PgNewsRepository,
    PgRegistrationRequestRepository, PgSessionStore,
};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, optional_session, rate_limit_middleware,
    require_admin_dashboard, require_document_management, require_member_directory,
    require_news_management, require_profile, require_registration_approval, require_session,
    require_user_management, security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{
    auth, contact, dashboard, documents, health, members, news, registration_requests, users,
};

/// Storage ports the services are wired to.
#[derive(Clone)]
pub struct Repositories {
    pub identities: Arc<dyn IdentityRepository>,
    pub registrations: Arc<dyn RegistrationRequestRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub documents: Arc<dyn DocumentRepository>,
    pub news: Arc<dyn NewsRepository>,
    pub health: Arc<dyn StorageHealth>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            identities: Arc::new(PgIdentityRepository::new(pool.clone())),
            registrations: Arc::new(PgRegistrationRequestRepository::new(pool.clone())),
            sessions: Arc::new(PgSessionStore::new(pool.clone())),
            documents: Arc::new(PgDocumentRepository::new(pool.clone())),
            news: Arc::new(PgNewsRepository::new(pool.clone())),
            health: Arc::new(PgStorageHealth::new(pool)),
        }
    }

    /// All ports backed by one in-memory store.
    pub fn in_memory(store: InMemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            identities: store.clone(),
            registrations: store.clone(),
            sessions: store.clone(),
            documents: store.clone(),
            news: store.clone(),
            health: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub identity: IdentityService,
    pub approvals: ApprovalWorkflow,
    pub content: ContentService,
    pub directory: DirectoryService,
    pub storage_health: Arc<dyn StorageHealth>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    /// Wires the services to `repositories`. Fails only on unusable JWT keys.
    pub fn new(config: Config, repositories: Repositories) -> Result<Self, JwtError> {
        let jwt = JwtConfig::new(
            &config.jwt.private_key,
            &config.jwt.public_key,
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        )?;

        // A slot lives exactly as long as the token that names it, leeway included.
        let session_lifetime = chrono::Duration::seconds(
            config.jwt.access_token_expiry_secs + config.jwt.leeway_secs as i64,
        );
        let identity = IdentityService::new(
            repositories.identities.clone(),
            repositories.registrations.clone(),
            repositories.sessions.clone(),
        )
        .with_session_lifetime(session_lifetime);
        let approvals = ApprovalWorkflow::new(
            repositories.registrations.clone(),
            Arc::new(identity.clone()),
        );
        let content = ContentService::new(repositories.documents, repositories.news);
        let directory = DirectoryService::new(repositories.identities);

        let rate_limiter =
            RateLimiterState::new(config.security.auth_rate_limit_per_minute).map(Arc::new);

        Ok(Self {
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            identity,
            approvals,
            content,
            directory,
            storage_health: repositories.health,
            rate_limiter,
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Login, registration and the contact form: public, rate limited per client
    let auth_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/contact", post(contact::submit_contact))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Own session and profile
    // Middleware order: session runs first (outermost layer), then the role guard
    let profile_routes = Router::new()
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        .route(
            "/api/v1/auth/profile",
            get(auth::profile).put(auth::update_profile),
        )
        .route_layer(middleware::from_fn(require_profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    // Public content; a presented session widens document visibility
    let content_routes = Router::new()
        .route("/api/v1/documents", get(documents::list_documents))
        .route("/api/v1/documents/:id", get(documents::get_document))
        .route(
            "/api/v1/documents/:id/download",
            post(documents::download_document),
        )
        .route("/api/v1/news", get(news::list_news))
        .route("/api/v1/news/:id", get(news::get_article))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_session,
        ));

    let member_routes = Router::new()
        .route("/api/v1/members", get(members::list_members))
        .route_layer(middleware::from_fn(require_member_directory))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let dashboard_routes = Router::new()
        .route("/api/v1/admin/dashboard", get(dashboard::get_dashboard))
        .route_layer(middleware::from_fn(require_admin_dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let document_management_routes = Router::new()
        .route(
            "/api/v1/admin/documents",
            get(documents::manage_documents).post(documents::create_document),
        )
        .route(
            "/api/v1/admin/documents/:id",
            put(documents::update_document).delete(documents::delete_document),
        )
        .route_layer(middleware::from_fn(require_document_management))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let news_management_routes = Router::new()
        .route(
            "/api/v1/admin/news",
            get(news::manage_news).post(news::create_article),
        )
        .route(
            "/api/v1/admin/news/:id",
            put(news::update_article).delete(news::delete_article),
        )
        .route_layer(middleware::from_fn(require_news_management))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let user_management_routes = Router::new()
        .route("/api/v1/admin/users", get(users::list_users))
        .route("/api/v1/admin/users/:id/status", put(users::set_user_active))
        .route_layer(middleware::from_fn(require_user_management))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    let approval_routes = Router::new()
        .route(
            "/api/v1/admin/registration-requests",
            get(registration_requests::list_requests),
        )
        .route(
            "/api/v1/admin/registration-requests/stats",
            get(registration_requests::get_stats),
        )
        .route(
            "/api/v1/admin/registration-requests/decisions",
            post(registration_requests::decide),
        )
        .route(
            "/api/v1/admin/registration-requests/:id",
            get(registration_requests::get_request),
        )
        .route(
            "/api/v1/admin/registration-requests/:id/approve",
            post(registration_requests::approve_request),
        )
        .route(
            "/api/v1/admin/registration-requests/:id/reject",
            post(registration_requests::reject_request),
        )
        .route_layer(middleware::from_fn(require_registration_approval))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(profile_routes)
        .merge(content_routes)
        .merge(member_routes)
        .merge(dashboard_routes)
        .merge(document_management_routes)
        .merge(news_management_routes)
        .merge(user_management_routes)
        .merge(approval_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
