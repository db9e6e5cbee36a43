pub mod config;
pub mod error;
pub mod modules;
pub mod services;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use config::ServiceSettings;
use modules::metrics::metrics_routes;
use modules::posts::{post_routes, PostRepository};
use modules::quota::{quota_routes, QuotaEngine};
use modules::recovery::{recovery_routes, RecoveryController};
use modules::subscription::subscription_routes;
use modules::users::{user_routes, UserRepository};
use modules::verification::{verification_routes, OtpManager, VerificationStore};
use services::admission::AdmissionGate;
use services::identity::IdentityAuthority;
use services::mailer::EmailTransport;
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::payment::PaymentGateway;
use services::security::security_headers;
use services::sms::SmsTransport;

pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub identity: Arc<dyn IdentityAuthority>,
    pub mailer: Arc<dyn EmailTransport>,
    pub payments: Arc<dyn PaymentGateway>,
    pub otp: OtpManager,
    pub quota: QuotaEngine,
    pub recovery: RecoveryController,
    pub gate: AdmissionGate,
    pub metrics: Arc<MetricsRegistry>,
    pub settings: ServiceSettings,
}

/// Storage backends and outbound adapters the service is built from.
#[derive(Clone)]
pub struct Collaborators {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub verifications: Arc<dyn VerificationStore>,
    pub identity: Arc<dyn IdentityAuthority>,
    pub mailer: Arc<dyn EmailTransport>,
    pub sms: Arc<dyn SmsTransport>,
    pub payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(deps: Collaborators, settings: ServiceSettings) -> Result<Self, prometheus::Error> {
        let otp = OtpManager::new(
            deps.verifications,
            deps.users.clone(),
            deps.mailer.clone(),
            deps.sms,
            settings.otp_ttl,
            settings.mail_from.clone(),
        );

        let quota = QuotaEngine::new(deps.posts.clone(), settings.quota_window);

        let recovery = RecoveryController::new(
            deps.users.clone(),
            deps.identity.clone(),
            deps.mailer.clone(),
            settings.reset_cooldown,
            settings.mail_from.clone(),
        );

        Ok(Self {
            users: deps.users,
            posts: deps.posts,
            identity: deps.identity,
            mailer: deps.mailer,
            payments: deps.payments,
            otp,
            quota,
            recovery,
            gate: AdmissionGate::new(settings.admission),
            metrics: MetricsRegistry::new()?,
            settings,
        })
    }
}

pub fn create_app(deps: Collaborators, settings: ServiceSettings) -> Result<Router, prometheus::Error> {
    let state = Arc::new(AppState::new(deps, settings)?);

    let router = Router::new()
        .route("/", get(root))
        .merge(metrics_routes())
        .merge(user_routes())
        .merge(post_routes())
        .merge(quota_routes())
        .merge(verification_routes())
        .merge(recovery_routes())
        .merge(subscription_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(1024 * 100)) // 100KB max body
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    Ok(router)
}

async fn root() -> &'static str {
    "Twiller API"
}
