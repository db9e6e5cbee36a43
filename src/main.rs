use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twiller_api::config::{environment::Config, init_db, init_redis};
use twiller_api::modules::posts::crud::MySqlPostRepository;
use twiller_api::modules::users::crud::MySqlUserRepository;
use twiller_api::modules::verification::store::RedisVerificationStore;
use twiller_api::services::identity::HttpIdentityAuthority;
use twiller_api::services::jwt::IdTokenService;
use twiller_api::services::mailer::HttpMailer;
use twiller_api::services::payment::RazorpayClient;
use twiller_api::services::sms::TwilioSms;
use twiller_api::Collaborators;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twiller_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load environment configuration");

    let db = init_db(&config.database_url).await.expect("Failed to connect to MySQL");
    tracing::info!("Connected to MySQL");

    let redis = init_redis(&config.redis_url).expect("Invalid REDIS_URL");
    tracing::info!("Redis client ready");

    let http = reqwest::Client::new();

    let deps = Collaborators {
        users: Arc::new(MySqlUserRepository::new(db.clone())),
        posts: Arc::new(MySqlPostRepository::new(db)),
        verifications: Arc::new(RedisVerificationStore::new(redis)),
        identity: Arc::new(HttpIdentityAuthority::new(
            http.clone(),
            config.identity_api_url,
            config.identity_api_key,
            IdTokenService::new(config.id_token_secret),
        )),
        mailer: Arc::new(HttpMailer::new(http.clone(), config.mail_api_url, config.mail_api_key)),
        sms: Arc::new(TwilioSms::new(
            http.clone(),
            config.sms_api_url,
            config.sms_account_sid,
            config.sms_auth_token,
            config.sms_from,
        )),
        payments: Arc::new(RazorpayClient::new(
            http,
            config.payment_api_url,
            config.payment_key_id,
            config.payment_key_secret,
        )),
    };

    let app = twiller_api::create_app(deps, config.settings).expect("Failed to build metrics registry");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await.unwrap();
    tracing::info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await.unwrap();
}
