use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bob_api::config::ServerConfig;
use bob_api::router::build_app_router;
use bob_api::state::AppState;
use bob_core::credentials::SystemCredentials;
use bob_core::crypto::SecretCipher;
use bob_pipeline::{CredentialResolver, Generators, PgStore, Workflow, WorkflowStore};
use bob_providers::brand::OpenAiBrandSynthesizer;
use bob_providers::card::HttpCardRenderer;
use bob_providers::coach::OpenAiCoach;
use bob_providers::images::PexelsImageSource;
use bob_providers::logos::DashScopeLogoGenerator;
use bob_providers::naming::OpenAiDomainGenerator;
use bob_providers::openai::ChatClient;
use bob_providers::rdap::RdapChecker;
use bob_providers::research::TavilyResearcher;
use bob_providers::site::OpenAiSiteGenerator;
use bob_providers::storage::LocalAssetStore;
use bob_providers::validator::OpenAiValidator;
use bob_providers::ProviderConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "bob_api=debug,bob_pipeline=debug,bob_providers=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = bob_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    bob_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    bob_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let store: Arc<dyn WorkflowStore> = Arc::new(PgStore::new(pool));

    // --- Generators ---
    let providers = ProviderConfig {
        uploads_dir: config.uploads_dir.clone(),
        uploads_url_prefix: config.public_base_path.clone(),
        ..ProviderConfig::from_env()
    };
    let generators = build_generators(&providers);
    tracing::info!(
        model = %providers.openai_model,
        site_model = %providers.openai_site_model,
        cards_enabled = providers.render_url.is_some(),
        "Generator adapters configured"
    );

    // --- Credentials ---
    let cipher = SecretCipher::new(&config.encryption_secret).expect("Invalid ENCRYPTION_SECRET");
    let credentials = CredentialResolver::new(store.clone(), cipher, SystemCredentials::from_env());

    // --- App state ---
    let workflow = Workflow::new(
        store.clone(),
        generators,
        credentials,
        config.workflow_config(),
    );
    let state = AppState {
        store,
        workflow,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wire the HTTP-backed adapters over one shared client.
fn build_generators(providers: &ProviderConfig) -> Generators {
    let client = reqwest::Client::new();
    let chat = ChatClient::new(client.clone(), providers.openai_base_url.clone());
    let model = providers.openai_model.clone();
    let assets = Arc::new(LocalAssetStore::new(
        providers.uploads_dir.clone(),
        providers.uploads_url_prefix.clone(),
    ));

    Generators {
        researcher: Arc::new(TavilyResearcher::new(
            client.clone(),
            providers.tavily_url.clone(),
        )),
        validator: Arc::new(OpenAiValidator::new(chat.clone(), model.clone())),
        domains: Arc::new(OpenAiDomainGenerator::new(
            chat.clone(),
            model.clone(),
            RdapChecker::new(client.clone()),
        )),
        logos: Arc::new(DashScopeLogoGenerator::new(
            client.clone(),
            providers.dashscope_base_url.clone(),
            providers.logo_model.clone(),
            providers.logo_poll_interval,
            providers.logo_poll_attempts,
        )),
        brand: Arc::new(OpenAiBrandSynthesizer::new(chat.clone(), model.clone())),
        cards: Arc::new(HttpCardRenderer::new(
            client.clone(),
            providers.render_url.clone(),
        )),
        images: Arc::new(PexelsImageSource::new(
            client,
            providers.pexels_url.clone(),
            chat.clone(),
            model.clone(),
        )),
        sites: Arc::new(OpenAiSiteGenerator::new(
            chat.clone(),
            providers.openai_site_model.clone(),
        )),
        assets: assets.clone(),
        packager: assets,
        coach: Arc::new(OpenAiCoach::new(chat, model)),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
