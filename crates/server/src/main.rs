//! Ajoclub server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use ajoclub_api::{AppState, identity_middleware, router as api_router};
use ajoclub_common::{Config, LocalStorage, StorageConfig, StorageService};
use ajoclub_core::{
    ContributionService, InvestmentService, SupportService, UploadPolicySet, UploadService,
    UserService,
};
use ajoclub_db::repositories::{
    ContributionRepository, FaqRepository, InquiryRepository, InvestmentOpportunityRepository,
    InvestmentParticipantRepository, InvestmentUpdateRepository, UploadedFileRepository,
    UserRepository,
};
use axum::{Router, middleware};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Largest request body the server accepts; the upload router applies
/// the tighter per-purpose ceilings on top.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ajoclub=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting ajoclub server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = ajoclub_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    ajoclub_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize blob storage
    let storage: StorageService = match config.storage.clone() {
        StorageConfig::Local {
            base_path,
            base_url,
        } => {
            info!(path = %base_path.display(), "Using local blob storage");
            Arc::new(LocalStorage::new(base_path, base_url))
        }
        #[cfg(feature = "s3")]
        StorageConfig::S3 {
            endpoint,
            bucket,
            region,
            access_key_id,
            secret_access_key,
            public_url,
            prefix,
        } => {
            info!(bucket = %bucket, "Using S3 blob storage");
            Arc::new(
                ajoclub_common::storage::S3Storage::new(
                    &endpoint,
                    bucket,
                    &region,
                    &access_key_id,
                    &secret_access_key,
                    public_url,
                    prefix,
                )
                .await?,
            )
        }
        #[cfg(not(feature = "s3"))]
        StorageConfig::S3 { .. } => {
            return Err("S3 storage configured but the server was built without the s3 feature"
                .to_string()
                .into());
        }
    };

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let uploaded_file_repo = UploadedFileRepository::new(Arc::clone(&db));
    let contribution_repo = ContributionRepository::new(Arc::clone(&db));
    let opportunity_repo = InvestmentOpportunityRepository::new(Arc::clone(&db));
    let participant_repo = InvestmentParticipantRepository::new(Arc::clone(&db));
    let update_repo = InvestmentUpdateRepository::new(Arc::clone(&db));
    let inquiry_repo = InquiryRepository::new(Arc::clone(&db));
    let faq_repo = FaqRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo.clone(), uploaded_file_repo.clone());
    let upload_service = UploadService::new(
        uploaded_file_repo.clone(),
        storage,
        UploadPolicySet::default(),
    );
    let contribution_service =
        ContributionService::new(contribution_repo, uploaded_file_repo);
    let investment_service = InvestmentService::new(
        opportunity_repo,
        participant_repo,
        update_repo,
        user_repo,
    );
    let support_service = SupportService::new(inquiry_repo, faq_repo);

    // Create app state
    let state = AppState {
        user_service,
        upload_service,
        contribution_service,
        investment_service,
        support_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
