//! Vidtube server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, middleware};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidtube_api::{middleware::AppState, router as api_router};
use vidtube_common::{Config, LocalMediaStorage, MediaStorage};
use vidtube_core::{
    CommentService, DashboardService, LikeService, MediaService, PlaylistService, RelationService,
    SubscriptionService, TweetService, UserService, VideoService,
};
use vidtube_db::repositories::{
    CommentRepository, PlaylistRepository, RelationRepository, TweetRepository, UserRepository,
    VideoRepository,
};

/// Upper bound on request bodies; video uploads arrive as multipart.
const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
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
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidtube=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting vidtube server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = vidtube_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    vidtube_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Initialize repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let video_repo = VideoRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let tweet_repo = TweetRepository::new(Arc::clone(&db));
    let playlist_repo = PlaylistRepository::new(Arc::clone(&db));
    let relation_repo = RelationRepository::new(Arc::clone(&db));

    // Media storage backed by the local filesystem
    let media_path = PathBuf::from(&config.media.base_path);
    tokio::fs::create_dir_all(&media_path).await?;
    let storage: Arc<dyn MediaStorage> = Arc::new(LocalMediaStorage::new(
        media_path.clone(),
        format!(
            "{}{}",
            config.server.url.trim_end_matches('/'),
            config.media.base_url
        ),
    ));
    let media_service = MediaService::new(storage);

    // Initialize services
    let relation_service = RelationService::new(relation_repo.clone());
    let user_service = UserService::new(
        user_repo.clone(),
        relation_repo.clone(),
        media_service.clone(),
    );
    let video_service = VideoService::new(
        video_repo.clone(),
        relation_service.clone(),
        media_service,
    );
    let comment_service = CommentService::new(
        comment_repo.clone(),
        video_repo.clone(),
        relation_service.clone(),
    );
    let tweet_service = TweetService::new(
        tweet_repo.clone(),
        user_repo.clone(),
        relation_service.clone(),
    );
    let playlist_service = PlaylistService::new(
        playlist_repo,
        video_repo.clone(),
        relation_service.clone(),
    );
    let like_service = LikeService::new(
        relation_service.clone(),
        video_repo.clone(),
        comment_repo,
        tweet_repo,
    );
    let subscription_service = SubscriptionService::new(relation_service, user_repo);
    let dashboard_service = DashboardService::new(video_repo, relation_repo);

    let state = AppState {
        user_service,
        video_service,
        comment_service,
        tweet_service,
        playlist_service,
        like_service,
        subscription_service,
        dashboard_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api/v1", api_router())
        .nest_service(&config.media.base_url, ServeDir::new(media_path))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            vidtube_api::middleware::auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
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
