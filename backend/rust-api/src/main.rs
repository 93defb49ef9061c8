use std::sync::Arc;

use astroquiz_api::{
    config::Config,
    create_router,
    services::{rank_seed, AppState},
    store::MemoryStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "astroquiz_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting AstroQuiz API");

    let config = Config::load().expect("Failed to load configuration");

    let store = Arc::new(MemoryStore::new());
    if config.seed_default_ranks {
        rank_seed::bootstrap(store.as_ref())
            .await
            .expect("Failed to seed default ranks");
    }

    let app_state = Arc::new(AppState::new(config.clone(), store));
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Server listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
