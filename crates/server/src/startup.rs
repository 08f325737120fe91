use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, StorageConfig};
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::{
    file::{dictionary_store::DictionaryStore, synonym_store::SynonymStore},
    runtime,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Ensure the data directory, then open both stores.
pub async fn build_state(storage: &StorageConfig) -> anyhow::Result<ServerState> {
    runtime::ensure_env(&storage.data_path()).await?;

    let dictionary = DictionaryStore::load(storage.dictionary_path()).await;
    let synonyms = SynonymStore::new(storage.synonyms_path()).await;
    info!(
        dictionary = %dictionary.path().display(),
        synonyms = %synonyms.path().display(),
        entries = dictionary.get().len(),
        "stores ready"
    );
    Ok(ServerState { dictionary, synonyms })
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Public entry: load config, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_or_env()?;
    run_with_config(cfg).await
}

pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg.storage).await?;
    let app = build_app(state);

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    info!(%addr, "starting dictionary server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
