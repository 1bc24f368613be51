use std::sync::Arc;

use anyhow::{Context, Result};
use seolens::{
    api,
    app_state::{AppState, Collaborators},
    config::{Config, SearchBackend},
    extractor::{ExtractionCache, Renderer, TemplateRenderer, TextExtractor},
    llm::HttpChatClient,
    repositories::{ContentStore, PgContentStore, PgVocabularyStore, SortDirection, SortField},
    search::{HttpSimilarityIndex, LocalIndex, SimilarityIndex},
    telemetry,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let config = Config::from_env()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(config.database_url())
        .await
        .context("connecting to database")?;

    let content_store: Arc<dyn ContentStore> = Arc::new(PgContentStore::new(pool.clone()));
    let renderer: Arc<dyn Renderer> = Arc::new(TemplateRenderer::new());

    let index: Arc<dyn SimilarityIndex> = match config.search_backend() {
        SearchBackend::Http => Arc::new(HttpSimilarityIndex::new(
            config.search_url(),
            config.search_index(),
            config.search_api_key(),
        )?),
        SearchBackend::Local => {
            let local = LocalIndex::new()?;
            seed_local_index(&local, content_store.as_ref(), renderer.clone(), &config).await?;
            Arc::new(local)
        }
    };

    let chat = Arc::new(HttpChatClient::new(
        config.chat_provider(),
        config.chat_endpoint(),
        config.chat_api_key(),
        config.chat_timeout_secs(),
    )?);

    let state = AppState::new(
        Collaborators {
            content_store,
            vocabulary: Arc::new(PgVocabularyStore::new(pool)),
            index,
            chat,
            renderer,
        },
        &config,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("binding {}", config.bind_addr()))?;
    info!(addr = config.bind_addr(), "listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Fills the in-process index with every published record.
async fn seed_local_index(
    index: &LocalIndex,
    store: &dyn ContentStore,
    renderer: Arc<dyn Renderer>,
    config: &Config,
) -> Result<()> {
    let records = store
        .load_published(config.content_type(), SortField::Created, SortDirection::Desc)
        .await?;
    let extractor = TextExtractor::new(renderer);
    let cache = ExtractionCache::new();

    for record in &records {
        match extractor.extract(record, &cache) {
            Ok(text) => index.upsert(record.id, &record.title, &record.content_type, &text)?,
            Err(e) => warn!(record_id = %record.id, error = %e, "skipping record in local index"),
        }
    }
    info!(documents = index.len(), "local index ready");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
