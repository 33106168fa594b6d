mod config;
mod errors;
mod models;
mod routes;
mod sources;
mod state;
mod xray;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::sources::devto::DevtoClient;
use crate::sources::github::GithubClient;
use crate::sources::npi::NpiClient;
use crate::sources::postjobfree::PostJobFreeClient;
use crate::sources::SOURCE_USER_AGENT;
use crate::state::AppState;
use crate::xray::cache::{InMemorySearchCache, RedisSearchCache, SearchCache, SystemClock};
use crate::xray::fetcher::HttpDocumentFetcher;
use crate::xray::pipeline::XRayPipeline;
use crate::xray::search::GoogleCustomSearch;

const SOURCE_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting candidate-search v{}", env!("CARGO_PKG_VERSION"));

    let clock = Arc::new(SystemClock);
    let http = reqwest::Client::builder()
        .user_agent(SOURCE_USER_AGENT)
        .timeout(SOURCE_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    // Resume search stays in setup mode until both Google credentials exist
    let xray = match config.search_credentials() {
        Some((api_key, engine_id)) => {
            let provider = GoogleCustomSearch::new(http.clone(), api_key, engine_id);
            let fetcher = HttpDocumentFetcher::new(config.fetch_timeout())
                .context("failed to build document fetcher")?;
            info!(
                pages = config.search_pages,
                concurrency = config.fetch_concurrency,
                "Resume search enabled"
            );
            Some(Arc::new(XRayPipeline::new(
                Arc::new(provider),
                Arc::new(fetcher),
                config.pipeline(),
            )))
        }
        None => {
            warn!("GOOGLE_API_KEY / GOOGLE_SEARCH_ENGINE_ID not set; resume search will report needsSetup");
            None
        }
    };

    let search_cache: Arc<dyn SearchCache> = match &config.redis_url {
        Some(url) => {
            info!("Search cache: redis");
            Arc::new(RedisSearchCache::new(url, config.cache_ttl_secs)?)
        }
        None => {
            info!("Search cache: in-memory");
            Arc::new(InMemorySearchCache::new(config.cache_ttl_secs, clock.clone()))
        }
    };

    let state = AppState {
        xray,
        search_cache,
        github: Arc::new(GithubClient::new(
            http.clone(),
            config.github_api_url.clone(),
            config.github_token.clone(),
        )),
        devto: Arc::new(DevtoClient::new(http.clone(), config.devto_api_url.clone())),
        postjobfree: Arc::new(PostJobFreeClient::new(
            http.clone(),
            config.postjobfree_url.clone(),
        )),
        npi: Arc::new(NpiClient::new(
            http,
            config.npi_api_url.clone(),
            config.cache_ttl_secs,
            clock,
        )),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
