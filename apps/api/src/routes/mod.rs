pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::sources::handlers as sources;
use crate::state::AppState;
use crate::xray::handlers as xray;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/google-resumes/search", get(xray::handle_xray_search))
        .route("/api/github/search", get(sources::handle_github_search))
        .route(
            "/api/github/user/:username/repos",
            get(sources::handle_github_repos),
        )
        .route("/api/devto/search", get(sources::handle_devto_search))
        .route(
            "/api/devto/user/:username/articles",
            get(sources::handle_devto_articles),
        )
        .route("/api/npi/search", get(sources::handle_npi_search))
        .route("/api/npi/provider/:npi", get(sources::handle_npi_provider))
        .route("/api/npi/clear-cache", post(sources::handle_npi_clear_cache))
        .route("/api/postjobfree/search", get(sources::handle_postjobfree_search))
        .route("/api/postjobfree/resume/:id", get(sources::handle_postjobfree_resume))
        .with_state(state)
}
