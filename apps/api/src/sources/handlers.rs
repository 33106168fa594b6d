use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::sources::devto::{is_valid_username, AuthorArticles, DevtoSearchParams};
use crate::sources::github::{is_valid_login, GithubSearchParams, UserRepos};
use crate::sources::npi::NpiSearchParams;
use crate::sources::postjobfree::{is_valid_resume_id, PostJobFreeSearchParams, ResumeDetails};
use crate::sources::{SourceError, SourcePage};
use crate::state::AppState;

/// Upstream 404s are the caller's miss, not a gateway failure.
fn not_found_as(what: String) -> impl FnOnce(SourceError) -> AppError {
    move |e| match e {
        SourceError::Http { status: 404, .. } => AppError::NotFound(what),
        e => e.into(),
    }
}

/// GET /api/github/search
pub async fn handle_github_search(
    State(state): State<AppState>,
    Query(params): Query<GithubSearchParams>,
) -> Result<Json<SourcePage>, AppError> {
    Ok(Json(state.github.search_users(&params).await?))
}

/// GET /api/github/user/:username/repos
pub async fn handle_github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserRepos>, AppError> {
    if !is_valid_login(&username) {
        return Err(AppError::Validation(format!("'{username}' is not a GitHub username")));
    }
    let repos = state
        .github
        .user_repos(&username)
        .await
        .map_err(not_found_as(format!("GitHub user {username} not found")))?;
    Ok(Json(repos))
}

/// GET /api/devto/search
pub async fn handle_devto_search(
    State(state): State<AppState>,
    Query(params): Query<DevtoSearchParams>,
) -> Result<Json<SourcePage>, AppError> {
    Ok(Json(state.devto.search_authors(&params).await?))
}

/// GET /api/devto/user/:username/articles
pub async fn handle_devto_articles(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<AuthorArticles>, AppError> {
    if !is_valid_username(&username) {
        return Err(AppError::Validation(format!("'{username}' is not a Dev.to username")));
    }
    let articles = state
        .devto
        .author_articles(&username)
        .await
        .map_err(not_found_as(format!("Dev.to user {username} not found")))?;
    Ok(Json(articles))
}

/// GET /api/npi/search
pub async fn handle_npi_search(
    State(state): State<AppState>,
    Query(params): Query<NpiSearchParams>,
) -> Result<Json<SourcePage>, AppError> {
    Ok(Json(state.npi.search(&params).await?))
}

/// GET /api/npi/provider/:npi
pub async fn handle_npi_provider(
    State(state): State<AppState>,
    Path(npi): Path<String>,
) -> Result<Json<Value>, AppError> {
    if npi.is_empty() || !npi.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::Validation(format!("'{npi}' is not an NPI number")));
    }
    state
        .npi
        .provider(&npi)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Provider {npi} not found")))
}

/// POST /api/npi/clear-cache
pub async fn handle_npi_clear_cache(State(state): State<AppState>) -> Json<Value> {
    let cleared = state.npi.clear_cache();
    Json(json!({ "message": "Cache cleared", "cleared": cleared }))
}

/// GET /api/postjobfree/search
pub async fn handle_postjobfree_search(
    State(state): State<AppState>,
    Query(params): Query<PostJobFreeSearchParams>,
) -> Result<Json<SourcePage>, AppError> {
    Ok(Json(state.postjobfree.search(&params).await?))
}

/// GET /api/postjobfree/resume/:id
pub async fn handle_postjobfree_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResumeDetails>, AppError> {
    if !is_valid_resume_id(&id) {
        return Err(AppError::Validation(format!("'{id}' is not a resume id")));
    }
    let details = state
        .postjobfree
        .resume(&id)
        .await
        .map_err(not_found_as(format!("Resume {id} not found")))?;
    Ok(Json(details))
}
