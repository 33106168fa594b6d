use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::candidate::FileType;
use crate::state::AppState;
use crate::xray::cache::CacheKey;
use crate::xray::pipeline::{SearchResponse, XRayRequest};
use crate::xray::query::{build_xray_query, external_search_url};

const SETUP_MESSAGE: &str = "Resume search needs a search API key. Set GOOGLE_API_KEY and GOOGLE_SEARCH_ENGINE_ID, or open the external search link.";

#[derive(Debug, Deserialize)]
pub struct XRaySearchParams {
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub filetype: Option<String>,
}

impl XRaySearchParams {
    fn into_request(self) -> Result<XRayRequest, AppError> {
        let keywords = self
            .keywords
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Validation("keywords is required".to_string()))?;
        let file_type = self
            .filetype
            .as_deref()
            .unwrap_or_default()
            .parse::<FileType>()
            .map_err(AppError::Validation)?;
        let location = self
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        Ok(XRayRequest {
            keywords,
            location,
            file_type,
        })
    }
}

/// GET /api/google-resumes/search
pub async fn handle_xray_search(
    State(state): State<AppState>,
    Query(params): Query<XRaySearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let request = params.into_request()?;

    let Some(pipeline) = state.xray.as_ref() else {
        let search_query =
            build_xray_query(&request.keywords, request.location.as_deref(), request.file_type);
        return Ok(Json(SearchResponse {
            external_search_url: external_search_url(&search_query),
            search_query,
            needs_setup: true,
            message: Some(SETUP_MESSAGE.to_string()),
            ..SearchResponse::default()
        }));
    };

    let key = CacheKey::new(&request.keywords, request.location.as_deref(), request.file_type);
    if let Some(mut hit) = state.search_cache.get(&key).await {
        info!(keywords = %request.keywords, "x-ray search served from cache");
        hit.cached = true;
        return Ok(Json(hit));
    }

    let response = pipeline.run(&request).await;
    if !response.is_degraded() {
        state.search_cache.put(&key, &response).await;
    }
    Ok(Json(response))
}
