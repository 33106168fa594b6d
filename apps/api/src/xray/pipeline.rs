//! The X-Ray aggregation pipeline: search, screen, fetch, extract, build candidates.
//!
//! Per-item failures never escape this module. A request only degrades
//! (empty candidates plus a diagnostic) when no search page could be read.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::models::candidate::{Candidate, CandidateSource, FileType, RawResult};
use crate::xray::classifiers::{is_academic_article, is_blocked_domain};
use crate::xray::fetcher::DocumentFetcher;
use crate::xray::gate::{classify_resume, validate_resume_result, VerdictReason};
use crate::xray::identity::{extract_identity, Identity};
use crate::xray::query::{build_xray_query, external_search_url};
use crate::xray::search::{collect_results, SearchProvider, DEFAULT_PAGE_DELAY, DEFAULT_SEARCH_PAGES};
use crate::xray::text::{extract_text, DEFAULT_MAX_PAGES};
use crate::xray::urls::normalize_url;

pub const DEFAULT_MAX_PENDING: usize = 30;
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_LOCATION: &str = "USA";
const TITLE_MAX_CHARS: usize = 100;
const BIO_MAX_CHARS: usize = 300;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub search_pages: u32,
    pub page_delay: Duration,
    /// Upper bound on documents fetched per request.
    pub max_pending: usize,
    pub concurrency: usize,
    pub max_pdf_pages: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_pages: DEFAULT_SEARCH_PAGES,
            page_delay: DEFAULT_PAGE_DELAY,
            max_pending: DEFAULT_MAX_PENDING,
            concurrency: DEFAULT_CONCURRENCY,
            max_pdf_pages: DEFAULT_MAX_PAGES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XRayRequest {
    pub keywords: String,
    pub location: Option<String>,
    pub file_type: FileType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub candidates: Vec<Candidate>,
    pub total: usize,
    pub search_query: String,
    pub external_search_url: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub quota_exceeded: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub needs_setup: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cached: bool,
}

impl SearchResponse {
    /// Partial or failed responses must not be cached.
    pub fn is_degraded(&self) -> bool {
        self.quota_exceeded || self.needs_setup || self.error.is_some()
    }
}

/// A search hit that cleared both gates, tagged with its first-seen position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingResult {
    pub index: usize,
    pub result: RawResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Screening
// ────────────────────────────────────────────────────────────────────────────

/// Dedupes by normalised URL, applies the blocklist and both gates, and caps
/// the survivors at `max_pending`.
pub fn screen_results(results: Vec<RawResult>, max_pending: usize) -> Vec<PendingResult> {
    let mut seen = HashSet::new();
    let mut pending = Vec::new();

    for (index, result) in results.into_iter().enumerate() {
        if pending.len() >= max_pending {
            debug!(max_pending, "pending list full");
            break;
        }
        if !seen.insert(normalize_url(&result.url)) {
            debug!(url = %result.url, "duplicate result");
            continue;
        }
        if is_blocked_domain(&result.url) {
            log_rejection(&result, VerdictReason::BlockedDomain);
            continue;
        }

        let verdict = classify_resume(&result.url, &result.title, &result.snippet);
        if !verdict.accepted {
            log_rejection(&result, verdict.reason);
            continue;
        }
        let verdict = validate_resume_result(&result.title, &result.snippet, &result.url);
        if !verdict.accepted {
            log_rejection(&result, verdict.reason);
            continue;
        }

        pending.push(PendingResult { index, result });
    }

    pending
}

fn log_rejection(result: &RawResult, reason: VerdictReason) {
    debug!(url = %result.url, title = %result.title, ?reason, "result rejected");
}

// ────────────────────────────────────────────────────────────────────────────
// Enrichment
// ────────────────────────────────────────────────────────────────────────────

struct Enriched {
    index: usize,
    title: String,
    bio: String,
    url: String,
    name: String,
    identity: Identity,
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

async fn enrich_one(
    item: PendingResult,
    fetcher: Arc<dyn DocumentFetcher>,
    max_pages: usize,
) -> Option<Enriched> {
    let PendingResult { index, result } = item;

    let fetched = match fetcher.fetch(&result.url).await {
        Ok(doc) => doc,
        Err(e) => {
            warn!(url = %result.url, error = %e, "document fetch failed");
            return None;
        }
    };
    let document = extract_text(fetched, max_pages).await;
    if !document.is_usable() {
        debug!(
            url = %result.url,
            pages = document.page_count,
            chars = document.text.len(),
            "document text unusable"
        );
        return None;
    }
    debug!(url = %result.url, pages = document.page_count, "document extracted");

    let title = truncate_chars(&result.title, TITLE_MAX_CHARS);
    let bio = truncate_chars(&result.snippet, BIO_MAX_CHARS);
    if is_academic_article(&title, &bio, &document.text) {
        log_rejection(&result, VerdictReason::AcademicArticle);
        return None;
    }

    let identity = extract_identity(&document.text);
    let Some(name) = identity.qualified_name().map(str::to_string) else {
        debug!(url = %result.url, "no name found in document");
        return None;
    };

    Some(Enriched {
        index,
        title,
        bio,
        url: result.url,
        name,
        identity,
    })
}

/// Fetches and extracts pending documents with at most `concurrency` in
/// flight. Output is ordered by first-seen index.
pub async fn enrich_candidates(
    pending: Vec<PendingResult>,
    fetcher: Arc<dyn DocumentFetcher>,
    config: &PipelineConfig,
    location: Option<&str>,
    file_type: FileType,
) -> Vec<Candidate> {
    let permits = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for item in pending {
        let permits = permits.clone();
        let fetcher = fetcher.clone();
        let max_pages = config.max_pdf_pages;
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.ok()?;
            enrich_one(item, fetcher, max_pages).await
        });
    }

    let mut enriched = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(item)) => enriched.push(item),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "enrichment task aborted"),
        }
    }
    enriched.sort_by_key(|e| e.index);

    let location = location
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LOCATION);

    enriched
        .into_iter()
        .map(|e| Candidate {
            id: format!("xray-{}", e.index),
            title: e.title,
            location: location.to_string(),
            bio: e.bio,
            profile_url: e.url,
            source: CandidateSource::Aggregator,
            file_type,
            name: e.name,
            email: e.identity.email,
            phone: e.identity.phone,
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

pub struct XRayPipeline {
    provider: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn DocumentFetcher>,
    config: PipelineConfig,
}

impl XRayPipeline {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn DocumentFetcher>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            provider,
            fetcher,
            config,
        }
    }

    pub async fn run(&self, request: &XRayRequest) -> SearchResponse {
        let location = request.location.as_deref();
        let search_query = build_xray_query(&request.keywords, location, request.file_type);
        let external_search_url = external_search_url(&search_query);

        let outcome = collect_results(
            self.provider.as_ref(),
            &search_query,
            self.config.search_pages,
            self.config.page_delay,
        )
        .await;

        if outcome.pages_fetched == 0 {
            let error = if outcome.quota_exceeded {
                "Search quota exceeded. Try again later or use the external search link."
            } else {
                "Search provider unavailable. Try again later or use the external search link."
            };
            warn!(quota_exceeded = outcome.quota_exceeded, "no search pages fetched");
            return SearchResponse {
                search_query,
                external_search_url,
                quota_exceeded: outcome.quota_exceeded,
                error: Some(error.to_string()),
                ..SearchResponse::default()
            };
        }

        let raw_count = outcome.results.len();
        let pending = screen_results(outcome.results, self.config.max_pending);
        let pending_count = pending.len();
        let candidates = enrich_candidates(
            pending,
            self.fetcher.clone(),
            &self.config,
            location,
            request.file_type,
        )
        .await;

        info!(
            raw = raw_count,
            pending = pending_count,
            candidates = candidates.len(),
            "x-ray search complete"
        );

        let message = outcome
            .quota_exceeded
            .then(|| "Search quota reached; showing partial results.".to_string());

        SearchResponse {
            total: candidates.len(),
            candidates,
            search_query,
            external_search_url,
            quota_exceeded: outcome.quota_exceeded,
            message,
            ..SearchResponse::default()
        }
    }
}
