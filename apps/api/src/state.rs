use std::sync::Arc;

use crate::config::Config;
use crate::sources::devto::DevtoClient;
use crate::sources::github::GithubClient;
use crate::sources::npi::NpiClient;
use crate::sources::postjobfree::PostJobFreeClient;
use crate::xray::cache::SearchCache;
use crate::xray::pipeline::XRayPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` until Google search credentials are configured.
    pub xray: Option<Arc<XRayPipeline>>,
    /// In-memory by default, redis when REDIS_URL is set.
    pub search_cache: Arc<dyn SearchCache>,
    pub github: Arc<GithubClient>,
    pub devto: Arc<DevtoClient>,
    pub npi: Arc<NpiClient>,
    pub postjobfree: Arc<PostJobFreeClient>,
}
