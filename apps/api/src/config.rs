use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::sources::{
    devto::DEVTO_API_URL, github::GITHUB_API_URL, npi::NPI_API_URL, postjobfree::POSTJOBFREE_URL,
};
use crate::xray::cache::DEFAULT_TTL_SECS;
use crate::xray::pipeline::{PipelineConfig, DEFAULT_CONCURRENCY, DEFAULT_MAX_PENDING};
use crate::xray::search::{DEFAULT_PAGE_DELAY, DEFAULT_SEARCH_PAGES};
use crate::xray::text::DEFAULT_MAX_PAGES;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Application configuration loaded from environment variables.
/// Everything has a default; resume search stays in setup mode until both
/// Google credentials are present.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub google_api_key: Option<String>,
    pub google_search_engine_id: Option<String>,
    pub search_pages: u32,
    pub search_page_delay_ms: u64,
    pub max_pending_candidates: usize,
    pub fetch_concurrency: usize,
    pub fetch_timeout_secs: u64,
    pub max_pdf_pages: usize,
    pub cache_ttl_secs: u64,
    pub redis_url: Option<String>,
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub devto_api_url: String,
    pub npi_api_url: String,
    pub postjobfree_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3001,
            rust_log: "info".to_string(),
            google_api_key: None,
            google_search_engine_id: None,
            search_pages: DEFAULT_SEARCH_PAGES,
            search_page_delay_ms: DEFAULT_PAGE_DELAY.as_millis() as u64,
            max_pending_candidates: DEFAULT_MAX_PENDING,
            fetch_concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_pdf_pages: DEFAULT_MAX_PAGES,
            cache_ttl_secs: DEFAULT_TTL_SECS,
            redis_url: None,
            github_token: None,
            github_api_url: GITHUB_API_URL.to_string(),
            devto_api_url: DEVTO_API_URL.to_string(),
            npi_api_url: NPI_API_URL.to_string(),
            postjobfree_url: POSTJOBFREE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            google_api_key: optional_env("GOOGLE_API_KEY"),
            google_search_engine_id: optional_env("GOOGLE_SEARCH_ENGINE_ID"),
            search_pages: parse_env("SEARCH_PAGES", defaults.search_pages)?,
            search_page_delay_ms: parse_env("SEARCH_PAGE_DELAY_MS", defaults.search_page_delay_ms)?,
            max_pending_candidates: parse_env("MAX_PENDING_CANDIDATES", defaults.max_pending_candidates)?,
            fetch_concurrency: parse_env("FETCH_CONCURRENCY", defaults.fetch_concurrency)?,
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs)?,
            max_pdf_pages: parse_env("MAX_PDF_PAGES", defaults.max_pdf_pages)?,
            cache_ttl_secs: parse_env("CACHE_TTL_SECS", defaults.cache_ttl_secs)?,
            redis_url: optional_env("REDIS_URL"),
            github_token: optional_env("GITHUB_TOKEN"),
            github_api_url: optional_env("GITHUB_API_URL").unwrap_or(defaults.github_api_url),
            devto_api_url: optional_env("DEVTO_API_URL").unwrap_or(defaults.devto_api_url),
            npi_api_url: optional_env("NPI_API_URL").unwrap_or(defaults.npi_api_url),
            postjobfree_url: optional_env("POSTJOBFREE_URL").unwrap_or(defaults.postjobfree_url),
        })
    }

    /// `(api_key, engine_id)` when both are configured.
    pub fn search_credentials(&self) -> Option<(&str, &str)> {
        Some((
            self.google_api_key.as_deref()?,
            self.google_search_engine_id.as_deref()?,
        ))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            search_pages: self.search_pages,
            page_delay: Duration::from_millis(self.search_page_delay_ms),
            max_pending: self.max_pending_candidates,
            concurrency: self.fetch_concurrency.max(1),
            max_pdf_pages: self.max_pdf_pages.max(1),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_credentials_need_both_values() {
        let mut config = Config::default();
        assert!(config.search_credentials().is_none());
        config.google_api_key = Some("key".to_string());
        assert!(config.search_credentials().is_none());
        config.google_search_engine_id = Some("cx".to_string());
        assert_eq!(config.search_credentials(), Some(("key", "cx")));
    }

    #[test]
    fn test_pipeline_config_clamps_zero_workers() {
        let config = Config {
            fetch_concurrency: 0,
            max_pdf_pages: 0,
            ..Config::default()
        };
        let pipeline = config.pipeline();
        assert_eq!(pipeline.concurrency, 1);
        assert_eq!(pipeline.max_pdf_pages, 1);
        assert_eq!(pipeline.max_pending, 30);
        assert_eq!(pipeline.page_delay, Duration::from_millis(200));
    }

    #[test]
    fn test_parse_env_reports_variable() {
        std::env::set_var("CANDIDATE_SEARCH_TEST_PAGES", "three");
        let err = parse_env::<u32>("CANDIDATE_SEARCH_TEST_PAGES", 3).unwrap_err();
        assert!(format!("{err:#}").contains("CANDIDATE_SEARCH_TEST_PAGES"));
        std::env::remove_var("CANDIDATE_SEARCH_TEST_PAGES");
        assert_eq!(parse_env::<u32>("CANDIDATE_SEARCH_TEST_PAGES", 3).unwrap(), 3);
    }
}
