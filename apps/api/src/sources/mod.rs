//! Supplemental candidate sources: thin, normalising proxies over public APIs
//! and one scraped resume board.

pub mod devto;
pub mod github;
pub mod handlers;
pub mod npi;
pub mod postjobfree;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::candidate::CandidateSource;

/// Sent to every public API; GitHub rejects requests without one.
pub const SOURCE_USER_AGENT: &str = "CandidateProfileSearch/1.0";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{service} returned HTTP {status}")]
    Http { service: &'static str, status: u16 },

    #[error("{service} request failed: {message}")]
    Network {
        service: &'static str,
        message: String,
    },

    #[error("{service} response could not be parsed: {message}")]
    Parse {
        service: &'static str,
        message: String,
    },
}

/// A candidate from one of the supplemental sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCandidate {
    pub id: String,
    pub source: CandidateSource,
    pub name: String,
    pub title: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub profile_url: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Source-specific fields, passed through for the detail view.
    pub extra: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePage {
    pub candidates: Vec<SourceCandidate>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn total_pages(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX)
}

/// Sends `request` and decodes a JSON body, mapping every failure to [`SourceError`].
pub(crate) async fn get_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T, SourceError> {
    let response = request.send().await.map_err(|e| SourceError::Network {
        service,
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Http {
            service,
            status: status.as_u16(),
        });
    }

    response.json::<T>().await.map_err(|e| SourceError::Parse {
        service,
        message: e.to_string(),
    })
}

/// Empty strings from upstream APIs mean "absent".
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" Austin ".to_string())), Some("Austin".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
