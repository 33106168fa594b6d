//! GitHub user search and per-user repository summaries.

use std::collections::HashSet;

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::models::candidate::CandidateSource;
use crate::sources::{get_json, non_empty, total_pages, SourceCandidate, SourceError, SourcePage};

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const PER_PAGE: u32 = 20;
/// Only the first few users get a detail lookup; the rest of the page is dropped.
const DETAIL_LIMIT: usize = 10;
const SERVICE: &str = "GitHub";
/// Most recently updated repositories shown per user.
pub const REPOS_PER_USER: u32 = 10;
const MAX_LOGIN_CHARS: usize = 39;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubSearchParams {
    pub query: Option<String>,
    pub location: Option<String>,
    pub language: Option<String>,
    pub min_repos: Option<u32>,
    pub page: Option<u32>,
}

/// GitHub search syntax for the filters; `type:user` when nothing is set.
pub fn build_user_query(params: &GithubSearchParams) -> String {
    let mut parts = Vec::new();

    if let Some(query) = params.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        parts.push(format!("{query} in:name in:bio in:login"));
    }
    if let Some(location) = params.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        if location.contains(' ') || location.contains(',') {
            parts.push(format!("location:\"{location}\""));
        } else {
            parts.push(format!("location:{location}"));
        }
    }
    if let Some(language) = params.language.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        parts.push(format!("language:{language}"));
    }
    if let Some(min_repos) = params.min_repos {
        parts.push(format!("repos:>={min_repos}"));
    }

    if parts.is_empty() {
        "type:user".to_string()
    } else {
        parts.join(" ")
    }
}

#[derive(Debug, Deserialize)]
struct UserSearchResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    items: Vec<UserSummary>,
}

#[derive(Debug, Clone, Deserialize)]
struct UserSummary {
    id: u64,
    login: String,
    #[serde(default)]
    avatar_url: Option<String>,
    html_url: String,
}

#[derive(Debug, Default, Deserialize)]
struct UserDetail {
    name: Option<String>,
    email: Option<String>,
    bio: Option<String>,
    company: Option<String>,
    location: Option<String>,
    blog: Option<String>,
    twitter_username: Option<String>,
    public_repos: Option<u64>,
    followers: Option<u64>,
    hireable: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RepoRecord {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    html_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stars: u64,
    pub url: String,
}

/// Recent repositories plus the distinct languages they use, a rough skills list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRepos {
    pub repos: Vec<RepoSummary>,
    pub languages: Vec<String>,
}

/// GitHub logins are 1-39 alphanumerics or hyphens.
pub fn is_valid_login(login: &str) -> bool {
    !login.is_empty()
        && login.len() <= MAX_LOGIN_CHARS
        && login.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

#[derive(Clone)]
pub struct GithubClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(http: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header(ACCEPT, "application/vnd.github.v3+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn search_users(&self, params: &GithubSearchParams) -> Result<SourcePage, SourceError> {
        let page = params.page.unwrap_or(1).max(1);
        let query = build_user_query(params);
        info!(%query, page, "github user search");

        let per_page = PER_PAGE.to_string();
        let page_param = page.to_string();
        let response: UserSearchResponse = get_json(
            SERVICE,
            self.get("/search/users").query(&[
                ("q", query.as_str()),
                ("per_page", per_page.as_str()),
                ("page", page_param.as_str()),
            ]),
        )
        .await?;

        let mut lookups = JoinSet::new();
        for (position, user) in response.items.into_iter().take(DETAIL_LIMIT).enumerate() {
            let client = self.clone();
            lookups.spawn(async move {
                let detail = match client.user_detail(&user.login).await {
                    Ok(detail) => Some(detail),
                    Err(e) => {
                        debug!(login = %user.login, error = %e, "github detail lookup failed");
                        None
                    }
                };
                (position, to_candidate(user, detail))
            });
        }

        let mut candidates = Vec::new();
        while let Some(joined) = lookups.join_next().await {
            if let Ok(pair) = joined {
                candidates.push(pair);
            }
        }
        candidates.sort_by_key(|(position, _)| *position);

        Ok(SourcePage {
            candidates: candidates.into_iter().map(|(_, c)| c).collect(),
            total: response.total_count,
            page,
            per_page: PER_PAGE,
            total_pages: total_pages(response.total_count, PER_PAGE),
            message: None,
        })
    }

    async fn user_detail(&self, login: &str) -> Result<UserDetail, SourceError> {
        get_json(SERVICE, self.get(&format!("/users/{login}"))).await
    }

    pub async fn user_repos(&self, login: &str) -> Result<UserRepos, SourceError> {
        let per_page = REPOS_PER_USER.to_string();
        let records: Vec<RepoRecord> = get_json(
            SERVICE,
            self.get(&format!("/users/{login}/repos"))
                .query(&[("sort", "updated"), ("per_page", per_page.as_str())]),
        )
        .await?;

        let mut seen = HashSet::new();
        let languages = records
            .iter()
            .filter_map(|r| r.language.clone())
            .filter(|l| seen.insert(l.clone()))
            .collect();
        let repos = records
            .into_iter()
            .map(|r| RepoSummary {
                name: r.name,
                description: non_empty(r.description),
                language: r.language,
                stars: r.stargazers_count,
                url: r.html_url,
            })
            .collect();

        debug!(%login, "github repos fetched");
        Ok(UserRepos { repos, languages })
    }
}

/// A failed detail lookup degrades to a login-only record.
fn to_candidate(user: UserSummary, detail: Option<UserDetail>) -> SourceCandidate {
    let detail = detail.unwrap_or_default();
    SourceCandidate {
        id: format!("github-{}", user.id),
        source: CandidateSource::Github,
        name: non_empty(detail.name).unwrap_or_else(|| user.login.clone()),
        title: non_empty(detail.company),
        location: non_empty(detail.location),
        bio: non_empty(detail.bio),
        profile_url: user.html_url,
        email: non_empty(detail.email),
        phone: None,
        extra: json!({
            "username": user.login,
            "avatar": user.avatar_url,
            "blog": non_empty(detail.blog),
            "twitter": detail.twitter_username,
            "publicRepos": detail.public_repos,
            "followers": detail.followers,
            "hireable": detail.hireable,
        }),
    }
}
