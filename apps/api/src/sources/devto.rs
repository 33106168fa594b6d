//! Dev.to author discovery.
//!
//! Dev.to has no user search, so recent articles for a tag are listed and
//! their distinct authors become candidates. An author's own recent articles
//! give their expertise tags.

use std::collections::HashSet;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::models::candidate::CandidateSource;
use crate::sources::{get_json, non_empty, total_pages, SourceCandidate, SourceError, SourcePage};

pub const DEVTO_API_URL: &str = "https://dev.to/api";
pub const ARTICLES_PER_PAGE: u32 = 30;
const PROFILE_LIMIT: usize = 10;
pub const ARTICLES_PER_AUTHOR: u32 = 10;
const SERVICE: &str = "Dev.to";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevtoSearchParams {
    pub query: Option<String>,
    pub tag: Option<String>,
    pub page: Option<u32>,
}

impl DevtoSearchParams {
    /// `query` wins over `tag`; both are sent as the article tag filter.
    fn effective_tag(&self) -> Option<&str> {
        [self.query.as_deref(), self.tag.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Article {
    user: ArticleAuthor,
}

#[derive(Debug, Clone, Deserialize)]
struct ArticleAuthor {
    user_id: u64,
    username: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    profile_image_90: Option<String>,
    #[serde(default)]
    profile_image: Option<String>,
    #[serde(default)]
    twitter_username: Option<String>,
    #[serde(default)]
    github_username: Option<String>,
    #[serde(default)]
    website_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthorProfile {
    summary: Option<String>,
    location: Option<String>,
    joined_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorArticle {
    title: String,
    #[serde(default)]
    description: Option<String>,
    url: String,
    #[serde(default)]
    tag_list: Vec<String>,
    #[serde(default)]
    positive_reactions_count: u64,
    #[serde(default)]
    published_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub tags: Vec<String>,
    pub reactions: u64,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorArticles {
    pub articles: Vec<ArticleSummary>,
    pub expertise: Vec<String>,
}

/// Dev.to usernames: alphanumerics and underscores.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[derive(Clone)]
pub struct DevtoClient {
    http: Client,
    base_url: String,
}

impl DevtoClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn search_authors(&self, params: &DevtoSearchParams) -> Result<SourcePage, SourceError> {
        let page = params.page.unwrap_or(1).max(1);
        let mut query = vec![
            ("per_page", ARTICLES_PER_PAGE.to_string()),
            ("page", page.to_string()),
        ];
        if let Some(tag) = params.effective_tag() {
            query.push(("tag", tag.to_string()));
        }
        info!(tag = ?params.effective_tag(), page, "dev.to author search");

        let articles: Vec<Article> = get_json(
            SERVICE,
            self.http
                .get(format!("{}/articles", self.base_url))
                .query(&query),
        )
        .await?;

        let mut seen = HashSet::new();
        let authors: Vec<ArticleAuthor> = articles
            .into_iter()
            .map(|a| a.user)
            .filter(|u| seen.insert(u.user_id))
            .collect();
        let total = authors.len() as u64;

        let mut lookups = JoinSet::new();
        for (position, author) in authors.into_iter().take(PROFILE_LIMIT).enumerate() {
            let client = self.clone();
            lookups.spawn(async move {
                let profile = match client.profile(&author.username).await {
                    Ok(profile) => Some(profile),
                    Err(e) => {
                        debug!(username = %author.username, error = %e, "dev.to profile lookup failed");
                        None
                    }
                };
                (position, to_candidate(author, profile))
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
            total,
            page,
            per_page: ARTICLES_PER_PAGE,
            total_pages: total_pages(total, ARTICLES_PER_PAGE),
            message: None,
        })
    }

    pub async fn author_articles(&self, username: &str) -> Result<AuthorArticles, SourceError> {
        let per_page = ARTICLES_PER_AUTHOR.to_string();
        let articles: Vec<AuthorArticle> = get_json(
            SERVICE,
            self.http
                .get(format!("{}/articles", self.base_url))
                .query(&[("username", username), ("per_page", per_page.as_str())]),
        )
        .await?;

        let mut seen = HashSet::new();
        let expertise = articles
            .iter()
            .flat_map(|a| a.tag_list.iter().cloned())
            .filter(|tag| seen.insert(tag.clone()))
            .collect();
        let articles = articles
            .into_iter()
            .map(|a| ArticleSummary {
                title: a.title,
                description: non_empty(a.description),
                url: a.url,
                tags: a.tag_list,
                reactions: a.positive_reactions_count,
                published_at: a.published_at,
            })
            .collect();

        Ok(AuthorArticles { articles, expertise })
    }

    async fn profile(&self, username: &str) -> Result<AuthorProfile, SourceError> {
        get_json(
            SERVICE,
            self.http
                .get(format!("{}/users/by_username", self.base_url))
                .query(&[("url", username)]),
        )
        .await
    }
}

fn to_candidate(author: ArticleAuthor, profile: Option<AuthorProfile>) -> SourceCandidate {
    let profile = profile.unwrap_or_default();
    SourceCandidate {
        id: format!("devto-{}", author.user_id),
        source: CandidateSource::Devto,
        name: non_empty(author.name).unwrap_or_else(|| author.username.clone()),
        title: None,
        location: non_empty(profile.location),
        bio: non_empty(profile.summary),
        profile_url: format!("https://dev.to/{}", author.username),
        email: None,
        phone: None,
        extra: json!({
            "username": author.username,
            "avatar": author.profile_image_90.or(author.profile_image),
            "twitter": author.twitter_username,
            "github": author.github_username,
            "website": author.website_url,
            "joinedAt": profile.joined_at,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn article(user_id: u64, username: &str) -> serde_json::Value {
        json!({
            "title": "Ownership in practice",
            "user": { "user_id": user_id, "username": username, "name": username.to_uppercase() }
        })
    }

    #[test]
    fn test_query_takes_precedence_over_tag() {
        let params = DevtoSearchParams {
            query: Some("rust".to_string()),
            tag: Some("go".to_string()),
            page: None,
        };
        assert_eq!(params.effective_tag(), Some("rust"));
        let params = DevtoSearchParams {
            query: Some(" ".to_string()),
            tag: Some("go".to_string()),
            page: None,
        };
        assert_eq!(params.effective_tag(), Some("go"));
        assert_eq!(DevtoSearchParams::default().effective_tag(), None);
    }

    #[test]
    fn test_username_validation() {
        assert!(is_valid_username("ben_halpern"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("a/b"));
    }

    #[tokio::test]
    async fn test_author_articles_merge_tags() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .and(query_param("username", "carol"))
            .and(query_param("per_page", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "title": "Pinning explained", "description": "Futures and Pin",
                  "url": "https://dev.to/carol/pin", "tag_list": ["rust", "async"],
                  "positive_reactions_count": 31, "published_at": "2024-03-01T10:00:00Z" },
                { "title": "Arena allocators", "url": "https://dev.to/carol/arena",
                  "tag_list": ["rust", "memory"] }
            ])))
            .mount(&server)
            .await;

        let client = DevtoClient::new(Client::new(), server.uri());
        let result = client.author_articles("carol").await.unwrap();

        assert_eq!(result.expertise, vec!["rust", "async", "memory"]);
        assert_eq!(result.articles.len(), 2);
        assert_eq!(result.articles[0].reactions, 31);
        assert_eq!(result.articles[1].reactions, 0);
        assert!(result.articles[1].description.is_none());

        let body = serde_json::to_value(&result.articles[0]).unwrap();
        assert_eq!(body["publishedAt"], "2024-03-01T10:00:00Z");
    }

    #[tokio::test]
    async fn test_unique_authors_in_first_seen_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/articles"))
            .and(query_param("tag", "rust"))
            .and(query_param("per_page", "30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                article(7, "carol"),
                article(3, "dave"),
                article(7, "carol"),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/by_username"))
            .and(query_param("url", "carol"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "summary": "Systems programmer",
                "location": "Lisbon",
                "joined_at": "Jan 5, 2019"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/by_username"))
            .and(query_param("url", "dave"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = DevtoClient::new(Client::new(), server.uri());
        let params = DevtoSearchParams {
            query: Some("rust".to_string()),
            ..DevtoSearchParams::default()
        };
        let page = client.search_authors(&params).await.unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.candidates[0].id, "devto-7");
        assert_eq!(page.candidates[0].location.as_deref(), Some("Lisbon"));
        assert_eq!(page.candidates[0].profile_url, "https://dev.to/carol");
        assert_eq!(page.candidates[1].name, "DAVE");
        assert!(page.candidates[1].bio.is_none());
    }
}
