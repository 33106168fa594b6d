//! PostJobFree resume listings, scraped from the public HTML pages.
//!
//! There is no API. The search page lists resumes as `.snippetPadding`
//! blocks; contact details in the listing are often partly masked.

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::models::candidate::CandidateSource;
use crate::sources::{SourceCandidate, SourceError, SourcePage};
use crate::xray::fetcher::BROWSER_USER_AGENT;
use crate::xray::patterns::{find_masked_emails, find_phone_numbers};

pub const POSTJOBFREE_URL: &str = "https://www.postjobfree.com";
const SERVICE: &str = "PostJobFree";
const DEFAULT_LOCATION: &str = "USA";
const BIO_MAX_CHARS: usize = 300;
const NAME_MAX_CHARS: usize = 50;
const RESUME_MAX_CHARS: usize = 5000;
const MONTHS: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostJobFreeSearchParams {
    pub keywords: Option<String>,
    pub location: Option<String>,
}

/// Full text and visible contact details of one resume page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDetails {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_resume: String,
}

/// PostJobFree resume ids are short alphanumeric slugs.
pub fn is_valid_resume_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

pub struct PostJobFreeClient {
    http: Client,
    base_url: String,
}

impl PostJobFreeClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The site serves a stripped page to non-browser agents.
    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{path}", self.base_url))
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
    }

    pub async fn search(&self, params: &PostJobFreeSearchParams) -> Result<SourcePage, SourceError> {
        let mut query = Vec::new();
        if let Some(keywords) = trimmed(&params.keywords) {
            query.push(("q", keywords));
        }
        if let Some(location) = trimmed(&params.location) {
            query.push(("l", location));
        }
        info!(?query, "postjobfree search");

        let html = get_html(self.get("/resumes").query(&query)).await?;
        let candidates = parse_listing(&html, &self.base_url)?;
        info!(count = candidates.len(), "postjobfree candidates parsed");

        let total = candidates.len() as u64;
        let per_page = u32::try_from(candidates.len()).unwrap_or(u32::MAX);
        Ok(SourcePage {
            candidates,
            total,
            page: 1,
            per_page,
            total_pages: u32::from(total > 0),
            message: None,
        })
    }

    pub async fn resume(&self, id: &str) -> Result<ResumeDetails, SourceError> {
        let html = get_html(self.get(&format!("/resume/{id}"))).await?;
        let details = parse_resume(&html)?;
        debug!(%id, chars = details.full_resume.len(), "postjobfree resume parsed");
        Ok(details)
    }
}

async fn get_html(request: RequestBuilder) -> Result<String, SourceError> {
    let response = request.send().await.map_err(|e| SourceError::Network {
        service: SERVICE,
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Http {
            service: SERVICE,
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| SourceError::Network {
        service: SERVICE,
        message: e.to_string(),
    })
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// HTML parsing
// ────────────────────────────────────────────────────────────────────────────

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse {
        service: SERVICE,
        message: format!("invalid selector {css}: {e:?}"),
    })
}

fn first_text(element: &ElementRef<'_>, sel: &Selector) -> String {
    element
        .select(sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Listing blocks with a title and a link become candidates; the rest are skipped.
pub fn parse_listing(html: &str, base_url: &str) -> Result<Vec<SourceCandidate>, SourceError> {
    let document = Html::parse_document(html);
    let item_sel = selector(".snippetPadding")?;
    let link_sel = selector("h3.itemTitle a")?;
    let location_sel = selector("span.colorLocation")?;
    let text_sel = selector("div.normalText")?;
    let date_sel = selector("span.colorDate")?;

    let mut candidates = Vec::new();
    for (position, item) in document.select(&item_sel).enumerate() {
        let Some(link) = item.select(&link_sel).next() else {
            continue;
        };
        let title = link.text().collect::<String>().trim().to_string();
        let Some(href) = link.value().attr("href").map(str::trim) else {
            continue;
        };
        if title.is_empty() || href.is_empty() {
            continue;
        }

        let location = first_text(&item, &location_sel);
        let date = first_text(&item, &date_sel);
        let raw_snippet = first_text(&item, &text_sel);
        let snippet = clean_snippet(&raw_snippet, &location);

        candidates.push(SourceCandidate {
            id: resume_id(href).unwrap_or_else(|| format!("pjf-{position}")),
            source: CandidateSource::PostJobFree,
            name: name_from_title(&title),
            location: Some(if location.is_empty() {
                DEFAULT_LOCATION.to_string()
            } else {
                location
            }),
            bio: Some(snippet.chars().take(BIO_MAX_CHARS).collect()),
            email: find_masked_emails(&snippet).first().map(|e| e.to_string()),
            phone: find_phone_numbers(&snippet).first().map(|p| p.to_string()),
            profile_url: absolute_url(href, base_url),
            title: Some(title),
            extra: json!({ "date": date }),
        });
    }
    Ok(candidates)
}

pub fn parse_resume(html: &str) -> Result<ResumeDetails, SourceError> {
    let document = Html::parse_document(html);
    let text_sel = selector("div.normalText")?;
    let full_resume: String = document
        .select(&text_sel)
        .map(|el| el.text().collect::<String>())
        .collect::<String>()
        .trim()
        .chars()
        .take(RESUME_MAX_CHARS)
        .collect();

    // Contact details can sit anywhere in the page, markup included.
    let email = find_masked_emails(html)
        .into_iter()
        .find(|e| !e.to_ascii_lowercase().contains("postjobfree"))
        .map(str::to_string);
    let phone = find_phone_numbers(html).first().map(|p| p.to_string());

    Ok(ResumeDetails {
        email,
        phone,
        full_resume,
    })
}

/// `/resume/aef5nw/cna-hha-houston-tx` → `aef5nw`
fn resume_id(href: &str) -> Option<String> {
    let path = href.split("://").nth(1).map_or(href, |rest| {
        rest.find('/').map_or("", |slash| &rest[slash..])
    });
    path.split('/')
        .nth(2)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Titles read "Name - Role"; without a usable prefix the title is shortened.
fn name_from_title(title: &str) -> String {
    match title.split('-').next().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => title.chars().take(NAME_MAX_CHARS).collect(),
    }
}

fn absolute_url(href: &str, base_url: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{base_url}{href}")
    }
}

/// Drops the location and a trailing "- Nov 12" posting date from the listing text.
fn clean_snippet(snippet: &str, location: &str) -> String {
    let without_location = if location.is_empty() {
        snippet.to_string()
    } else {
        snippet.replacen(location, "", 1)
    };
    strip_posted_date(&without_location).trim().to_string()
}

fn strip_posted_date(text: &str) -> &str {
    let text = text.trim_end();
    let before_day = text.trim_end_matches(|c: char| c.is_ascii_digit());
    let day_len = text.len() - before_day.len();
    let month_end = before_day.trim_end();
    if !(1..=2).contains(&day_len) || month_end.len() == before_day.len() {
        return text;
    }

    let Some(month_start) = month_end.len().checked_sub(3) else {
        return text;
    };
    let Some(month) = month_end.get(month_start..) else {
        return text;
    };
    if !MONTHS.contains(&month.to_ascii_lowercase().as_str()) {
        return text;
    }

    match month_end[..month_start].trim_end().strip_suffix('-') {
        Some(rest) => rest.trim_end(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LISTING_HTML: &str = r#"<!DOCTYPE html>
<html><body>
<div class="snippetPadding">
  <h3 class="itemTitle"><a href="/resume/aef5nw/cna-hha-houston-tx">Maria Lopez - CNA / HHA</a></h3>
  <div class="normalText">Certified nursing assistant, 6 years in home health. Call 713-555-0148 or m***z@gmail.com <span class="colorLocation">Houston, TX</span> - Nov 12</div>
  <span class="colorDate">Nov 12</span>
</div>
<div class="snippetPadding">
  <h3 class="itemTitle"><a href="https://www.postjobfree.com/resume/b7k2qq/rn">Registered Nurse</a></h3>
  <div class="normalText">ICU nurse with BSN.</div>
</div>
<div class="snippetPadding">
  <h3 class="itemTitle"><a>No link here</a></h3>
</div>
</body></html>"#;

    const RESUME_HTML: &str = r#"<html><body>
<a href="mailto:support@postjobfree.com">support@postjobfree.com</a>
<div class="normalText">Maria Lopez
Houston, TX 77002
713-555-0148
m***z@gmail.com
Certified nursing assistant.</div>
</body></html>"#;

    #[test]
    fn test_parse_listing_extracts_candidates() {
        let candidates = parse_listing(LISTING_HTML, POSTJOBFREE_URL).unwrap();
        assert_eq!(candidates.len(), 2);

        let maria = &candidates[0];
        assert_eq!(maria.id, "aef5nw");
        assert_eq!(maria.source, CandidateSource::PostJobFree);
        assert_eq!(maria.name, "Maria Lopez");
        assert_eq!(maria.title.as_deref(), Some("Maria Lopez - CNA / HHA"));
        assert_eq!(maria.location.as_deref(), Some("Houston, TX"));
        assert_eq!(
            maria.profile_url,
            "https://www.postjobfree.com/resume/aef5nw/cna-hha-houston-tx"
        );
        assert_eq!(maria.phone.as_deref(), Some("713-555-0148"));
        assert_eq!(maria.email.as_deref(), Some("m***z@gmail.com"));
        let bio = maria.bio.as_deref().unwrap();
        assert!(bio.ends_with("m***z@gmail.com"));
        assert!(!bio.contains("Houston"));
        assert_eq!(maria.extra["date"], "Nov 12");

        let nurse = &candidates[1];
        assert_eq!(nurse.id, "b7k2qq");
        assert_eq!(nurse.name, "Registered Nurse");
        assert_eq!(nurse.location.as_deref(), Some("USA"));
        assert!(nurse.email.is_none());
    }

    #[test]
    fn test_strip_posted_date() {
        assert_eq!(strip_posted_date("Nurse aide  - Nov 12"), "Nurse aide");
        assert_eq!(strip_posted_date("Nurse aide -sep 3 "), "Nurse aide");
        assert_eq!(strip_posted_date("Worked 2019 - 2021"), "Worked 2019 - 2021");
        assert_eq!(strip_posted_date("Room 12"), "Room 12");
        assert_eq!(strip_posted_date(""), "");
    }

    #[test]
    fn test_resume_id_and_name_fallbacks() {
        assert_eq!(resume_id("/resume/x9/slug").as_deref(), Some("x9"));
        assert_eq!(resume_id("/resume").as_deref(), None);
        assert_eq!(name_from_title("- CNA"), "- CNA");
        assert!(is_valid_resume_id("aef5nw"));
        assert!(!is_valid_resume_id("../etc"));
    }

    #[test]
    fn test_parse_resume_skips_site_address() {
        let details = parse_resume(RESUME_HTML).unwrap();
        assert_eq!(details.email.as_deref(), Some("m***z@gmail.com"));
        assert_eq!(details.phone.as_deref(), Some("713-555-0148"));
        assert!(details.full_resume.starts_with("Maria Lopez"));
        assert!(details.full_resume.ends_with("Certified nursing assistant."));
    }

    #[tokio::test]
    async fn test_search_sends_browser_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resumes"))
            .and(query_param("q", "cna"))
            .and(query_param("l", "Houston"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
            .mount(&server)
            .await;

        let client = PostJobFreeClient::new(Client::new(), server.uri());
        let params = PostJobFreeSearchParams {
            keywords: Some(" cna ".to_string()),
            location: Some("Houston".to_string()),
        };
        let page = client.search(&params).await.unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 1);
        assert_eq!(
            page.candidates[0].profile_url,
            format!("{}/resume/aef5nw/cna-hha-houston-tx", server.uri())
        );

        let requests = server.received_requests().await.unwrap();
        let agent = requests[0].headers.get("user-agent").unwrap();
        assert_eq!(agent.to_str().unwrap(), BROWSER_USER_AGENT);
    }

    #[tokio::test]
    async fn test_resume_fetch_and_missing_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resume/aef5nw"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESUME_HTML))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/resume/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = PostJobFreeClient::new(Client::new(), server.uri());
        let details = client.resume("aef5nw").await.unwrap();
        assert_eq!(details.phone.as_deref(), Some("713-555-0148"));

        let err = client.resume("gone").await.unwrap_err();
        assert!(matches!(err, SourceError::Http { status: 404, .. }));
    }
}
