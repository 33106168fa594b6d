//! X-Ray query construction for the external search engine.

use url::Url;

use crate::models::candidate::FileType;

/// Job boards and resume builders whose pages are never individual resumes.
pub const EXCLUDED_SITES: &[&str] = &[
    "indeed.com",
    "monster.com",
    "glassdoor.com",
    "linkedin.com",
    "zety.com",
    "resume.io",
    "livecareer.com",
];

const RESUME_TERMS: &str = r#"("resume" OR "cv" OR "curriculum vitae")"#;
const EXTERNAL_SEARCH_BASE: &str = "https://www.google.com/search";

/// Builds the boolean X-Ray query.
///
/// Keywords separated by `,` or `|` become an OR group of quoted phrases;
/// otherwise the whole keyword string is one quoted phrase.
pub fn build_xray_query(keywords: &str, location: Option<&str>, file_type: FileType) -> String {
    let terms: Vec<&str> = keywords
        .split([',', '|'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    let mut query = if terms.len() > 1 {
        let quoted: Vec<String> = terms.iter().map(|t| format!("\"{t}\"")).collect();
        format!("({})", quoted.join(" OR "))
    } else {
        format!("\"{}\"", keywords.trim())
    };

    if let Some(loc) = location.map(str::trim).filter(|l| !l.is_empty()) {
        query.push_str(&format!(" \"{loc}\""));
    }

    query.push(' ');
    query.push_str(RESUME_TERMS);

    query.push(' ');
    query.push_str(&file_type_clause(file_type));

    for site in EXCLUDED_SITES {
        query.push_str(&format!(" -site:{site}"));
    }

    query
}

fn file_type_clause(file_type: FileType) -> String {
    match file_type {
        FileType::All => "(filetype:pdf OR filetype:doc)".to_string(),
        other => format!("filetype:{}", other.as_str()),
    }
}

/// Link a recruiter can open to run the same query by hand.
pub fn external_search_url(query: &str) -> String {
    match Url::parse_with_params(EXTERNAL_SEARCH_BASE, &[("q", query)]) {
        Ok(url) => url.to_string(),
        Err(_) => EXTERNAL_SEARCH_BASE.to_string(),
    }
}
