//! Resume gate: decides whether a search hit is a genuine personal resume.
//!
//! `classify_resume` runs the negative filters first, short-circuiting on
//! the first rejection, then requires at least one positive signal.
//! `validate_resume_result` is the second, stricter content check.

use serde::{Deserialize, Serialize};

use crate::xray::classifiers::{
    is_academic_article, is_job_posting, is_legal_document, is_product_document,
    is_template_page,
};
use crate::xray::patterns::{has_email_domain, has_phone_pattern, has_zip_pattern};
use crate::xray::vocab::{
    contains_any, CORPORATE_PAGE_INDICATORS, EXPERIENCE_INDICATORS, MARKETING_PHRASES,
    NEWS_INDICATORS, RESUME_CONTENT_INDICATORS,
};

/// Extensions of the paginated document formats X-Ray searches target.
pub const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".doc"];

/// Hosts where individuals commonly publish their own documents.
const PERSONAL_HOST_MARKERS: &[&str] = &[".edu/", "github.io", "drive.google.", "dropbox."];

const MIN_SNIPPET_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictReason {
    // Rejections
    BlockedDomain,
    TemplatePage,
    LegalDocument,
    JobPosting,
    ProductDocument,
    AcademicArticle,
    MarketingCopy,
    NoResumeSignal,
    GovernmentDomain,
    NewsContent,
    SnippetTooShort,
    CorporatePage,
    NoResumeContent,
    // Acceptances
    DocumentUrl,
    PersonalHost,
    ContactPattern,
    ExperienceIndicator,
    DocumentExtensionInUrl,
    ResumeContent,
    ContactInfo,
}

/// Outcome of one gate for one search hit. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationVerdict {
    pub accepted: bool,
    pub reason: VerdictReason,
}

impl ClassificationVerdict {
    pub fn accept(reason: VerdictReason) -> Self {
        Self {
            accepted: true,
            reason,
        }
    }

    pub fn reject(reason: VerdictReason) -> Self {
        Self {
            accepted: false,
            reason,
        }
    }
}

/// First gate: reject on any negative signal, then accept on the first
/// positive one. Hits that clear every filter without a positive signal
/// are rejected with `NoResumeSignal`.
pub fn classify_resume(url: &str, title: &str, snippet: &str) -> ClassificationVerdict {
    use VerdictReason::*;

    let lower_url = url.to_lowercase();
    let lower_snippet = snippet.to_lowercase();

    if is_template_page(title) {
        return ClassificationVerdict::reject(TemplatePage);
    }
    if is_legal_document(title, snippet) {
        return ClassificationVerdict::reject(LegalDocument);
    }
    if is_job_posting(title, snippet) {
        return ClassificationVerdict::reject(JobPosting);
    }
    if is_product_document(title, snippet) {
        return ClassificationVerdict::reject(ProductDocument);
    }
    // Text-based academic detection runs again after the document is fetched.
    if is_academic_article(title, snippet, "") {
        return ClassificationVerdict::reject(AcademicArticle);
    }
    if contains_any(&lower_snippet, MARKETING_PHRASES) {
        return ClassificationVerdict::reject(MarketingCopy);
    }

    if DOCUMENT_EXTENSIONS.iter().any(|ext| lower_url.ends_with(ext)) {
        return ClassificationVerdict::accept(DocumentUrl);
    }
    if contains_any(&lower_url, PERSONAL_HOST_MARKERS) {
        return ClassificationVerdict::accept(PersonalHost);
    }
    if has_phone_pattern(snippet) || has_zip_pattern(snippet) || has_email_domain(&lower_snippet)
    {
        return ClassificationVerdict::accept(ContactPattern);
    }
    if contains_any(&lower_snippet, EXPERIENCE_INDICATORS) {
        return ClassificationVerdict::accept(ExperienceIndicator);
    }
    if DOCUMENT_EXTENSIONS.iter().any(|ext| lower_url.contains(ext)) {
        return ClassificationVerdict::accept(DocumentExtensionInUrl);
    }

    ClassificationVerdict::reject(NoResumeSignal)
}

/// Second gate: drops government pages, news, short snippets and company
/// pages, then requires resume vocabulary or contact details.
pub fn validate_resume_result(title: &str, snippet: &str, url: &str) -> ClassificationVerdict {
    use VerdictReason::*;

    let lower_url = url.to_lowercase();
    let combined = format!("{} {}", title.to_lowercase(), snippet.to_lowercase());

    if lower_url.contains(".gov/") && !lower_url.contains(".edu") {
        return ClassificationVerdict::reject(GovernmentDomain);
    }
    if contains_any(&combined, NEWS_INDICATORS) {
        return ClassificationVerdict::reject(NewsContent);
    }
    if snippet.chars().count() < MIN_SNIPPET_CHARS {
        return ClassificationVerdict::reject(SnippetTooShort);
    }
    if contains_any(&combined, CORPORATE_PAGE_INDICATORS) {
        return ClassificationVerdict::reject(CorporatePage);
    }

    if contains_any(&combined, RESUME_CONTENT_INDICATORS) {
        return ClassificationVerdict::accept(ResumeContent);
    }
    if has_phone_pattern(snippet) || has_email_domain(&snippet.to_lowercase()) {
        return ClassificationVerdict::accept(ContactInfo);
    }

    ClassificationVerdict::reject(NoResumeContent)
}
