//! Signal classifiers: independent heuristics over a search hit's title,
//! snippet and (when available) document text.
//!
//! Each classifier is a pure function. The thresholds differ on purpose:
//! job-posting vocabulary rejects on a single hit, legal and product
//! vocabulary need two corroborating hits.

use crate::xray::vocab::{
    contains_any, count_matches, ACADEMIC_ARTICLE_INDICATORS, ACADEMIC_STRONG_MARKERS,
    BLOCKED_DOMAINS, JOB_POSTING_INDICATORS, LEGAL_INDICATORS, PRODUCT_DOC_INDICATORS,
    TEMPLATE_TITLE_WORDS,
};

/// Only this many characters of document text are scanned for academic vocabulary.
pub const ACADEMIC_TEXT_SCAN_CHARS: usize = 2000;

const JOB_POSTING_THRESHOLD: usize = 1;
const LEGAL_THRESHOLD: usize = 2;
const PRODUCT_THRESHOLD: usize = 2;
const ACADEMIC_THRESHOLD: usize = 2;

fn combined_lower(title: &str, snippet: &str) -> String {
    format!("{} {}", title.to_lowercase(), snippet.to_lowercase())
}

/// Title reads like a template, guide, report or other non-resume document.
pub fn is_template_page(title: &str) -> bool {
    contains_any(&title.to_lowercase(), TEMPLATE_TITLE_WORDS)
}

pub fn is_legal_document(title: &str, snippet: &str) -> bool {
    count_matches(&combined_lower(title, snippet), LEGAL_INDICATORS) >= LEGAL_THRESHOLD
}

pub fn is_job_posting(title: &str, snippet: &str) -> bool {
    count_matches(&combined_lower(title, snippet), JOB_POSTING_INDICATORS)
        >= JOB_POSTING_THRESHOLD
}

pub fn is_product_document(title: &str, snippet: &str) -> bool {
    count_matches(&combined_lower(title, snippet), PRODUCT_DOC_INDICATORS) >= PRODUCT_THRESHOLD
}

/// Journal or scholarly article *about* resumes rather than a resume.
///
/// Any strong marker ("journal of", DOI, themed issue) or the pair
/// "abstract" + "keywords" rejects outright; otherwise two hits from the
/// broader vocabulary are needed. `text` may be empty before the document
/// has been fetched.
pub fn is_academic_article(title: &str, snippet: &str, text: &str) -> bool {
    let text_head: String = text
        .to_lowercase()
        .chars()
        .take(ACADEMIC_TEXT_SCAN_CHARS)
        .collect();
    let combined = format!("{} {}", combined_lower(title, snippet), text_head);

    if contains_any(&combined, ACADEMIC_STRONG_MARKERS)
        || (combined.contains("abstract") && combined.contains("keywords"))
    {
        return true;
    }

    count_matches(&combined, ACADEMIC_ARTICLE_INDICATORS) >= ACADEMIC_THRESHOLD
}

/// URL belongs to a resume builder, job board, social network or publisher.
/// An empty URL is treated as blocked.
pub fn is_blocked_domain(url: &str) -> bool {
    if url.trim().is_empty() {
        return true;
    }
    let lower = url.to_lowercase();
    contains_any(&lower, BLOCKED_DOMAINS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_page_single_word_rejects() {
        assert!(is_template_page("Free Nurse Resume Template"));
        assert!(is_template_page("Resume Writing GUIDE"));
        assert!(is_template_page("Student worksheet"));
    }

    #[test]
    fn test_template_page_plain_resume_passes() {
        assert!(!is_template_page("Jane Doe - Registered Nurse Resume"));
    }

    #[test]
    fn test_legal_document_needs_two_hits() {
        assert!(!is_legal_document("Smith Resume", "filed under nursing"));
        assert!(is_legal_document(
            "Case 1:20-cv-0012 Document 3",
            "United States District Court plaintiff"
        ));
    }

    #[test]
    fn test_job_posting_single_hit_rejects() {
        assert!(is_job_posting("ICU Nurse", "We are hiring! Apply now."));
        assert!(is_job_posting("Staff RN opening", "Competitive salary"));
    }

    #[test]
    fn test_job_posting_resume_text_passes() {
        assert!(!is_job_posting(
            "Jane Doe RN",
            "Registered nurse with 8 years of experience in ICU"
        ));
    }

    #[test]
    fn test_product_document_needs_two_hits() {
        assert!(!is_product_document("Quality resume", "ASTM certified welder"));
        assert!(is_product_document(
            "Intertek test report",
            "Impact resistance per ASTM"
        ));
    }

    #[test]
    fn test_academic_strong_marker_alone_rejects() {
        assert!(is_academic_article(
            "Writing a CV",
            "Published in the Journal of Nursing Education",
            ""
        ));
        assert!(is_academic_article("Biosketch", "doi:10.1000/xyz", ""));
    }

    #[test]
    fn test_academic_abstract_with_keywords_rejects() {
        assert!(is_academic_article(
            "Nurse resumes",
            "Abstract ... Keywords nursing",
            ""
        ));
    }

    #[test]
    fn test_academic_single_weak_hit_passes() {
        assert!(!is_academic_article(
            "Jane Doe Resume",
            "References available upon request",
            ""
        ));
    }

    #[test]
    fn test_academic_two_weak_hits_reject() {
        assert!(is_academic_article(
            "Jane Doe",
            "manuscript submitted",
            ""
        ));
    }

    #[test]
    fn test_academic_checks_document_text() {
        let text = "Introducing the documents nurse practitioners need for professional development";
        assert!(is_academic_article("Jane Doe", "RN", text));
    }

    #[test]
    fn test_academic_ignores_text_beyond_scan_window() {
        let mut text = "x".repeat(ACADEMIC_TEXT_SCAN_CHARS);
        text.push_str(" journal of nursing");
        assert!(!is_academic_article("Jane Doe", "RN", &text));
    }

    #[test]
    fn test_blocked_domain_is_case_insensitive() {
        assert!(is_blocked_domain("https://WWW.Indeed.com/r/jane"));
        assert!(is_blocked_domain("https://www.cambridge.org/core/article.pdf"));
        assert!(!is_blocked_domain("https://people.example.edu/~jane/cv.pdf"));
    }

    #[test]
    fn test_blocked_domain_empty_url() {
        assert!(is_blocked_domain(""));
    }
}
