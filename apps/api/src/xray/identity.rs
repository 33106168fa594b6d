//! Name, e-mail and phone from unstructured document text.
//!
//! Names come from an ordered list of pattern strategies tried against the
//! leading segments of the text; the first strategy that matches on the
//! first usable segment wins. E-mail and phone are best-effort scans with
//! placeholder filtering.

use serde::{Deserialize, Serialize};

use crate::xray::patterns::{find_emails, find_phone_numbers};
use crate::xray::vocab::{
    contains_any, INSTITUTION_WORDS, JOB_TITLE_PHRASES, NON_NAME_LEADING_WORDS,
    PLACEHOLDER_EMAIL_FRAGMENTS, PLACEHOLDER_PHONE_RUNS, ROLE_TITLE_WORDS, SECTION_HEADER_WORDS,
};

/// Shortest name accepted into the final candidate list.
pub const MIN_NAME_CHARS: usize = 4;
pub const TEXT_EXCERPT_CHARS: usize = 500;

const SEGMENTS_PER_SPLIT: usize = 10;
const MIN_PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub text_excerpt: String,
}

impl Identity {
    /// Name usable for the final candidate list, if any.
    pub fn qualified_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| n.chars().count() >= MIN_NAME_CHARS)
    }
}

pub fn extract_identity(text: &str) -> Identity {
    Identity {
        name: extract_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        text_excerpt: text.chars().take(TEXT_EXCERPT_CHARS).collect(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Name extraction
// ────────────────────────────────────────────────────────────────────────────

type NameStrategy = fn(&str) -> Option<String>;

/// Tried in order against each segment; first hit wins.
const NAME_STRATEGIES: &[NameStrategy] = &[credential_name, separator_name, bare_name];

pub fn extract_name(text: &str) -> Option<String> {
    let name = candidate_segments(text)
        .into_iter()
        .filter(|segment| !is_skippable_segment(segment))
        .find_map(|segment| NAME_STRATEGIES.iter().find_map(|strategy| strategy(segment)))?;

    validate_name(name)
}

/// First segments split on whitespace runs, then first non-empty lines.
fn candidate_segments(text: &str) -> Vec<&str> {
    let segments = split_whitespace_runs(text)
        .into_iter()
        .map(str::trim)
        .filter(|s| s.chars().count() > 2)
        .take(SEGMENTS_PER_SPLIT);
    let lines = text
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(SEGMENTS_PER_SPLIT);
    segments.chain(lines).collect()
}

/// Splits on runs of two or more whitespace characters.
fn split_whitespace_runs(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut run_start: Option<usize> = None;
    let mut run_len = 0;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if run_start.is_none() {
                run_start = Some(idx);
                run_len = 0;
            }
            run_len += 1;
        } else if let Some(rs) = run_start.take() {
            if run_len >= 2 {
                parts.push(&text[start..rs]);
                start = idx;
            }
        }
    }
    match run_start {
        Some(rs) if run_len >= 2 => parts.push(&text[start..rs]),
        _ => parts.push(&text[start..]),
    }
    parts
}

fn is_skippable_segment(segment: &str) -> bool {
    let contact_only = segment
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '(' | ')' | '+'));
    if contact_only {
        return true;
    }
    if segment.contains('@') && !segment.contains(' ') {
        return true;
    }
    contains_any(&segment.to_lowercase(), SECTION_HEADER_WORDS)
}

/// "Patrick A. McMurray, MSN, RN"
fn credential_name(segment: &str) -> Option<String> {
    match_name_shape(segment, &LOOSE_SHAPE, |rest| {
        rest.trim_start().starts_with(',')
    })
    .filter(|name| !first_word_in(name, ROLE_TITLE_WORDS))
}

/// "Jane Doe | jane@mail.com" or "Jane Doe - Charge Nurse"
fn separator_name(segment: &str) -> Option<String> {
    match_name_shape(segment, &LOOSE_SHAPE, |rest| {
        rest.trim_start().starts_with(['|', '-'])
    })
    .filter(|name| !first_word_in(name, ROLE_TITLE_WORDS))
}

/// "Jane Doe" or "Jane Q. Doe" at the start of the segment.
fn bare_name(segment: &str) -> Option<String> {
    match_name_shape(segment, &BARE_SHAPE, |rest| {
        rest.is_empty() || rest.starts_with(char::is_whitespace)
    })
    .filter(|name| !first_word_in(name, NON_NAME_LEADING_WORDS))
}

fn first_word_in(name: &str, table: &[&str]) -> bool {
    name.split_whitespace()
        .next()
        .map(|w| table.contains(&w.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Drops organisation names and bare job titles.
fn validate_name(name: String) -> Option<String> {
    let lower = name.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.iter().any(|t| INSTITUTION_WORDS.contains(t)) {
        return None;
    }
    if JOB_TITLE_PHRASES.contains(&lower.as_str()) {
        return None;
    }
    Some(name)
}

// ────────────────────────────────────────────────────────────────────────────
// Name shape matcher
// ────────────────────────────────────────────────────────────────────────────

/// Shape of "First [M.] Last [Last]" anchored at the segment start.
struct NameShape {
    /// Word length bounds in bytes, capital included.
    min_word: usize,
    max_word: usize,
    max_trailing_words: usize,
}

const LOOSE_SHAPE: NameShape = NameShape {
    min_word: 2,
    max_word: usize::MAX,
    max_trailing_words: 2,
};

const BARE_SHAPE: NameShape = NameShape {
    min_word: 3,
    max_word: 16,
    max_trailing_words: 1,
};

/// Tries the possible name spans longest-first (middle initial taken, then
/// most trailing words) and returns the first whose remainder satisfies
/// `suffix_ok`. Whitespace inside the name is collapsed to single spaces.
fn match_name_shape(
    segment: &str,
    shape: &NameShape,
    suffix_ok: impl Fn(&str) -> bool,
) -> Option<String> {
    let b = segment.as_bytes();
    let first_end = shaped_word(b, 0, shape)?;

    let mut ends = Vec::new();
    if let Some(initial_end) = middle_initial(b, first_end) {
        ends.extend(trailing_word_ends(b, initial_end, shape));
    }
    ends.extend(trailing_word_ends(b, first_end, shape));

    ends.into_iter()
        .find(|&end| suffix_ok(&segment[end..]))
        .map(|end| segment[..end].split_whitespace().collect::<Vec<_>>().join(" "))
}

/// End offsets after one, two, ... trailing words, longest first.
fn trailing_word_ends(b: &[u8], start: usize, shape: &NameShape) -> Vec<usize> {
    let mut ends = Vec::new();
    let mut pos = start;
    for _ in 0..shape.max_trailing_words {
        let word_start = skip_inline_space(b, pos);
        if word_start == pos {
            break;
        }
        match shaped_word(b, word_start, shape) {
            Some(end) => {
                ends.push(end);
                pos = end;
            }
            None => break,
        }
    }
    ends.reverse();
    ends
}

/// Inline space, a capital, an optional period.
fn middle_initial(b: &[u8], pos: usize) -> Option<usize> {
    let start = skip_inline_space(b, pos);
    if start == pos || !b.get(start)?.is_ascii_uppercase() {
        return None;
    }
    let mut end = start + 1;
    if b.get(end) == Some(&b'.') {
        end += 1;
    }
    Some(end)
}

/// Names never span lines, so only spaces and tabs separate their words.
fn skip_inline_space(b: &[u8], mut pos: usize) -> usize {
    while matches!(b.get(pos), Some(b' ' | b'\t')) {
        pos += 1;
    }
    pos
}

fn shaped_word(b: &[u8], start: usize, shape: &NameShape) -> Option<usize> {
    let end = capitalized_word(b, start)?;
    let len = end - start;
    (shape.min_word..=shape.max_word)
        .contains(&len)
        .then_some(end)
}

/// `Xxxx`, plus the compound surname forms `McXxxx` and `O'Xxxx`.
fn capitalized_word(b: &[u8], start: usize) -> Option<usize> {
    if !b.get(start)?.is_ascii_uppercase() {
        return None;
    }
    let mut pos = start + 1;
    if b.get(pos) == Some(&b'\'') && b.get(pos + 1).is_some_and(u8::is_ascii_uppercase) {
        pos += 2;
    }
    let lower_start = pos;
    while b.get(pos).is_some_and(u8::is_ascii_lowercase) {
        pos += 1;
    }
    if pos == lower_start {
        return None;
    }
    if b.get(pos).is_some_and(u8::is_ascii_uppercase) {
        let mut inner = pos + 1;
        while b.get(inner).is_some_and(u8::is_ascii_lowercase) {
            inner += 1;
        }
        if inner > pos + 1 {
            pos = inner;
        }
    }
    Some(pos)
}

// ────────────────────────────────────────────────────────────────────────────
// E-mail and phone
// ────────────────────────────────────────────────────────────────────────────

pub fn extract_email(text: &str) -> Option<String> {
    find_emails(text)
        .into_iter()
        .find(|email| !contains_any(&email.to_lowercase(), PLACEHOLDER_EMAIL_FRAGMENTS))
        .map(str::to_string)
}

pub fn extract_phone(text: &str) -> Option<String> {
    find_phone_numbers(text)
        .into_iter()
        .find(|phone| is_plausible_phone(phone))
        .map(str::to_string)
}

fn is_plausible_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < MIN_PHONE_DIGITS {
        return false;
    }
    let first = digits.as_bytes()[0];
    if digits.bytes().all(|d| d == first) {
        return false;
    }
    !contains_any(&digits, PLACEHOLDER_PHONE_RUNS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_name_with_contact_lines() {
        let text = "Patrick A. McMurray, MSN, RN\n555-123-4567\npatrick.mcmurray@mail.com";
        let identity = extract_identity(text);
        assert_eq!(identity.name.as_deref(), Some("Patrick A. McMurray"));
        assert_eq!(identity.phone.as_deref(), Some("555-123-4567"));
        assert_eq!(identity.email.as_deref(), Some("patrick.mcmurray@mail.com"));
        assert_eq!(identity.text_excerpt, text);
    }

    #[test]
    fn test_phone_line_after_address_line() {
        let identity = extract_identity("Jane Doe, RN\nAustin, TX 78701\n512-555-0142\njane@mail.com");
        assert_eq!(identity.name.as_deref(), Some("Jane Doe"));
        assert_eq!(identity.phone.as_deref(), Some("512-555-0142"));
        assert_eq!(identity.email.as_deref(), Some("jane@mail.com"));
    }

    #[test]
    fn test_name_extraction_is_idempotent() {
        for text in [
            "Patrick A. McMurray, MSN, RN",
            "Jane Doe | Software Engineer",
            "Maria Lopez   Charge Nurse   Tacoma WA",
        ] {
            let name = extract_name(text).unwrap();
            assert_eq!(extract_name(&name).as_deref(), Some(name.as_str()));
        }
    }

    #[test]
    fn test_separator_name_pipe_and_dash() {
        assert_eq!(
            extract_name("John Smith | Software Engineer | john@site.com").as_deref(),
            Some("John Smith")
        );
        assert_eq!(
            extract_name("Maria Lopez - Charge Nurse").as_deref(),
            Some("Maria Lopez")
        );
    }

    #[test]
    fn test_bare_name_with_middle_initial() {
        assert_eq!(
            extract_name("Jane Q. Public\nSeattle, WA").as_deref(),
            Some("Jane Q. Public")
        );
    }

    #[test]
    fn test_role_word_first_falls_through_to_next_segment() {
        let text = "Director Smith, MBA\nJane Doe";
        assert_eq!(extract_name(text).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_section_header_segments_skipped() {
        let text = "Curriculum Vitae\nJane Doe, PhD";
        assert_eq!(extract_name(text).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_contact_only_segments_skipped() {
        let text = "(206) 555-0100   jane@mail.com   Jane Doe   Nurse";
        assert_eq!(extract_name(text).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_institution_name_rejected() {
        assert_eq!(extract_name("Baylor University, Houston"), None);
        assert_eq!(extract_name("Acme Consulting, LLC"), None);
    }

    #[test]
    fn test_job_title_phrase_rejected() {
        assert_eq!(extract_name("Nurse Educator\nJane Doe"), None);
    }

    #[test]
    fn test_institution_check_is_word_level() {
        assert_eq!(
            extract_name("Vincent Price, RN").as_deref(),
            Some("Vincent Price")
        );
    }

    #[test]
    fn test_no_name_in_lowercase_text() {
        assert_eq!(extract_name("lorem ipsum dolor sit amet"), None);
    }

    #[test]
    fn test_email_placeholder_never_returned() {
        assert_eq!(extract_email("Email: yourname@example.com"), None);
        assert_eq!(extract_email("first.last@email.com"), None);
    }

    #[test]
    fn test_email_skips_placeholder_for_real_address() {
        assert_eq!(
            extract_email("sample@site.org or jdoe@uni.edu").as_deref(),
            Some("jdoe@uni.edu")
        );
    }

    #[test]
    fn test_phone_placeholder_filters() {
        assert_eq!(extract_phone("444-444-4444"), None);
        assert_eq!(extract_phone("000-000-0000"), None);
        assert_eq!(extract_phone("Tel 360-837-6556").as_deref(), Some("360-837-6556"));
    }

    #[test]
    fn test_phone_skips_placeholder_for_real_number() {
        assert_eq!(
            extract_phone("(444) 444-4444 or 253.555.0142").as_deref(),
            Some("253.555.0142")
        );
    }

    #[test]
    fn test_qualified_name_requires_four_chars() {
        let short = Identity {
            name: Some("Al".to_string()),
            ..Default::default()
        };
        assert_eq!(short.qualified_name(), None);
        let ok = Identity {
            name: Some("Ann Li".to_string()),
            ..Default::default()
        };
        assert_eq!(ok.qualified_name(), Some("Ann Li"));
    }

    #[test]
    fn test_split_whitespace_runs() {
        assert_eq!(
            split_whitespace_runs("Jane Doe   RN\n\nSeattle"),
            vec!["Jane Doe", "RN", "Seattle"]
        );
        assert_eq!(split_whitespace_runs("one two"), vec!["one two"]);
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let text = "a".repeat(TEXT_EXCERPT_CHARS * 2);
        assert_eq!(
            extract_identity(&text).text_excerpt.len(),
            TEXT_EXCERPT_CHARS
        );
    }
}
