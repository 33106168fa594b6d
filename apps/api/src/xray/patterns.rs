//! Byte-level scanners for the contact patterns the classifiers and the
//! identity extractor look for: NANP phone numbers, zip-like digit runs and
//! e-mail addresses.
//!
//! All patterns are ASCII, so scanning bytes never splits a UTF-8 sequence
//! at a match boundary.

fn is_separator(b: u8) -> bool {
    matches!(b, b'-' | b'.') || b.is_ascii_whitespace()
}

fn is_email_local(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'%' | b'+' | b'-')
}

fn is_email_domain(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-')
}

/// Consumes exactly `n` ASCII digits starting at `pos`.
fn digits(b: &[u8], pos: usize, n: usize) -> Option<usize> {
    let end = pos.checked_add(n)?;
    let run = b.get(pos..end)?;
    run.iter().all(u8::is_ascii_digit).then_some(end)
}

fn skip_separator(b: &[u8], pos: usize) -> usize {
    match b.get(pos) {
        Some(&c) if is_separator(c) => pos + 1,
        _ => pos,
    }
}

/// `ddd[-. ]ddd[-. ]dddd`
fn match_plain_phone(b: &[u8], pos: usize) -> Option<usize> {
    let pos = digits(b, pos, 3)?;
    let pos = skip_separator(b, pos);
    let pos = digits(b, pos, 3)?;
    let pos = skip_separator(b, pos);
    digits(b, pos, 4)
}

/// `(ddd) ddd-dddd` and friends: optional parentheses around the area code.
fn match_nanp_core(b: &[u8], mut pos: usize) -> Option<usize> {
    if b.get(pos) == Some(&b'(') {
        pos += 1;
    }
    pos = digits(b, pos, 3)?;
    if b.get(pos) == Some(&b')') {
        pos += 1;
    }
    match_plain_phone_tail(b, pos)
}

fn match_plain_phone_tail(b: &[u8], pos: usize) -> Option<usize> {
    let pos = skip_separator(b, pos);
    let pos = digits(b, pos, 3)?;
    let pos = skip_separator(b, pos);
    digits(b, pos, 4)
}

/// Optional `+`, optional country code `1` with an inline separator, then the
/// core. A match never starts inside a word or a longer digit run, and never
/// runs into a trailing digit.
fn match_phone_at(b: &[u8], start: usize) -> Option<usize> {
    let glued_left = start
        .checked_sub(1)
        .and_then(|prev| b.get(prev))
        .is_some_and(u8::is_ascii_alphanumeric);
    if glued_left {
        return None;
    }

    let mut pos = start;
    if b.get(pos) == Some(&b'+') {
        pos += 1;
    }
    let with_country_code = (b.get(pos) == Some(&b'1')).then(|| match b.get(pos + 1) {
        Some(b'-' | b'.' | b' ') => pos + 2,
        _ => pos + 1,
    });
    with_country_code
        .into_iter()
        .chain(std::iter::once(pos))
        .find_map(|p| {
            match_nanp_core(b, p).filter(|&end| !b.get(end).is_some_and(u8::is_ascii_digit))
        })
}

/// All NANP-shaped phone numbers in `text`, left to right, non-overlapping.
pub fn find_phone_numbers(text: &str) -> Vec<&str> {
    let b = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < b.len() {
        match match_phone_at(b, i) {
            Some(end) => {
                found.push(&text[i..end]);
                i = end;
            }
            None => i += 1,
        }
    }
    found
}

/// True when `text` holds a `ddd[-. ]ddd[-. ]dddd` run anywhere.
pub fn has_phone_pattern(text: &str) -> bool {
    let b = text.as_bytes();
    (0..b.len()).any(|i| match_plain_phone(b, i).is_some())
}

/// True when `text` holds five consecutive digits (zip-code shaped).
pub fn has_zip_pattern(text: &str) -> bool {
    text.as_bytes()
        .windows(5)
        .any(|w| w.iter().all(u8::is_ascii_digit))
}

/// True when `text` holds `@letters.letters` (lowercase letters only).
pub fn has_email_domain(text: &str) -> bool {
    let b = text.as_bytes();
    b.iter().enumerate().any(|(at, &c)| {
        if c != b'@' {
            return false;
        }
        let first = at + 1;
        let mut pos = first;
        while b.get(pos).is_some_and(u8::is_ascii_lowercase) {
            pos += 1;
        }
        if pos == first || b.get(pos) != Some(&b'.') {
            return false;
        }
        b.get(pos + 1).is_some_and(u8::is_ascii_lowercase)
    })
}

/// Longest prefix of the domain run that ends in `.<two or more letters>`.
fn valid_domain_end(b: &[u8], domain_start: usize, run_end: usize) -> Option<usize> {
    (domain_start + 1..=run_end).rev().find(|&end| {
        let domain = &b[domain_start..end];
        match domain.iter().rposition(|&c| c == b'.') {
            Some(dot) if dot > 0 => {
                let tld = &domain[dot + 1..];
                tld.len() >= 2 && tld.iter().all(u8::is_ascii_alphabetic)
            }
            _ => false,
        }
    })
}

/// All RFC-shaped e-mail addresses in `text`, left to right, non-overlapping.
pub fn find_emails(text: &str) -> Vec<&str> {
    scan_emails(text, is_email_local)
}

/// Like [`find_emails`], but `*` also counts in the local part, so addresses
/// a site masks as `j***@mail.com` are kept.
pub fn find_masked_emails(text: &str) -> Vec<&str> {
    scan_emails(text, |b| is_email_local(b) || b == b'*')
}

fn scan_emails(text: &str, is_local: impl Fn(u8) -> bool) -> Vec<&str> {
    let b = text.as_bytes();
    let mut found = Vec::new();
    let mut cursor = 0;
    for at in 0..b.len() {
        if b[at] != b'@' || at < cursor {
            continue;
        }
        let mut start = at;
        while start > cursor && is_local(b[start - 1]) {
            start -= 1;
        }
        if start == at {
            continue;
        }
        let mut run_end = at + 1;
        while run_end < b.len() && is_email_domain(b[run_end]) {
            run_end += 1;
        }
        if let Some(end) = valid_domain_end(b, at + 1, run_end) {
            found.push(&text[start..end]);
            cursor = end;
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_phone_dashed() {
        assert_eq!(find_phone_numbers("call 360-837-6556 today"), vec!["360-837-6556"]);
    }

    #[test]
    fn test_find_phone_on_line_after_name() {
        let text = "Patrick A. McMurray, MSN, RN\n555-123-4567\nfoo";
        assert_eq!(find_phone_numbers(text), vec!["555-123-4567"]);
    }

    #[test]
    fn test_find_phone_after_zip_line() {
        let text = "Austin, TX 78701\n512-555-0142";
        assert_eq!(find_phone_numbers(text), vec!["512-555-0142"]);
    }

    #[test]
    fn test_country_code_does_not_cross_newline() {
        assert_eq!(find_phone_numbers("Suite 1\n512-555-0142"), vec!["512-555-0142"]);
        assert_eq!(find_phone_numbers("1-512-555-0142"), vec!["1-512-555-0142"]);
    }

    #[test]
    fn test_find_phone_rejects_longer_digit_runs() {
        assert!(find_phone_numbers("order 9512555014277").is_empty());
        assert!(find_phone_numbers("ref A512-555-0142").is_empty());
    }

    #[test]
    fn test_find_phone_parenthesized_and_country_code() {
        assert_eq!(find_phone_numbers("(212) 555-0199"), vec!["(212) 555-0199"]);
        assert_eq!(find_phone_numbers("+1 212.555.0199"), vec!["+1 212.555.0199"]);
    }

    #[test]
    fn test_find_phone_ten_bare_digits() {
        assert_eq!(find_phone_numbers("id 2125550199"), vec!["2125550199"]);
    }

    #[test]
    fn test_find_phone_multiple() {
        let found = find_phone_numbers("444-444-4444 or 360-837-6556");
        assert_eq!(found, vec!["444-444-4444", "360-837-6556"]);
    }

    #[test]
    fn test_find_phone_none() {
        assert!(find_phone_numbers("no digits 12-34").is_empty());
    }

    #[test]
    fn test_has_phone_pattern() {
        assert!(has_phone_pattern("Phone: 555.123.4567"));
        assert!(!has_phone_pattern("Born 1990"));
    }

    #[test]
    fn test_has_zip_pattern() {
        assert!(has_zip_pattern("Austin, TX 78701"));
        assert!(!has_zip_pattern("Suite 1234"));
    }

    #[test]
    fn test_has_email_domain() {
        assert!(has_email_domain("reach me at jane@gmail.com"));
        assert!(!has_email_domain("twitter @handle only"));
    }

    #[test]
    fn test_find_emails_basic() {
        let text = "Contact: patrick.mcmurray@mail.com, alt jdoe+cv@uni.edu.";
        assert_eq!(
            find_emails(text),
            vec!["patrick.mcmurray@mail.com", "jdoe+cv@uni.edu"]
        );
    }

    #[test]
    fn test_find_emails_trailing_digits_trimmed() {
        assert_eq!(find_emails("x a@mail.com5"), vec!["a@mail.com"]);
    }

    #[test]
    fn test_masked_emails() {
        let text = "Email: j***e@gmail.com";
        assert_eq!(find_masked_emails(text), vec!["j***e@gmail.com"]);
        assert_eq!(find_emails(text), vec!["e@gmail.com"]);
    }

    #[test]
    fn test_find_emails_rejects_missing_tld() {
        assert!(find_emails("user@localhost and @alone").is_empty());
    }

    #[test]
    fn test_unicode_text_is_safe() {
        let text = "Zoë Müller — zoë@müller.de — 212-555-0199";
        assert_eq!(find_phone_numbers(text), vec!["212-555-0199"]);
        // Non-ASCII local parts are outside the address shape.
        assert!(find_emails(text).is_empty());
    }
}
