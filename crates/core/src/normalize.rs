//! Text normalization shared by every matching component.
//!
//! All substring and token tests in the resolver, validator, date and
//! location code run over this normalized form, never over raw user text.

use unicode_normalization::UnicodeNormalization;

/// Normalize free text for matching: lowercase, strip diacritics, keep only
/// `[a-z0-9+& ]`, collapse whitespace runs, trim.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped: String = lower.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let mut mapped = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        match c {
            'a'..='z' | '0'..='9' | '+' | '&' => mapped.push(c),
            _ => mapped.push(' '),
        }
    }

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-word token test over normalized text.
pub fn contains_token(normalized: &str, token: &str) -> bool {
    normalized.split_whitespace().any(|t| t == token)
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}
