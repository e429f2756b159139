//! Venue/city/online facet extraction and matching.
//!
//! A session's display name usually encodes its venue as a pipe-delimited
//! segment ("SMSTS Refresher | Stratford | 2 days"); user text names a city,
//! "online", or nothing at all. Both sides reduce to a facet that the search
//! engine compares through `match_location`.

use crate::catalogue::CITY_ALIASES;
use crate::normalize::{contains_token, normalize};

/// Extract the venue/format facet from a session display name.
pub fn detect_location_facet(name: &str) -> Option<String> {
    let norm = normalize(name);
    if norm.contains("online") {
        return Some("online".to_string());
    }

    let segments: Vec<&str> = name.split('|').collect();
    if segments.len() >= 3 {
        let venue = segments[1].trim();
        if !venue.is_empty() && !venue.eq_ignore_ascii_case("venue tbc") {
            return Some(venue.to_string());
        }
    }

    city_for(&norm)
}

/// Extract a location facet from free user text. "anywhere" and friends
/// mean "no filter".
pub fn detect_user_location(text: &str) -> Option<String> {
    let norm = normalize(text);
    if norm.is_empty() {
        return None;
    }
    if norm.contains("anywhere") || norm.contains("any place") || contains_token(&norm, "any") {
        return None;
    }
    if norm.contains("online") {
        return Some("online".to_string());
    }
    city_for(&norm)
}

/// Does a session satisfy the requested location?
///
/// No request matches everything. "online" requires an exact facet match. A
/// named city matches when facet and request are substrings of each other,
/// or when any configured alias for that city appears in the facet.
pub fn match_location(requested: Option<&str>, session_name: &str) -> bool {
    let requested = match requested {
        None => return true,
        Some(r) => normalize(r),
    };
    if requested.is_empty() {
        return true;
    }

    let facet = match detect_location_facet(session_name) {
        Some(f) => normalize(&f),
        None => return false,
    };

    if requested == "online" {
        return facet == "online";
    }

    if facet.contains(&requested) || requested.contains(&facet) {
        return true;
    }

    CITY_ALIASES
        .iter()
        .find(|(city, _)| *city == requested)
        .map_or(false, |(_, aliases)| {
            aliases.iter().any(|alias| facet.contains(alias))
        })
}

fn city_for(normalized: &str) -> Option<String> {
    for (city, aliases) in CITY_ALIASES {
        if aliases.iter().any(|alias| normalized.contains(alias)) {
            return Some((*city).to_string());
        }
    }
    None
}
