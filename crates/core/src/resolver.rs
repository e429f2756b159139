//! Family resolution engine.
//!
//! Maps free user text to one canonical course family plus a tri-state
//! refresher flag. Resolution is a fixed cascade of heuristics over the
//! normalized text, first match wins; refresher detection is an independent
//! pass over the same text.

use strsim::levenshtein;

use crate::catalogue::{
    base_families, base_family, is_refresher_capable, refresher_capable_families, BARE_ACRONYMS,
    FAMILY_CATALOGUE,
};
use crate::normalize::{contains_token, normalize};
use crate::types::{GenericFamily, ResolvedFamily, ResolvedQuery};

/// Default number of closest-family suggestions.
pub const SUGGESTION_LIMIT: usize = 3;

/// Maximum edit distance for a family to count as "close".
const SUGGESTION_MAX_DISTANCE: usize = 3;

/// Resolve free text to a course family and a refresher flag.
pub fn resolve_query(term: &str) -> ResolvedQuery {
    let text = normalize(term);

    let family = resolve_family(&text).map(|family| specialize(family, &text));
    let refresher = detect_refresher(&text);

    ResolvedQuery { family, refresher }
}

// ============================================================================
// Family cascade
// ============================================================================

fn resolve_family(text: &str) -> Option<ResolvedFamily> {
    if text.is_empty() {
        return None;
    }

    scan_aliases(text)
        .or_else(|| scan_acronyms(text))
        .or_else(|| match_iosh_phrase(text))
        .or_else(|| match_water_hygiene(text))
        .or_else(|| match_bare_health_safety(text))
}

/// Step 1: alias scan in catalogue order. Refresher entries resolve to
/// their base family; the refresher signal travels in the token pass.
fn scan_aliases(text: &str) -> Option<ResolvedFamily> {
    for entry in FAMILY_CATALOGUE {
        for alias in entry.aliases {
            if text.contains(alias) {
                return Some(ResolvedFamily::concrete(base_family(entry.name)));
            }
        }
    }
    None
}

/// Step 2: bare acronym scan. Not word-bounded: an acronym inside a longer
/// token still matches. Known heuristic limitation, kept as-is.
fn scan_acronyms(text: &str) -> Option<ResolvedFamily> {
    for (acronym, target) in BARE_ACRONYMS {
        if text.contains(acronym) {
            return Some(family_for_target(target));
        }
    }
    None
}

fn family_for_target(target: &str) -> ResolvedFamily {
    match target {
        "IOSH" => ResolvedFamily::Generic(GenericFamily::Iosh),
        "EUSR" => ResolvedFamily::Generic(GenericFamily::Eusr),
        "NEBOSH" => ResolvedFamily::Generic(GenericFamily::Nebosh),
        concrete => ResolvedFamily::concrete(concrete),
    }
}

/// Step 3: "managing safely" / "working safely", with or without an "iosh"
/// prefix, select the concrete IOSH variant directly.
fn match_iosh_phrase(text: &str) -> Option<ResolvedFamily> {
    if text.contains("managing safely") {
        return Some(ResolvedFamily::concrete("IOSH Managing Safely"));
    }
    if text.contains("working safely") {
        return Some(ResolvedFamily::concrete("IOSH Working Safely"));
    }
    None
}

/// Step 4: "water hygiene" resolves to an AM/PM variant when a time-of-day
/// signal is present, else to the generic EUSR placeholder.
fn match_water_hygiene(text: &str) -> Option<ResolvedFamily> {
    if !text.contains("water hygiene") {
        return None;
    }
    Some(water_hygiene_variant(text).unwrap_or(ResolvedFamily::Generic(GenericFamily::Eusr)))
}

fn water_hygiene_variant(text: &str) -> Option<ResolvedFamily> {
    if contains_token(text, "am") || text.contains("morning") {
        return Some(ResolvedFamily::concrete("EUSR Water Hygiene AM"));
    }
    if contains_token(text, "pm") || text.contains("afternoon") {
        return Some(ResolvedFamily::concrete("EUSR Water Hygiene PM"));
    }
    None
}

/// Step 5: a bare "health and safety" phrase, with neither "nebosh" nor
/// "iosh" in sight, means the entry-level awareness course.
fn match_bare_health_safety(text: &str) -> Option<ResolvedFamily> {
    let health_safety = text.contains("health and safety") || text.contains("health & safety");
    if health_safety && !text.contains("nebosh") && !text.contains("iosh") {
        return Some(ResolvedFamily::concrete("HSA"));
    }
    None
}

/// Step 6: post-processing specializations.
///
/// NEBOSH families narrow on "construction"/"general" or collapse to the
/// bare placeholder; generic IOSH/EUSR placeholders re-specialize when the
/// governing phrase or AM/PM signal appears anywhere in the text.
fn specialize(family: ResolvedFamily, text: &str) -> ResolvedFamily {
    let is_nebosh = match &family {
        ResolvedFamily::Concrete(name) => name.starts_with("NEBOSH"),
        ResolvedFamily::Generic(generic) => *generic == GenericFamily::Nebosh,
    };

    if is_nebosh {
        if text.contains("construction") {
            return ResolvedFamily::concrete("NEBOSH Construction");
        }
        if text.contains("general") {
            return ResolvedFamily::concrete("NEBOSH General");
        }
        return ResolvedFamily::Generic(GenericFamily::Nebosh);
    }

    match family {
        ResolvedFamily::Generic(GenericFamily::Iosh) => {
            match_iosh_phrase(text).unwrap_or(family)
        }
        ResolvedFamily::Generic(GenericFamily::Eusr) => {
            water_hygiene_variant(text).unwrap_or(family)
        }
        other => other,
    }
}

// ============================================================================
// Refresher detection
// ============================================================================

const REFRESHER_TOKENS: &[&str] = &["refresher", "renewal", "update", "refresh"];

/// Independent whole-word pass: refresher-positive tokens win over the
/// "standard" negative; no token at all means "unspecified".
fn detect_refresher(text: &str) -> Option<bool> {
    if REFRESHER_TOKENS.iter().any(|token| contains_token(text, token)) {
        return Some(true);
    }
    if contains_token(text, "standard") {
        return Some(false);
    }
    None
}

// ============================================================================
// Display label and suggestions
// ============================================================================

/// Derive a single display label from a resolved query.
///
/// Generic placeholders come back unmodified, forcing the caller through a
/// follow-up. A refresher request appends "Refresher" only when the family
/// actually offers one.
pub fn infer_family_label(term: &str) -> Option<String> {
    let resolved = resolve_query(term);
    let family = resolved.family?;

    match family {
        ResolvedFamily::Generic(generic) => Some(generic.label().to_string()),
        ResolvedFamily::Concrete(name) => {
            if name.ends_with("Refresher") {
                return Some(name);
            }
            if resolved.refresher == Some(true) && is_refresher_capable(&name) {
                return Some(format!("{} Refresher", name));
            }
            Some(name)
        }
    }
}

/// Canonical families within edit distance 3 of the query, nearest first,
/// capped at `max`. Distance is the minimum over the full family name and
/// its leading acronym token.
pub fn closest_families(term: &str, max: usize) -> Vec<String> {
    ranked_families(term)
        .into_iter()
        .filter(|(distance, _)| *distance <= SUGGESTION_MAX_DISTANCE)
        .take(max)
        .map(|(_, name)| name.to_string())
        .collect()
}

/// Nearest canonical families with no distance cutoff. Fallback for queries
/// so far from the catalogue that nothing clears the distance bar.
pub fn nearest_families(term: &str, max: usize) -> Vec<String> {
    ranked_families(term)
        .into_iter()
        .take(max)
        .map(|(_, name)| name.to_string())
        .collect()
}

/// Refresher-capable families nearest to the requested family name.
pub fn nearest_refresher_capable(family: &str, max: usize) -> Vec<String> {
    let query = normalize(family);
    let mut scored: Vec<(usize, &str)> = refresher_capable_families()
        .map(|name| (family_distance(&query, name), name))
        .collect();
    scored.sort_by_key(|(distance, _)| *distance);
    scored
        .into_iter()
        .take(max)
        .map(|(_, name)| name.to_string())
        .collect()
}

fn ranked_families(term: &str) -> Vec<(usize, &'static str)> {
    let query = normalize(term);
    if query.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &'static str)> = base_families()
        .map(|name| (family_distance(&query, name), name))
        .collect();
    // Stable sort keeps catalogue order among equal distances.
    scored.sort_by_key(|(distance, _)| *distance);
    scored
}

fn family_distance(query: &str, family: &str) -> usize {
    let full = normalize(family);
    let lead = full.split_whitespace().next().unwrap_or("");
    levenshtein(query, &full).min(levenshtein(query, lead))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_resolves_to_its_base_family() {
        for entry in FAMILY_CATALOGUE {
            for alias in entry.aliases {
                let resolved = resolve_query(alias);
                let family = resolved.family.expect("alias should resolve");
                // NEBOSH aliases pass through the specialization pass, which
                // keeps them on the same certificate.
                assert_eq!(
                    family.label(),
                    base_family(entry.name),
                    "alias {:?} resolved to {:?}",
                    alias,
                    family
                );
            }
        }
    }

    #[test]
    fn test_acronym_resolution() {
        let resolved = resolve_query("smsts in stratford next month");
        assert_eq!(resolved.family, Some(ResolvedFamily::concrete("SMSTS")));
        assert_eq!(resolved.refresher, None);
    }

    #[test]
    fn test_refresher_flag_tristate() {
        assert_eq!(resolve_query("smsts refresher").refresher, Some(true));
        assert_eq!(resolve_query("sssts standard").refresher, Some(false));
        assert_eq!(resolve_query("hsa").refresher, None);
        assert_eq!(resolve_query("smsts renewal course").refresher, Some(true));
        assert_eq!(resolve_query("twc update").refresher, Some(true));
    }

    #[test]
    fn test_refresher_positive_beats_standard() {
        assert_eq!(resolve_query("standard refresher").refresher, Some(true));
    }

    #[test]
    fn test_bare_iosh_is_generic() {
        let resolved = resolve_query("iosh");
        assert_eq!(
            resolved.family,
            Some(ResolvedFamily::Generic(GenericFamily::Iosh))
        );
    }

    #[test]
    fn test_iosh_respecializes_from_phrase() {
        let resolved = resolve_query("iosh course on managing safely");
        assert_eq!(
            resolved.family,
            Some(ResolvedFamily::concrete("IOSH Managing Safely"))
        );
    }

    #[test]
    fn test_managing_safely_without_iosh_prefix() {
        let resolved = resolve_query("managing safely");
        assert_eq!(
            resolved.family,
            Some(ResolvedFamily::concrete("IOSH Managing Safely"))
        );
    }

    #[test]
    fn test_water_hygiene_variants() {
        assert_eq!(
            resolve_query("water hygiene in the morning").family,
            Some(ResolvedFamily::concrete("EUSR Water Hygiene AM"))
        );
        assert_eq!(
            resolve_query("water hygiene pm").family,
            Some(ResolvedFamily::concrete("EUSR Water Hygiene PM"))
        );
        assert_eq!(
            resolve_query("water hygiene").family,
            Some(ResolvedFamily::Generic(GenericFamily::Eusr))
        );
    }

    #[test]
    fn test_bare_health_and_safety_is_hsa() {
        assert_eq!(
            resolve_query("health and safety").family,
            Some(ResolvedFamily::concrete("HSA"))
        );
        assert_eq!(
            resolve_query("health & safety course").family,
            Some(ResolvedFamily::concrete("HSA"))
        );
    }

    #[test]
    fn test_health_and_safety_defers_to_nebosh() {
        let resolved = resolve_query("nebosh health and safety");
        assert_eq!(
            resolved.family,
            Some(ResolvedFamily::Generic(GenericFamily::Nebosh))
        );
    }

    #[test]
    fn test_nebosh_narrows_on_construction() {
        assert_eq!(
            resolve_query("nebosh construction").family,
            Some(ResolvedFamily::concrete("NEBOSH Construction"))
        );
        assert_eq!(
            resolve_query("nebosh general").family,
            Some(ResolvedFamily::concrete("NEBOSH General"))
        );
        assert_eq!(
            resolve_query("nebosh").family,
            Some(ResolvedFamily::Generic(GenericFamily::Nebosh))
        );
    }

    #[test]
    fn test_unrecognized_text_resolves_to_nothing() {
        let resolved = resolve_query("underwater basket weaving");
        assert_eq!(resolved.family, None);
    }

    #[test]
    fn test_infer_family_label_appends_refresher_when_capable() {
        assert_eq!(
            infer_family_label("smsts refresher"),
            Some("SMSTS Refresher".to_string())
        );
        // TWS has no refresher variant; the base label comes back.
        assert_eq!(infer_family_label("tws refresher"), Some("TWS".to_string()));
        // Explicitly declined.
        assert_eq!(infer_family_label("smsts standard"), Some("SMSTS".to_string()));
        // Generic placeholder passes through unmodified.
        assert_eq!(infer_family_label("iosh"), Some("IOSH".to_string()));
    }

    #[test]
    fn test_closest_families_finds_near_misses() {
        // One edit away from "smsts".
        let close = closest_families("smst", SUGGESTION_LIMIT);
        assert!(close.contains(&"SMSTS".to_string()), "got {:?}", close);
    }

    #[test]
    fn test_closest_families_respects_cutoff() {
        assert!(closest_families("xyzzy", SUGGESTION_LIMIT).is_empty());
        // But the uncapped fallback still ranks something.
        assert_eq!(nearest_families("xyzzy", SUGGESTION_LIMIT).len(), 3);
    }

    #[test]
    fn test_nearest_refresher_capable_ranks_by_distance() {
        let nearest = nearest_refresher_capable("TWS", 2);
        assert_eq!(nearest.first(), Some(&"TWC".to_string()));
        assert_eq!(nearest.len(), 2);
    }
}
