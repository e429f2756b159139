//! Catalogue validator.
//!
//! Wraps the resolver to classify a course query as matched, needing
//! clarification, or unknown, with ranked suggestions for the caller to
//! offer back to the user. The search must never run unless `exists` is
//! true.

use crate::catalogue::is_refresher_capable;
use crate::resolver::{
    closest_families, nearest_families, nearest_refresher_capable, resolve_query,
    SUGGESTION_LIMIT,
};
use crate::types::{ResolvedFamily, Suggestion, ValidationReason, ValidationResult};

/// Validate a course query against the catalogue model.
pub fn validate_course_query(term: &str) -> ValidationResult {
    let resolved = resolve_query(term);
    let refresher = resolved.refresher;

    let family = match resolved.family {
        Some(family) => family,
        None => return missing_family(term, refresher),
    };

    match family {
        ResolvedFamily::Generic(generic) => ValidationResult {
            recognized_family: Some(generic.label().to_string()),
            refresher_requested: refresher,
            exists: false,
            normalized_family: None,
            reason: ValidationReason::NeedsVariant,
            suggestions: generic
                .variants()
                .iter()
                .map(|variant| Suggestion::new(*variant))
                .collect(),
        },
        ResolvedFamily::Concrete(name) => {
            if refresher == Some(true) && !is_refresher_capable(&name) && !name.ends_with("Refresher")
            {
                return variant_not_offered(&name, refresher);
            }
            let normalized = if refresher == Some(true) && !name.ends_with("Refresher") {
                format!("{} Refresher", name)
            } else {
                name.clone()
            };
            ValidationResult {
                recognized_family: Some(name),
                refresher_requested: refresher,
                exists: true,
                normalized_family: Some(normalized),
                reason: ValidationReason::Ok,
                suggestions: Vec::new(),
            }
        }
    }
}

/// Nothing resolved: suggest the nearest families by edit distance, each
/// with its refresher form when one is offered. Falls back to the uncapped
/// ranking when nothing clears the distance cutoff.
fn missing_family(term: &str, refresher: Option<bool>) -> ValidationResult {
    let mut close = closest_families(term, SUGGESTION_LIMIT);
    if close.is_empty() {
        close = nearest_families(term, SUGGESTION_LIMIT);
    }

    let mut suggestions = Vec::new();
    for family in close {
        let capable = is_refresher_capable(&family);
        suggestions.push(Suggestion::new(family.clone()));
        if capable {
            suggestions.push(Suggestion::new(format!("{} Refresher", family)));
        }
    }

    ValidationResult {
        recognized_family: None,
        refresher_requested: refresher,
        exists: false,
        normalized_family: None,
        reason: ValidationReason::MissingFamily,
        suggestions,
    }
}

/// A refresher was requested for a family that has no refresher variant:
/// offer the standard form plus the two nearest families that do.
fn variant_not_offered(family: &str, refresher: Option<bool>) -> ValidationResult {
    let mut suggestions = vec![Suggestion::new(family)];
    for capable in nearest_refresher_capable(family, 2) {
        suggestions.push(Suggestion::new(format!("{} Refresher", capable)));
    }

    ValidationResult {
        recognized_family: Some(family.to_string()),
        refresher_requested: refresher,
        exists: false,
        normalized_family: None,
        reason: ValidationReason::VariantNotOffered,
        suggestions,
    }
}
