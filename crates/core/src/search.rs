//! Session search, dedup, ranking, and graduated-failure diagnostics.
//!
//! The search filters a catalogue snapshot against a resolved family, a
//! refresher flag, a date window, and a location facet. When nothing
//! matches, `diagnose` relaxes the query in a fixed order to explain which
//! constraint killed the result set and to surface the nearest alternatives.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;

use crate::catalogue::{is_refresher_capable, session_matches_family};
use crate::dates::parse_loose_date;
use crate::location::{detect_location_facet, match_location};
use crate::types::{Diagnostics, DiagnosticsStage, ResultItem, SearchParams, SessionRecord};

/// Cap on the alternative lists surfaced by diagnostics.
const MAX_NEARBY: usize = 3;

// ============================================================================
// Search
// ============================================================================

/// Filter, deduplicate and rank catalogue sessions for one query.
pub fn search(catalogue: &[SessionRecord], params: &SearchParams) -> Vec<ResultItem> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut items: Vec<ResultItem> = Vec::new();

    for record in catalogue {
        if !session_matches_family(&params.family, &record.name) {
            continue;
        }
        if !refresher_matches(params.refresher, &record.name) {
            continue;
        }
        if !match_location(params.location.as_deref(), &record.name) {
            continue;
        }

        let item = project_session(record);
        if let Some(window) = &params.window {
            match item.start {
                Some(day) if window.contains(day) => {}
                _ => continue,
            }
        }

        let key = (
            record.name.clone(),
            record.start_date.clone().unwrap_or_default(),
        );
        if !seen.insert(key) {
            continue;
        }

        items.push(item);
    }

    items.sort_by(compare_items);
    items
}

/// Project a raw session record into a result item: parse the start day,
/// normalize the price, extract the venue facet.
pub fn project_session(record: &SessionRecord) -> ResultItem {
    let start = record
        .start_date
        .as_deref()
        .and_then(parse_loose_date)
        .or_else(|| {
            record
                .dates_list
                .as_deref()
                .and_then(first_date_in_list)
        });

    ResultItem {
        name: record.name.clone(),
        start,
        start_text: record.start_date.clone(),
        price: record.price.clone(),
        price_value: record.price.as_deref().and_then(parse_price),
        venue: detect_location_facet(&record.name),
        available_spaces: record.available_spaces,
        link: record.link.clone(),
    }
}

fn refresher_matches(requested: Option<bool>, session_name: &str) -> bool {
    let is_refresher = session_name.to_lowercase().contains("refresher");
    match requested {
        Some(true) => is_refresher,
        Some(false) => !is_refresher,
        None => true,
    }
}

/// Ascending by parsed start day (undated last), then ascending price.
fn compare_items(a: &ResultItem, b: &ResultItem) -> Ordering {
    let by_date = match (a.start, b.start) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| match (a.price_value, b.price_value) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

/// Numeric price from display text: strip everything but digits and dots.
fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

fn first_date_in_list(text: &str) -> Option<NaiveDate> {
    text.split(['-', ',']).next().and_then(parse_loose_date)
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Explain a zero-result search by relaxing constraints in a fixed order.
pub fn diagnose(catalogue: &[SessionRecord], params: &SearchParams, now: NaiveDate) -> Diagnostics {
    let family_only = relax(params, false, false);
    let alternate_variant = opposite_variant(catalogue, params);

    // Stage 1: nothing for this family/refresher anywhere.
    if search(catalogue, &family_only).is_empty() {
        return Diagnostics {
            stage: DiagnosticsStage::NoSessionsForCourse,
            nearest_at_location: Vec::new(),
            nearest_anywhere: Vec::new(),
            alternate_variant,
        };
    }

    // Stage 2: nothing inside the date window at any location.
    if search(catalogue, &relax(params, true, false)).is_empty() {
        return Diagnostics {
            stage: DiagnosticsStage::NoneInDateWindow,
            nearest_at_location: nearest_future(catalogue, &relax(params, false, true), now),
            nearest_anywhere: nearest_future(catalogue, &family_only, now),
            alternate_variant,
        };
    }

    // Stage 3: nothing at this location in any window.
    if search(catalogue, &relax(params, false, true)).is_empty() {
        return Diagnostics {
            stage: DiagnosticsStage::NoneAtLocation,
            nearest_at_location: Vec::new(),
            nearest_anywhere: nearest_future(catalogue, &family_only, now),
            alternate_variant,
        };
    }

    Diagnostics {
        stage: DiagnosticsStage::CombinedFilters,
        nearest_at_location: Vec::new(),
        nearest_anywhere: nearest_future(catalogue, &family_only, now),
        alternate_variant,
    }
}

/// Copy of `params` with the date window and/or location selectively kept.
fn relax(params: &SearchParams, keep_window: bool, keep_location: bool) -> SearchParams {
    SearchParams {
        family: params.family.clone(),
        refresher: params.refresher,
        location: if keep_location { params.location.clone() } else { None },
        window: if keep_window { params.window.clone() } else { None },
    }
}

/// Earliest sessions starting at or after `now`, capped.
fn nearest_future(
    catalogue: &[SessionRecord],
    params: &SearchParams,
    now: NaiveDate,
) -> Vec<ResultItem> {
    let mut items = search(catalogue, params);
    items.retain(|item| item.start.map_or(false, |day| day >= now));
    items.truncate(MAX_NEARBY);
    items
}

/// Sessions for the standard/refresher counterpart of the searched family,
/// under the same date and location filters. Empty when the family has no
/// counterpart.
fn opposite_variant(catalogue: &[SessionRecord], params: &SearchParams) -> Vec<ResultItem> {
    let (family, refresher) = match params.family.strip_suffix(" Refresher") {
        Some(base) => (base.to_string(), Some(false)),
        None if is_refresher_capable(&params.family) => {
            (format!("{} Refresher", params.family), Some(true))
        }
        None => return Vec::new(),
    };

    let mut items = search(
        catalogue,
        &SearchParams {
            family,
            refresher,
            location: params.location.clone(),
            window: params.window.clone(),
        },
    );
    items.truncate(MAX_NEARBY);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::normalize_date_window;

    fn session(name: &str, start: &str, price: &str) -> SessionRecord {
        SessionRecord {
            name: name.to_string(),
            start_date: Some(start.to_string()),
            end_date: None,
            dates_list: None,
            price: Some(price.to_string()),
            available_spaces: Some(8),
            link: Some("https://example.com/book".to_string()),
        }
    }

    fn now() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    fn fixture() -> Vec<SessionRecord> {
        vec![
            session("SMSTS | Stratford | 5 days", "4th August 2025", "£495.00"),
            session("SMSTS | Leeds | 5 days", "11th August 2025", "£450.00"),
            session("SMSTS Refresher | Stratford | 2 days", "20th August 2025", "£265.00"),
            session("SMSTS Refresher | Online | 2 days", "9th September 2025", "£245.00"),
            session("SSSTS | Leeds | 2 days", "15th September 2025", "£230.00"),
        ]
    }

    #[test]
    fn test_search_round_trip() {
        let window = normalize_date_window("august", now());
        let results = search(
            &fixture(),
            &SearchParams {
                family: "SMSTS Refresher".to_string(),
                refresher: Some(true),
                location: Some("stratford".to_string()),
                window: Some(window),
            },
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "SMSTS Refresher | Stratford | 2 days");
        assert_eq!(
            results[0].start,
            NaiveDate::from_ymd_opt(2025, 8, 20)
        );
        assert_eq!(results[0].venue.as_deref(), Some("Stratford"));
        assert_eq!(results[0].price_value, Some(265.0));
    }

    #[test]
    fn test_search_sorts_by_date_then_price() {
        let results = search(
            &fixture(),
            &SearchParams {
                family: "SMSTS".to_string(),
                refresher: None,
                location: None,
                window: None,
            },
        );
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "SMSTS | Stratford | 5 days");
        assert_eq!(results[1].name, "SMSTS | Leeds | 5 days");
    }

    #[test]
    fn test_price_ties_break_by_value() {
        let catalogue = vec![
            session("SMSTS | Leeds | 5 days", "4th August 2025", "£495.00"),
            session("SMSTS | Stratford | 5 days", "4th August 2025", "£450.00"),
        ];
        let results = search(
            &catalogue,
            &SearchParams {
                family: "SMSTS".to_string(),
                refresher: None,
                location: None,
                window: None,
            },
        );
        assert_eq!(results[0].price_value, Some(450.0));
    }

    #[test]
    fn test_dedup_by_name_and_start_text() {
        let mut catalogue = fixture();
        catalogue.push(session("SMSTS | Stratford | 5 days", "4th August 2025", "£495.00"));
        let results = search(
            &catalogue,
            &SearchParams {
                family: "SMSTS".to_string(),
                refresher: None,
                location: None,
                window: None,
            },
        );
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_undated_sessions_sort_last_and_fail_windows() {
        let mut catalogue = fixture();
        catalogue.push(SessionRecord {
            name: "SMSTS | Bristol | 5 days".to_string(),
            ..Default::default()
        });

        let unwindowed = search(
            &catalogue,
            &SearchParams {
                family: "SMSTS".to_string(),
                refresher: None,
                location: None,
                window: None,
            },
        );
        assert_eq!(unwindowed.last().unwrap().name, "SMSTS | Bristol | 5 days");

        let windowed = search(
            &catalogue,
            &SearchParams {
                family: "SMSTS".to_string(),
                refresher: None,
                location: None,
                window: Some(normalize_date_window("august", now())),
            },
        );
        assert!(windowed.iter().all(|item| item.start.is_some()));
    }

    #[test]
    fn test_refresher_flag_filters_sessions() {
        let results = search(
            &fixture(),
            &SearchParams {
                family: "SMSTS Refresher".to_string(),
                refresher: Some(true),
                location: None,
                window: None,
            },
        );
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|item| item.name.contains("Refresher")));
    }

    #[test]
    fn test_dates_list_fallback_parses_first_date() {
        let record = SessionRecord {
            name: "TWC | Leeds | 2 days".to_string(),
            dates_list: Some("20th August 2025 - 21st August 2025".to_string()),
            ..Default::default()
        };
        let item = project_session(&record);
        assert_eq!(item.start, NaiveDate::from_ymd_opt(2025, 8, 20));
    }

    #[test]
    fn test_diagnose_stage_one_when_family_absent() {
        let diagnostics = diagnose(
            &fixture(),
            &SearchParams {
                family: "MHFA".to_string(),
                refresher: None,
                location: None,
                window: None,
            },
            now(),
        );
        assert_eq!(diagnostics.stage, DiagnosticsStage::NoSessionsForCourse);
        assert!(diagnostics.nearest_anywhere.is_empty());
    }

    #[test]
    fn test_diagnose_stage_two_surfaces_nearest() {
        // Sessions exist for the family, just not in November.
        let window = normalize_date_window("november", now());
        let diagnostics = diagnose(
            &fixture(),
            &SearchParams {
                family: "SMSTS Refresher".to_string(),
                refresher: Some(true),
                location: Some("stratford".to_string()),
                window: Some(window),
            },
            now(),
        );
        assert_eq!(diagnostics.stage, DiagnosticsStage::NoneInDateWindow);
        assert!(!diagnostics.nearest_anywhere.is_empty());
        assert_eq!(
            diagnostics.nearest_at_location[0].name,
            "SMSTS Refresher | Stratford | 2 days"
        );
        // The standard course is offered as the counterpart, filtered to the
        // same (empty) window.
        assert!(diagnostics.alternate_variant.is_empty());
    }

    #[test]
    fn test_diagnose_stage_three_when_location_never_matches() {
        let window = normalize_date_window("august", now());
        let diagnostics = diagnose(
            &fixture(),
            &SearchParams {
                family: "SMSTS".to_string(),
                refresher: None,
                location: Some("cardiff".to_string()),
                window: Some(window),
            },
            now(),
        );
        assert_eq!(diagnostics.stage, DiagnosticsStage::NoneAtLocation);
        assert!(!diagnostics.nearest_anywhere.is_empty());
    }

    #[test]
    fn test_opposite_variant_flips_standard_and_refresher() {
        let diagnostics = diagnose(
            &fixture(),
            &SearchParams {
                family: "SMSTS".to_string(),
                refresher: Some(false),
                location: Some("stratford".to_string()),
                window: Some(normalize_date_window("november", now())),
            },
            now(),
        );
        // Same filters, flipped variant: nothing in November either.
        assert!(diagnostics.alternate_variant.is_empty());

        let august = diagnose(
            &fixture(),
            &SearchParams {
                family: "TWS".to_string(),
                refresher: None,
                location: None,
                window: None,
            },
            now(),
        );
        // TWS has no counterpart at all.
        assert!(august.alternate_variant.is_empty());
    }

    #[test]
    fn test_opposite_variant_present_when_window_allows() {
        let window = normalize_date_window("august", now());
        let diagnostics = diagnose(
            &fixture(),
            &SearchParams {
                family: "SMSTS Refresher".to_string(),
                refresher: Some(true),
                location: Some("leeds".to_string()),
                window: Some(window),
            },
            now(),
        );
        // No refresher in Leeds, but the standard SMSTS runs there in August.
        assert_eq!(diagnostics.stage, DiagnosticsStage::NoneAtLocation);
        assert_eq!(diagnostics.alternate_variant.len(), 1);
        assert_eq!(diagnostics.alternate_variant[0].name, "SMSTS | Leeds | 5 days");
    }

    #[test]
    fn test_parse_price_strips_currency() {
        assert_eq!(parse_price("£1,295.00"), Some(1295.0));
        assert_eq!(parse_price("POA"), None);
    }
}
