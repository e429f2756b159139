//! Domain models for course resolution and session search.
//!
//! Everything here is plain data: the orchestration layer consumes these
//! types as JSON and renders them elsewhere. No formatting lives in the core.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Resolution model
// ============================================================================

/// Umbrella families that require a follow-up before any search can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericFamily {
    Iosh,
    Eusr,
    Nebosh,
}

impl GenericFamily {
    pub fn label(&self) -> &'static str {
        match self {
            GenericFamily::Iosh => "IOSH",
            GenericFamily::Eusr => "EUSR",
            GenericFamily::Nebosh => "NEBOSH",
        }
    }

    /// The two concrete child variants a follow-up must choose between.
    pub fn variants(&self) -> [&'static str; 2] {
        match self {
            GenericFamily::Iosh => ["IOSH Managing Safely", "IOSH Working Safely"],
            GenericFamily::Eusr => ["EUSR Water Hygiene AM", "EUSR Water Hygiene PM"],
            GenericFamily::Nebosh => ["NEBOSH General", "NEBOSH Construction"],
        }
    }
}

/// A resolved course family. The generic tag is a valid intermediate
/// resolver output but an invalid terminal search key; the session-name
/// predicate table rejects it unconditionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ResolvedFamily {
    Concrete(String),
    Generic(GenericFamily),
}

impl ResolvedFamily {
    pub fn concrete(name: &str) -> Self {
        ResolvedFamily::Concrete(name.to_string())
    }

    pub fn label(&self) -> &str {
        match self {
            ResolvedFamily::Concrete(name) => name,
            ResolvedFamily::Generic(generic) => generic.label(),
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, ResolvedFamily::Generic(_))
    }
}

/// Output of the family resolution engine. `refresher: None` means
/// "unspecified - accept either".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedQuery {
    pub family: Option<ResolvedFamily>,
    pub refresher: Option<bool>,
}

// ============================================================================
// Validation model
// ============================================================================

/// Terminal classification of a course query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    Ok,
    MissingFamily,
    NeedsVariant,
    VariantNotOffered,
}

/// One suggested course label for the caller to offer back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub label: String,
}

impl Suggestion {
    pub fn new(label: impl Into<String>) -> Self {
        Suggestion { label: label.into() }
    }
}

/// Result of validating a course query against the catalogue model.
/// `exists` is true iff the query is concrete and satisfiable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognized_family: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresher_requested: Option<bool>,

    pub exists: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_family: Option<String>,

    pub reason: ValidationReason,

    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

// ============================================================================
// Date window
// ============================================================================

/// A concrete UTC day range plus a human-readable label. Bounds are
/// inclusive; an absent bound leaves that side open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub label: String,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate, label: impl Into<String>) -> Self {
        DateWindow {
            start: Some(start),
            end: Some(end),
            label: label.into(),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start.map_or(true, |s| day >= s) && self.end.map_or(true, |e| day <= e)
    }
}

// ============================================================================
// Session catalogue and search results
// ============================================================================

/// Raw catalogue item as supplied by the (external) fetch collaborator.
/// Every field tolerates absence; malformed rows simply fail predicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates_list: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_spaces: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Projection of a session record with a parsed start day, a numeric price
/// and an extracted venue/format label. Lifetime is a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_spaces: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Parameters for one session search. `family` must be a concrete family
/// label (the validator's `normalized_family`), never a generic placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub family: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresher: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<DateWindow>,
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Which relaxation stage first explained an empty result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticsStage {
    /// No sessions exist for this family/refresher anywhere.
    NoSessionsForCourse,
    /// Sessions exist, but none inside the date window at any location.
    NoneInDateWindow,
    /// Sessions exist, but none at this location in any window.
    NoneAtLocation,
    /// Date and location each match something, just not together.
    CombinedFilters,
}

/// Staged-relaxation explanation for a zero-result search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub stage: DiagnosticsStage,

    /// Nearest future sessions at the requested location (stage 2 only).
    #[serde(default)]
    pub nearest_at_location: Vec<ResultItem>,

    /// Nearest future sessions anywhere.
    #[serde(default)]
    pub nearest_anywhere: Vec<ResultItem>,

    /// Sessions for the standard/refresher counterpart under the same
    /// date and location filters.
    #[serde(default)]
    pub alternate_variant: Vec<ResultItem>,
}
