//! Course Finder Core Library
//!
//! This crate provides the resolution-and-search pipeline for training
//! course queries:
//! - Family resolution (alias catalogue, acronym heuristics, generic
//!   disambiguation)
//! - Catalogue validation with edit-distance suggestions
//! - Natural-language date window normalization
//! - Venue/city/online facet detection
//! - Session search, dedup, ranking and graduated-failure diagnostics
//!
//! The core is synchronous, pure and stateless; the caller supplies the
//! catalogue snapshot, the raw user text and the reference "now" day.

pub mod catalogue;
pub mod dates;
pub mod location;
pub mod normalize;
pub mod resolver;
pub mod search;
pub mod types;
pub mod validator;

// Re-export commonly used types and operations at crate root
pub use types::{
    DateWindow, Diagnostics, DiagnosticsStage, GenericFamily, ResolvedFamily, ResolvedQuery,
    ResultItem, SearchParams, SessionRecord, Suggestion, ValidationReason, ValidationResult,
};

pub use catalogue::{base_family, is_refresher_capable, session_matches_family};
pub use dates::{normalize_date_window, parse_loose_date, DEFAULT_WINDOW_DAYS};
pub use location::{detect_location_facet, detect_user_location, match_location};
pub use normalize::normalize;
pub use resolver::{closest_families, infer_family_label, resolve_query};
pub use search::{diagnose, project_session, search};
pub use validator::validate_course_query;
